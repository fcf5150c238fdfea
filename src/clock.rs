/// Elapsed time since boot or the last reset, advanced by the 1 Hz alarm.
///
/// `seconds` wraps at 60 into `minutes`, `minutes` wraps at 100.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedTime {
    minutes: u8,
    seconds: u8,
}

impl ElapsedTime {
    /// Out-of-range fields are reduced into range.
    pub const fn new(minutes: u8, seconds: u8) -> Self {
        Self {
            minutes: minutes % 100,
            seconds: seconds % 60,
        }
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Increments the second, carrying into the minute.
    pub fn tick(&mut self) {
        self.seconds += 1;
        if self.seconds >= 60 {
            self.seconds = 0;
            self.add_minute();
        }
    }

    /// Increments the minute. Wraps from 99 back to 0.
    pub fn add_minute(&mut self) {
        self.minutes = (self.minutes + 1) % 100;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// `MMSS` as a single integer, e.g. 2:05 is 205.
    pub fn display_value(&self) -> u32 {
        u32::from(self.minutes) * 100 + u32::from(self.seconds)
    }
}

/// Access from the main loop to the time owned by the tick interrupt.
///
/// Implementations must hand out a consistent `{minutes, seconds}` pair,
/// never one field from before a tick and the other from after it.
pub trait TimeSource {
    fn snapshot(&mut self) -> ElapsedTime;

    /// Zeroes the time and restarts the current second.
    fn reset(&mut self);
}

impl TimeSource for ElapsedTime {
    fn snapshot(&mut self) -> ElapsedTime {
        *self
    }

    fn reset(&mut self) {
        ElapsedTime::reset(self)
    }
}

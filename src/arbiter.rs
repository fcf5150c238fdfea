//! Main loop: buttons, sampling and choice of readout
//!
//! Each [`Instrument::step`] is one pass of the foreground loop:
//!
//! 1. reset button held: zero the clock, then block for the debounce time
//! 2. sample the sense input (extrema updated every pass)
//! 3. mode button held: show volts as `X.XX`, otherwise elapsed `MMSS`
//! 4. refresh all four digits once
//!
//! There is no delay between passes other than the per-digit dwell, the
//! refresh rate depends on it.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::InputPin;

use crate::button::Button;
use crate::clock::TimeSource;
use crate::config::Timing;
use crate::display::{Multiplexer, Readout};
use crate::error::Result;
use crate::shift_register::FrameSink;
use crate::voltmeter::{AnalogInput, VoltageExtrema, Voltmeter};

/// Outcome of one loop pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub readout: Readout,
    /// The clock was reset during this pass.
    pub reset: bool,
}

pub struct Instrument<SINK, RST, MODE, ADC, D> {
    display: Multiplexer<SINK>,
    reset: Button<RST>,
    mode: Button<MODE>,
    voltmeter: Voltmeter<ADC>,
    delay: D,
    timing: Timing,
}

impl<SINK, RST, MODE, ADC, D, E> Instrument<SINK, RST, MODE, ADC, D>
where
    SINK: FrameSink<Error = E>,
    RST: InputPin<Error = E>,
    MODE: InputPin<Error = E>,
    ADC: AnalogInput,
    D: DelayMs<u32>,
{
    pub fn new(sink: SINK, reset: RST, mode: MODE, input: ADC, delay: D, timing: Timing) -> Self {
        Instrument {
            display: Multiplexer::new(sink, timing.digit_dwell_ms),
            reset: Button::new(reset),
            mode: Button::new(mode),
            voltmeter: Voltmeter::new(input),
            delay,
            timing,
        }
    }

    pub fn step<T: TimeSource>(&mut self, time: &mut T) -> Result<Step, E> {
        let reset = self.reset.is_pressed()?;
        if reset {
            time.reset();
            self.delay.delay_ms(self.timing.reset_debounce_ms);
        }

        let volts = self.voltmeter.sample::<E>()?;

        let readout = if self.mode.is_pressed()? {
            Readout::Volts(volts)
        } else {
            Readout::Clock(time.snapshot())
        };

        self.display.render(&readout.frame(), &mut self.delay)?;

        Ok(Step { readout, reset })
    }

    /// Runs the loop until power-off. Failed passes are handed to
    /// `report` like successful ones; the loop carries on either way.
    pub fn run<T, F>(&mut self, time: &mut T, mut report: F) -> !
    where
        T: TimeSource,
        F: FnMut(Result<Step, E>, VoltageExtrema),
    {
        loop {
            let step = self.step(time);
            report(step, self.voltmeter.extrema());
        }
    }

    pub fn extrema(&self) -> VoltageExtrema {
        self.voltmeter.extrema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ElapsedTime;
    use crate::error::Error;
    use crate::segment::{DECIMAL_POINT, SEGMENT_CODES};
    use core::cell::{Cell, RefCell};
    use core::convert::Infallible;
    use std::rc::Rc;
    use std::vec::Vec;

    /// Simulated milliseconds, advanced only by the mock delay.
    type Millis = Rc<Cell<u32>>;

    struct SimDelay {
        now: Millis,
        waits: Rc<RefCell<Vec<u32>>>,
    }

    impl DelayMs<u32> for SimDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.now.set(self.now.get() + ms);
            self.waits.borrow_mut().push(ms);
        }
    }

    /// Clock whose 1 s alarm is derived from simulated time and re-armed
    /// on reset, like the firmware's. `pending` is a tick interrupt that
    /// fell due inside a critical section and runs as soon as it ends.
    struct SimClock {
        now: Millis,
        armed_at: u32,
        base: ElapsedTime,
        pending: bool,
    }

    impl TimeSource for SimClock {
        fn snapshot(&mut self) -> ElapsedTime {
            if core::mem::take(&mut self.pending) {
                self.base.tick();
            }
            let mut time = self.base;
            for _ in 0..(self.now.get() - self.armed_at) / 1000 {
                time.tick();
            }
            time
        }

        fn reset(&mut self) {
            self.armed_at = self.now.get();
            self.base = ElapsedTime::default();
            self.pending = false;
        }
    }

    #[derive(Clone)]
    struct Pin(Rc<Cell<bool>>);

    impl Pin {
        fn released() -> Self {
            Pin(Rc::new(Cell::new(true)))
        }

        fn press(&self, pressed: bool) {
            self.0.set(!pressed);
        }
    }

    impl InputPin for Pin {
        type Error = Infallible;

        fn is_high(&self) -> core::result::Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&self) -> core::result::Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    #[derive(Clone)]
    struct Sense(Rc<Cell<Option<f32>>>);

    impl AnalogInput for Sense {
        fn read_normalized(&mut self) -> Option<f32> {
            self.0.get()
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<(u8, u8)>>>);

    impl FrameSink for Recorder {
        type Error = Infallible;

        fn commit(&mut self, segments: u8, enable: u8) -> Result<(), Infallible> {
            self.0.borrow_mut().push((segments, enable));
            Ok(())
        }
    }

    struct Rig {
        instrument: Instrument<Recorder, Pin, Pin, Sense, SimDelay>,
        clock: SimClock,
        reset: Pin,
        mode: Pin,
        sense: Sense,
        commits: Recorder,
        waits: Rc<RefCell<Vec<u32>>>,
        now: Millis,
    }

    impl Rig {
        fn new() -> Self {
            let now: Millis = Rc::new(Cell::new(0));
            let waits = Rc::new(RefCell::new(Vec::new()));
            let reset = Pin::released();
            let mode = Pin::released();
            let sense = Sense(Rc::new(Cell::new(Some(0.0))));
            let commits = Recorder::default();
            let instrument = Instrument::new(
                commits.clone(),
                reset.clone(),
                mode.clone(),
                sense.clone(),
                SimDelay {
                    now: now.clone(),
                    waits: waits.clone(),
                },
                Timing::DEFAULT,
            );
            let clock = SimClock {
                now: now.clone(),
                armed_at: 0,
                base: ElapsedTime::default(),
                pending: false,
            };
            Rig {
                instrument,
                clock,
                reset,
                mode,
                sense,
                commits,
                waits,
                now,
            }
        }

        fn step(&mut self) -> Step {
            self.commits.0.borrow_mut().clear();
            self.waits.borrow_mut().clear();
            self.instrument.step(&mut self.clock).unwrap()
        }

        fn set_volts(&self, volts: f32) {
            self.sense.0.set(Some(volts / 3.3));
        }

        fn shown(&self) -> (Vec<u8>, Vec<bool>) {
            self.commits
                .0
                .borrow()
                .iter()
                .map(|(segments, _)| {
                    let digit = SEGMENT_CODES
                        .iter()
                        .position(|&code| code == segments | DECIMAL_POINT)
                        .unwrap() as u8;
                    (digit, segments & DECIMAL_POINT == 0)
                })
                .unzip()
        }
    }

    #[test]
    fn clock_mode_shows_minutes_and_seconds() {
        let mut rig = Rig::new();
        rig.clock.base = ElapsedTime::new(2, 5);

        let step = rig.step();

        assert_eq!(step.readout, Readout::Clock(ElapsedTime::new(2, 5)));
        assert_eq!(step.readout.value(), 205);
        let (digits, points) = rig.shown();
        assert_eq!(digits, [0, 2, 0, 5]);
        assert_eq!(points, [false; 4]);
    }

    #[test]
    fn mode_button_shows_volts() {
        let mut rig = Rig::new();
        rig.set_volts(2.47);
        rig.mode.press(true);

        let step = rig.step();

        assert!(matches!(step.readout, Readout::Volts(_)));
        assert_eq!(step.readout.value(), 247);
        let (digits, points) = rig.shown();
        assert_eq!(digits, [0, 2, 4, 7]);
        assert_eq!(points, [false, true, false, false]);
    }

    #[test]
    fn releasing_mode_returns_to_clock() {
        let mut rig = Rig::new();
        rig.mode.press(true);
        assert!(matches!(rig.step().readout, Readout::Volts(_)));

        rig.mode.press(false);
        assert!(matches!(rig.step().readout, Readout::Clock(_)));
    }

    #[test]
    fn pass_without_reset_only_waits_for_digits() {
        let mut rig = Rig::new();
        let step = rig.step();
        assert!(!step.reset);
        assert_eq!(*rig.waits.borrow(), [2, 2, 2, 2]);
        assert_eq!(rig.commits.0.borrow().len(), 4);
    }

    #[test]
    fn reset_zeroes_clock_and_debounces() {
        let mut rig = Rig::new();
        rig.clock.base = ElapsedTime::new(12, 34);
        rig.reset.press(true);

        let step = rig.step();

        assert!(step.reset);
        assert_eq!(step.readout, Readout::Clock(ElapsedTime::new(0, 0)));
        assert_eq!(*rig.waits.borrow(), [200, 2, 2, 2, 2]);
        let (digits, _) = rig.shown();
        assert_eq!(digits, [0, 0, 0, 0]);
    }

    #[test]
    fn clock_stays_zero_through_debounce_window() {
        let mut rig = Rig::new();
        // Just short of the next tick when the button goes down.
        rig.now.set(999);
        rig.clock.base = ElapsedTime::new(3, 0);
        rig.reset.press(true);
        rig.step();
        rig.reset.press(false);

        // Without re-arming, the alarm would have fired 1 ms into the debounce.
        while rig.now.get() < 999 + 1000 {
            let step = rig.step();
            assert_eq!(step.readout, Readout::Clock(ElapsedTime::new(0, 0)));
        }
        let step = rig.step();
        assert_eq!(step.readout, Readout::Clock(ElapsedTime::new(0, 1)));
    }

    #[test]
    fn tick_due_at_reset_is_dropped() {
        let mut rig = Rig::new();
        rig.clock.base = ElapsedTime::new(7, 41);
        rig.clock.pending = true;
        rig.reset.press(true);

        let step = rig.step();

        assert_eq!(step.readout, Readout::Clock(ElapsedTime::new(0, 0)));
        rig.reset.press(false);
        assert_eq!(rig.step().readout.value(), 0);
    }

    #[test]
    fn pending_tick_lands_without_reset() {
        let mut rig = Rig::new();
        rig.clock.base = ElapsedTime::new(7, 41);
        rig.clock.pending = true;
        assert_eq!(rig.step().readout, Readout::Clock(ElapsedTime::new(7, 42)));
    }

    #[test]
    fn held_reset_keeps_resetting() {
        let mut rig = Rig::new();
        rig.reset.press(true);
        for _ in 0..20 {
            let step = rig.step();
            assert!(step.reset);
            assert_eq!(step.readout.value(), 0);
        }
        // Twenty passes of 208 ms each would have ticked four times.
        assert!(rig.now.get() > 4000);
    }

    #[test]
    fn extrema_update_in_both_modes() {
        let mut rig = Rig::new();
        rig.set_volts(1.0);
        rig.step();
        rig.set_volts(0.5);
        rig.mode.press(true);
        rig.step();
        rig.set_volts(3.0);
        rig.mode.press(false);
        rig.step();
        rig.set_volts(2.0);
        rig.step();

        let extrema = rig.instrument.extrema();
        assert!((extrema.lowest - 0.5).abs() < 1e-4);
        assert!((extrema.highest - 3.0).abs() < 1e-4);
    }

    #[test]
    fn adc_failure_skips_refresh() {
        let mut rig = Rig::new();
        rig.sense.0.set(None);

        let result = rig.instrument.step(&mut rig.clock);

        assert_eq!(result, Err(Error::Adc));
        assert!(rig.commits.0.borrow().is_empty());
    }
}

use embedded_hal::blocking::delay::DelayMs;

use crate::clock::ElapsedTime;
use crate::config::DECIMAL_INDEX;
use crate::error::Result;
use crate::segment::{encode, with_decimal_point, DIGIT_SELECT};
use crate::shift_register::FrameSink;
use crate::voltmeter::centivolts;

pub const DIGITS: usize = 4;

/// One full refresh of the display: four digits, left to right, with an
/// optional decimal point on one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFrame {
    digits: [u8; DIGITS],
    decimal: Option<usize>,
}

impl DisplayFrame {
    /// Splits `value` into thousands, hundreds, tens and units.
    ///
    /// Negative values show as 0; values above 9999 keep their low four
    /// digits. A `decimal` index outside the display is ignored.
    pub fn new(value: i64, decimal: Option<usize>) -> Self {
        let value = value.max(0) as u64;
        let digits = [
            (value / 1000 % 10) as u8,
            (value / 100 % 10) as u8,
            (value / 10 % 10) as u8,
            (value % 10) as u8,
        ];
        DisplayFrame { digits, decimal }
    }

    pub fn digits(&self) -> [u8; DIGITS] {
        self.digits
    }

    pub fn decimal(&self) -> Option<usize> {
        self.decimal.filter(|&index| index < DIGITS)
    }

    /// `(segments, enable)` pairs in the order they are shifted out.
    pub fn cells(&self) -> [(u8, u8); DIGITS] {
        let mut cells = [(0, 0); DIGITS];
        for (index, cell) in cells.iter_mut().enumerate() {
            let mut pattern = encode(self.digits[index]);
            if self.decimal == Some(index) {
                pattern = with_decimal_point(pattern);
            }
            *cell = (pattern, DIGIT_SELECT[index]);
        }
        cells
    }
}

/// Persistence-of-vision driver: lights one digit at a time.
///
/// A single `render` call shows each digit once for `dwell_ms`; the
/// readout only looks steady if `render` is called again straight away.
pub struct Multiplexer<SINK> {
    sink: SINK,
    dwell_ms: u32,
}

impl<SINK: FrameSink> Multiplexer<SINK> {
    pub fn new(sink: SINK, dwell_ms: u32) -> Self {
        Multiplexer { sink, dwell_ms }
    }

    pub fn render<D: DelayMs<u32>>(
        &mut self,
        frame: &DisplayFrame,
        delay: &mut D,
    ) -> Result<(), SINK::Error> {
        for (segments, enable) in frame.cells() {
            self.sink.commit(segments, enable)?;
            delay.delay_ms(self.dwell_ms);
        }
        Ok(())
    }

    pub fn release(self) -> SINK {
        self.sink
    }
}

/// What the display shows in each mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Readout {
    /// Elapsed time as `MMSS`, no decimal point.
    Clock(ElapsedTime),
    /// Volts as `X.XX`.
    Volts(f32),
}

impl Readout {
    pub fn value(&self) -> u32 {
        match self {
            Readout::Clock(time) => time.display_value(),
            Readout::Volts(volts) => centivolts(*volts),
        }
    }

    pub fn frame(&self) -> DisplayFrame {
        let decimal = match self {
            Readout::Clock(_) => None,
            Readout::Volts(_) => Some(DECIMAL_INDEX),
        };
        DisplayFrame::new(i64::from(self.value()), decimal)
    }
}

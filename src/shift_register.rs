//! Bit-banged serial-in/parallel-out shift register (74HC595 style)

use embedded_hal::digital::v2::OutputPin;

use crate::error::{Error, Result};

/// Destination for one multiplexed digit: a segment pattern and the
/// digit enable mask, made visible together.
pub trait FrameSink {
    type Error;
    fn commit(&mut self, segments: u8, enable: u8) -> Result<(), Self::Error>;
}

/// Two chained 8-bit shift registers: the first byte shifted ends up on
/// the segment register, the second on the digit enable register.
pub struct ShiftRegister<DATA, CLOCK, LATCH> {
    data: DATA,
    clock: CLOCK,
    latch: LATCH,
}

impl<DATA, CLOCK, LATCH, E> ShiftRegister<DATA, CLOCK, LATCH>
where
    DATA: OutputPin<Error = E>,
    CLOCK: OutputPin<Error = E>,
    LATCH: OutputPin<Error = E>,
{
    pub fn new(data: DATA, clock: CLOCK, latch: LATCH) -> Self {
        ShiftRegister { data, clock, latch }
    }

    /// Shifts one byte out, MSB first, one clock pulse per bit.
    pub fn shift_out(&mut self, value: u8) -> Result<(), E> {
        for bit in (0..8).rev() {
            if value & (1 << bit) != 0 {
                self.data.set_high().map_err(Error::Pin)?;
            } else {
                self.data.set_low().map_err(Error::Pin)?;
            }
            self.clock.set_high().map_err(Error::Pin)?;
            self.clock.set_low().map_err(Error::Pin)?;
        }
        Ok(())
    }
}

impl<DATA, CLOCK, LATCH, E> FrameSink for ShiftRegister<DATA, CLOCK, LATCH>
where
    DATA: OutputPin<Error = E>,
    CLOCK: OutputPin<Error = E>,
    LATCH: OutputPin<Error = E>,
{
    type Error = E;

    fn commit(&mut self, segments: u8, enable: u8) -> Result<(), E> {
        self.latch.set_low().map_err(Error::Pin)?;
        self.shift_out(segments)?;
        self.shift_out(enable)?;
        self.latch.set_high().map_err(Error::Pin)
    }
}

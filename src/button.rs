use embedded_hal::digital::v2::InputPin;

use crate::error::{Error, Result};

/// Push-button wired to ground with a pull-up, so pressed reads low.
pub struct Button<P> {
    pin: P,
}

impl<P, E> Button<P>
where
    P: InputPin<Error = E>,
{
    pub fn new(pin: P) -> Self {
        Button { pin }
    }

    pub fn is_pressed(&self) -> Result<bool, E> {
        self.pin.is_low().map_err(Error::Pin)
    }
}

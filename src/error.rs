pub type Result<T, PIN> = core::result::Result<T, Error<PIN>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<PIN> {
    // GPIO error from a shift register line or a button
    Pin(PIN),
    // ADC conversion not available
    Adc,
}

//! Compile-time configuration

/// Full-scale voltage of the sense input.
pub const REFERENCE_VOLTS: f32 = 3.3;

/// Largest raw value of the 12-bit ADC.
pub const ADC_FULL_SCALE: u16 = 4095;

/// Digit that carries the decimal point in voltmeter mode (`X.XX`).
pub const DECIMAL_INDEX: usize = 1;

/// Blocking delays used by the main loop and the tick period of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// How long each digit stays lit before the next one is selected.
    pub digit_dwell_ms: u32,
    /// Hold after a reset press so one press clears the clock once.
    pub reset_debounce_ms: u32,
    pub tick_period_us: u32,
}

impl Timing {
    pub const DEFAULT: Timing = Timing {
        digit_dwell_ms: 2,
        reset_debounce_ms: 200,
        tick_period_us: 1_000_000,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

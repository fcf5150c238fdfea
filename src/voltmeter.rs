//! Voltage sampling of the analog sense input

use crate::config::REFERENCE_VOLTS;
use crate::error::{Error, Result};

/// Analog input scaled to `0.0..=1.0` of full scale.
pub trait AnalogInput {
    /// Returns `None` if the converter has no sample to give.
    fn read_normalized(&mut self) -> Option<f32>;
}

/// Lowest and highest voltage seen since boot.
///
/// Starts inverted (`lowest` at full scale, `highest` at zero) so the
/// first sample sets both bounds. The range only ever widens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageExtrema {
    pub lowest: f32,
    pub highest: f32,
}

impl VoltageExtrema {
    pub const fn new() -> Self {
        VoltageExtrema {
            lowest: REFERENCE_VOLTS,
            highest: 0.0,
        }
    }

    pub fn record(&mut self, volts: f32) {
        if volts < self.lowest {
            self.lowest = volts;
        }
        if volts > self.highest {
            self.highest = volts;
        }
    }
}

impl Default for VoltageExtrema {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Voltmeter<ADC> {
    input: ADC,
    extrema: VoltageExtrema,
}

impl<ADC: AnalogInput> Voltmeter<ADC> {
    pub fn new(input: ADC) -> Self {
        Voltmeter {
            input,
            extrema: VoltageExtrema::new(),
        }
    }

    /// Reads the input once and returns it in volts. Readings are not
    /// filtered or clamped.
    pub fn sample<PIN>(&mut self) -> Result<f32, PIN> {
        let normalized = self.input.read_normalized().ok_or(Error::Adc)?;
        let volts = normalized * REFERENCE_VOLTS;
        self.extrema.record(volts);
        Ok(volts)
    }

    pub fn extrema(&self) -> VoltageExtrema {
        self.extrema
    }
}

/// Volts as hundredths, rounded to nearest. Negative readings give 0.
pub fn centivolts(volts: f32) -> u32 {
    if volts.is_nan() || volts <= 0.0 {
        return 0;
    }
    (volts * 100.0 + 0.5) as u32
}

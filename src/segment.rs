//! Active-low 7-segment patterns for a common-anode display
//!
//! Bit layout (before inversion): `0b P G F E D C B A`, so bit 7 is the
//! decimal point. A cleared bit lights its segment.

/// Digit patterns 0-9.
pub const SEGMENT_CODES: [u8; 10] = [
    !0x3F, // 0
    !0x06, // 1
    !0x5B, // 2
    !0x4F, // 3
    !0x66, // 4
    !0x6D, // 5
    !0x7D, // 6
    !0x07, // 7
    !0x7F, // 8
    !0x6F, // 9
];

/// One-hot digit enable masks, left to right.
pub const DIGIT_SELECT: [u8; 4] = [0x01, 0x02, 0x04, 0x08];

/// Decimal point bit; cleared to light it.
pub const DECIMAL_POINT: u8 = 0x80;

/// Pattern for a decimal digit. The digit is reduced modulo 10.
pub fn encode(digit: u8) -> u8 {
    SEGMENT_CODES[(digit % 10) as usize]
}

pub fn with_decimal_point(pattern: u8) -> u8 {
    pattern & !DECIMAL_POINT
}

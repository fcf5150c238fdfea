//! Elapsed-time clock and voltmeter for a 4-digit multiplexed 7-segment display
//!
//! The display is common-anode and driven through a pair of shift registers
//! (segment pattern + digit enable). Everything here is generic over
//! `embedded-hal` traits; the RTIC application in `main.rs` binds it to the
//! RP2040.

#![cfg_attr(not(test), no_std)]

pub mod arbiter;
pub mod button;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod segment;
pub mod shift_register;
pub mod voltmeter;

pub use arbiter::Instrument;
pub use clock::{ElapsedTime, TimeSource};
pub use display::{DisplayFrame, Multiplexer, Readout};
pub use error::{Error, Result};

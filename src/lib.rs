//! I2C bus scanner: checks SCL/SDA pull-ups, then probes every non-reserved
//! 7-bit address at one or more clock speeds.
//!
//! The protocol core works against [`PinSource`] and [`BusOpener`], which
//! hand out `embedded-hal` 1.0 pins and buses. [`raspi`] implements both on
//! a Raspberry Pi through rppal.

pub mod address;
pub mod error;
pub mod pins;
pub mod raspi;
pub mod report;
pub mod scan;
pub mod scanner;
pub mod speed;

pub use address::{is_reserved, Address};
pub use error::{ScanError, SpeedError};
pub use pins::{check_pins, verify_pins, Line, PinCheck, PinSource};
pub use scan::scan_bus;
pub use scanner::{scan_speeds, BusOpener, ScanResult, Scanner};
pub use speed::{BusSpeed, DEFAULT_SPEEDS};

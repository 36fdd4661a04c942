//! module for the pull-up precheck on SCL and SDA
//!
//! Each line is opened as an input with the internal pull-down enabled and
//! read once. An external pull-up strong enough for I2C overrides the
//! pull-down and reads high; a missing one reads low. A line held low by a
//! stuck device or a short reads the same as a missing pull-up.
use std::fmt;

use embedded_hal::digital::{Error as _, InputPin};

use crate::error::ScanError;

/// The two I2C lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    Scl,
    Sda,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scl => f.write_str("SCL"),
            Self::Sda => f.write_str("SDA"),
        }
    }
}

/// Source of pull-down configured input pins.
///
/// The returned pin is owned; dropping it must release the line so the bus
/// peripheral can reclaim it.
pub trait PinSource {
    type Pin: InputPin;
    type Error: std::error::Error + Send + Sync + 'static;

    fn open_pull_down(&mut self, line: Line) -> Result<Self::Pin, Self::Error>;
}

impl<T: PinSource + ?Sized> PinSource for &mut T {
    type Pin = T::Pin;
    type Error = T::Error;

    fn open_pull_down(&mut self, line: Line) -> Result<Self::Pin, Self::Error> {
        (**self).open_pull_down(line)
    }
}

/// Outcome of the pull-up check per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinCheck {
    pub scl_ready: bool,
    pub sda_ready: bool,
}

impl PinCheck {
    pub fn is_ready(&self) -> bool {
        self.scl_ready && self.sda_ready
    }
}

/// Check SCL then SDA. Both lines are read even when SCL fails so the
/// result describes the whole bus.
///
/// `i2c_pins_ready` is written on every exit path, 0 unless both lines read
/// high.
pub fn check_pins<P: PinSource>(pins: &mut P) -> Result<PinCheck, ScanError> {
    log::info!("validating SCL and SDA pins");
    let check = read_lines(pins);
    let ready = matches!(&check, Ok(c) if c.is_ready());
    metrics::gauge!("i2c_pins_ready").set(if ready { 1.0 } else { 0.0 });

    let check = check?;
    if ready {
        log::info!("SCL and SDA validated successfully");
    }
    return Ok(check);
}

/// pass/fail form of [`check_pins`]. Acquire or read errors count as failure.
pub fn verify_pins<P: PinSource>(pins: &mut P) -> bool {
    match check_pins(pins) {
        Ok(check) => check.is_ready(),
        Err(e) => {
            log::warn!("pin check aborted: {}", e);
            false
        }
    }
}

fn read_lines<P: PinSource>(pins: &mut P) -> Result<PinCheck, ScanError> {
    let scl_ready = line_pulled_up(pins, Line::Scl)?;
    let sda_ready = line_pulled_up(pins, Line::Sda)?;
    return Ok(PinCheck {
        scl_ready,
        sda_ready,
    });
}

fn line_pulled_up<P: PinSource>(pins: &mut P, line: Line) -> Result<bool, ScanError> {
    let high = {
        let mut pin = pins
            .open_pull_down(line)
            .map_err(|e| ScanError::PinAcquire {
                line,
                source: Box::new(e),
            })?;
        pin.is_high().map_err(|e| ScanError::PinRead {
            line,
            kind: e.kind(),
        })?
    };

    if !high {
        log::warn!("{} does not appear to have a pull-up resistor", line);
    }
    return Ok(high);
}

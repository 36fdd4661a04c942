//! module for rendering scan results
use std::fmt;

use crate::{
    address::{self, Address, ADDRESS_LIMIT},
    speed::BusSpeed,
};

/// `Found 2 devices @ 100kHz: 0x20, 0x48`
pub fn summary_line(speed: BusSpeed, addresses: &[Address]) -> String {
    let list = addresses
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let noun = if addresses.len() == 1 { "device" } else { "devices" };
    if list.is_empty() {
        return format!("Found 0 devices @ {}", speed);
    }
    return format!("Found {} {} @ {}: {}", addresses.len(), noun, speed, list);
}

/// i2cdetect-style table: responders print their address, silent addresses
/// print `--`, reserved addresses are left blank.
pub struct Grid<'a> {
    found: &'a [Address],
}

impl<'a> Grid<'a> {
    pub fn new(found: &'a [Address]) -> Self {
        Self { found }
    }
}

impl fmt::Display for Grid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..16 {
            write!(f, " {:2x}", col)?;
        }
        writeln!(f)?;

        for row in 0..8u8 {
            write!(f, "{:02x}:", row << 4)?;
            for col in 0..16u8 {
                let raw = (row << 4) | col;
                if raw >= ADDRESS_LIMIT || address::is_reserved(raw) {
                    write!(f, "   ")?;
                } else if let Some(address) = self.found.iter().find(|a| a.get() == raw) {
                    write!(f, " {:02x}", address)?;
                } else {
                    write!(f, " --")?;
                }
            }
            if row < 7 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

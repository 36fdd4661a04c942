//! module for I2C bus clock speeds
use std::fmt;

/// Nominal I2C clock rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum BusSpeed {
    /// 100 kHz
    Standard,
    /// 400 kHz
    Fast,
    /// 1 MHz
    FastPlus,
}

/// Scanned when the caller asks for no particular speed. Most hardware
/// supports at least Standard, so the widest-supported speed goes first.
pub const DEFAULT_SPEEDS: [BusSpeed; 3] = [BusSpeed::Standard, BusSpeed::Fast, BusSpeed::FastPlus];

impl BusSpeed {
    pub const fn hz(self) -> u32 {
        match self {
            Self::Standard => 100_000,
            Self::Fast => 400_000,
            Self::FastPlus => 1_000_000,
        }
    }

    pub const fn khz(self) -> u32 {
        self.hz() / 1000
    }

    /// metric label value
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Fast => "fast",
            Self::FastPlus => "fast_plus",
        }
    }

    pub fn from_hz(hz: u32) -> Option<Self> {
        DEFAULT_SPEEDS.into_iter().find(|s| s.hz() == hz)
    }
}

impl fmt::Display for BusSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}kHz", self.khz())
    }
}

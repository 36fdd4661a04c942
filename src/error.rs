//! error types for the pin precheck and per-speed bus failures
use std::error::Error as StdError;

use crate::{
    pins::{Line, PinCheck},
    speed::BusSpeed,
};

pub(crate) type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failures that stop a scan before any speed is tried.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("pull-up check failed (SCL ready: {}, SDA ready: {})", .0.scl_ready, .0.sda_ready)]
    PinsNotReady(PinCheck),

    #[error("failed to acquire {line} as pull-down input")]
    PinAcquire {
        line: Line,
        #[source]
        source: BoxError,
    },

    #[error("failed to read {line} level: {kind:?}")]
    PinRead {
        line: Line,
        kind: embedded_hal::digital::ErrorKind,
    },
}

/// The bus could not be brought up at `speed`. Recovered by the orchestrator.
#[derive(Debug, thiserror::Error)]
#[error("failed to open bus at {speed}")]
pub struct SpeedError {
    pub speed: BusSpeed,
    #[source]
    pub source: BoxError,
}

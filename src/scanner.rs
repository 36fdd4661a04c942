//! module for scanning at several bus speeds behind the pull-up precheck
use std::time::{SystemTime, UNIX_EPOCH};

use embedded_hal::i2c::I2c;

use crate::{
    address::Address,
    error::{ScanError, SpeedError},
    pins::{self, PinCheck, PinSource},
    scan::scan_bus,
    speed::{BusSpeed, DEFAULT_SPEEDS},
};

/// Opens the bus at a requested clock speed.
///
/// The returned handle is owned for one speed's scan and dropped before the
/// next speed is opened.
pub trait BusOpener {
    type Bus: I2c;
    type Error: std::error::Error + Send + Sync + 'static;

    fn open(&mut self, speed: BusSpeed) -> Result<Self::Bus, Self::Error>;
}

impl<T: BusOpener + ?Sized> BusOpener for &mut T {
    type Bus = T::Bus;
    type Error = T::Error;

    fn open(&mut self, speed: BusSpeed) -> Result<Self::Bus, Self::Error> {
        (**self).open(speed)
    }
}

/// Responding addresses per speed, in the order the speeds were scanned.
///
/// A speed with no entry could not be opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    entries: Vec<(BusSpeed, Vec<Address>)>,
}

impl ScanResult {
    pub fn get(&self, speed: BusSpeed) -> Option<&[Address]> {
        self.entries
            .iter()
            .find(|(s, _)| *s == speed)
            .map(|(_, addresses)| addresses.as_slice())
    }

    pub fn contains(&self, speed: BusSpeed) -> bool {
        self.get(speed).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn speeds(&self) -> impl Iterator<Item = BusSpeed> + '_ {
        self.entries.iter().map(|(s, _)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BusSpeed, &[Address])> {
        self.entries.iter().map(|(s, a)| (*s, a.as_slice()))
    }

    fn insert(&mut self, speed: BusSpeed, addresses: Vec<Address>) {
        debug_assert!(!self.contains(speed));
        self.entries.push((speed, addresses));
    }
}

/// Pull-up check followed by one scan per requested speed.
#[derive(Debug)]
pub struct Scanner<P, B> {
    pins: P,
    buses: B,
}

impl<P: PinSource, B: BusOpener> Scanner<P, B> {
    pub fn new(pins: P, buses: B) -> Self {
        Self { pins, buses }
    }

    pub fn check_pins(&mut self) -> Result<PinCheck, ScanError> {
        pins::check_pins(&mut self.pins)
    }

    pub fn verify_pins(&mut self) -> bool {
        pins::verify_pins(&mut self.pins)
    }

    /// Gate on the pull-up check, then scan each speed in order (the default
    /// speeds if `speeds` is empty). A speed whose bus cannot be opened is
    /// left out of the result; the others still run.
    pub fn verify_and_scan(&mut self, speeds: &[BusSpeed]) -> Result<ScanResult, ScanError> {
        match self.check_pins() {
            Ok(check) if check.is_ready() => {}
            Ok(check) => {
                clear_device_gauges(speeds);
                return Err(ScanError::PinsNotReady(check));
            }
            Err(e) => {
                clear_device_gauges(speeds);
                return Err(e);
            }
        }
        return Ok(scan_speeds(&mut self.buses, speeds));
    }
}

fn effective_speeds(speeds: &[BusSpeed]) -> &[BusSpeed] {
    if speeds.is_empty() {
        return &DEFAULT_SPEEDS;
    }
    return speeds;
}

/// an aborted scan found nothing at any requested speed
fn clear_device_gauges(speeds: &[BusSpeed]) {
    for &speed in effective_speeds(speeds) {
        metrics::gauge!("i2c_devices_found", "speed" => speed.label()).set(0.0);
    }
}

/// Scan each speed without the pull-up gate.
///
/// `last_scan_timestamp_ms` is only set once every speed has been tried, so
/// an aborted scan leaves it pointing at the last completed one.
pub fn scan_speeds<B: BusOpener>(buses: &mut B, speeds: &[BusSpeed]) -> ScanResult {
    let speeds = effective_speeds(speeds);

    let mut result = ScanResult::default();
    let mut attempted = Vec::with_capacity(speeds.len());
    for &speed in speeds {
        if attempted.contains(&speed) {
            log::warn!("{} requested more than once, skipping repeat", speed);
            continue;
        }
        attempted.push(speed);

        log::info!("scanning I2C bus @ {}", speed);
        match scan_at(buses, speed) {
            Ok(addresses) => {
                log::info!("scan @ {} complete, {} device(s)", speed, addresses.len());
                metrics::gauge!("i2c_devices_found", "speed" => speed.label())
                    .set(addresses.len() as f64);
                result.insert(speed, addresses);
            }
            Err(e) => {
                log::warn!("{}: {}", e, e.source);
                metrics::gauge!("i2c_devices_found", "speed" => speed.label()).set(0.0);
                metrics::counter!("i2c_speed_failures_total", "speed" => speed.label())
                    .increment(1);
            }
        }
    }

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .inspect_err(|e| log::warn!("failed to get current time: {:?}", e))
        .map(|d| d.as_millis() as f64)
        .unwrap_or_default();
    metrics::gauge!("last_scan_timestamp_ms").set(timestamp);
    return result;
}

fn scan_at<B: BusOpener>(buses: &mut B, speed: BusSpeed) -> Result<Vec<Address>, SpeedError> {
    let mut bus = buses.open(speed).map_err(|e| SpeedError {
        speed,
        source: Box::new(e),
    })?;
    return Ok(scan_bus(&mut bus));
}

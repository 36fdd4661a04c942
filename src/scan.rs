//! module for probing every scannable address on one open bus
use embedded_hal::i2c::{self, Error as _};

use crate::address::Address;

/// Probe 0x00..=0x7E in ascending order with a one-byte read and collect the
/// addresses that acknowledged.
///
/// Reserved addresses are skipped without a transaction. Any probe error
/// (nack, timeout, arbitration loss) means "no device here"; a missing
/// device and bad wiring look the same at this layer.
pub fn scan_bus<I: i2c::I2c>(bus: &mut I) -> Vec<Address> {
    let mut found = Vec::new();
    let mut buf = [0u8; 1];

    for address in Address::scan_range().filter(|a| !a.is_reserved()) {
        match bus.read(address.get(), &mut buf) {
            Ok(()) => {
                log::debug!("device acknowledged at {}", address);
                found.push(address);
            }
            Err(e) => log::trace!("no response at {}: {:?}", address, e.kind()),
        }
    }
    return found;
}

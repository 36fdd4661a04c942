//! module for 7-bit I2C addresses and the reserved ranges that must never be probed
use std::fmt;

/// first address past the 7-bit scan range (0x7F itself is never scanned)
pub const ADDRESS_LIMIT: u8 = 0x7F;

/// `true` iff `address` is in 0x00..=0x07 or 0x78..=0x7F.
///
/// Those ranges carry general call, START byte, CBUS, HS-mode master codes and
/// 10-bit addressing prefixes. Probing them can switch bus modes instead of
/// producing a plain ack/nack.
pub const fn is_reserved(address: u8) -> bool {
    matches!(address, 0x00..=0x07 | 0x78..=0x7F)
}

/// A 7-bit device address in `0..0x7F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u8);

impl Address {
    pub const fn new(raw: u8) -> Option<Self> {
        if raw < ADDRESS_LIMIT {
            return Some(Self(raw));
        }
        return None;
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn is_reserved(self) -> bool {
        is_reserved(self.0)
    }

    /// every address from 0x00 to 0x7E, ascending. Reserved ones are included;
    /// callers filter them.
    pub fn scan_range() -> impl Iterator<Item = Address> {
        (0..ADDRESS_LIMIT).map(Address)
    }
}

impl From<Address> for u8 {
    fn from(address: Address) -> u8 {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_ranges_are_exact() {
        for a in 0..ADDRESS_LIMIT {
            let expected = a <= 0x07 || a >= 0x78;
            assert_eq!(is_reserved(a), expected, "address {a:#04x}");
        }
    }

    #[test]
    fn range_edges() {
        assert!(is_reserved(0x07));
        assert!(!is_reserved(0x08));
        assert!(!is_reserved(0x77));
        assert!(is_reserved(0x78));
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert_eq!(Address::new(0x7E).map(Address::get), Some(0x7E));
        assert!(Address::new(0x7F).is_none());
        assert!(Address::new(0xFF).is_none());
    }

    #[test]
    fn scan_range_is_ascending_and_complete() {
        let all: Vec<u8> = Address::scan_range().map(u8::from).collect();
        assert_eq!(all.len(), 127);
        assert_eq!(all.first(), Some(&0x00));
        assert_eq!(all.last(), Some(&0x7E));
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn display_formats() {
        let a = Address::new(0x48).unwrap();
        assert_eq!(a.to_string(), "0x48");
        assert_eq!(format!("{a:02x}"), "48");
    }
}

//! IEEE 802.11 addressing related fields.

use core::fmt;

use dot11_util::{Error, Result};

/// Length of a hardware address in octets.
pub const ADDRESS_LENGTH: usize = 6;

/// An IEEE 802 MAC-48 hardware address.
///
/// Stored in transmission order, i.e. the order the octets appear on the
/// wire and in the usual colon notation.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct MacAddress([u8; ADDRESS_LENGTH]);

impl MacAddress {
    /// The broadcast address, ff:ff:ff:ff:ff:ff.
    pub const BROADCAST: MacAddress = MacAddress([0xff; ADDRESS_LENGTH]);

    pub const fn new(octets: [u8; ADDRESS_LENGTH]) -> Self {
        Self(octets)
    }

    /// Create an address from a byte slice.
    ///
    /// Returns an error unless the slice is exactly six bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ADDRESS_LENGTH {
            return Err(Error);
        }
        let mut octets = [0; ADDRESS_LENGTH];
        octets.copy_from_slice(bytes);
        Ok(Self(octets))
    }

    /// Parse an address from hex notation, with or without `:`/`-`
    /// separators ("00:22:3f:cd:9c:26", "00223FCD9C26").
    pub fn parse(address: &str) -> Result<Self> {
        let mut octets = [0u8; ADDRESS_LENGTH];
        let mut index = 0;
        let mut nibbles = 0usize;
        let mut current = 0u8;
        for c in address.chars() {
            if c == ':' || c == '-' {
                continue;
            }
            let digit = c.to_digit(16).ok_or(Error)? as u8;
            current = (current << 4) | digit;
            nibbles += 1;
            if nibbles % 2 == 0 {
                if index == ADDRESS_LENGTH {
                    return Err(Error);
                }
                octets[index] = current;
                index += 1;
                current = 0;
            }
        }
        if nibbles != 2 * ADDRESS_LENGTH {
            return Err(Error);
        }
        Ok(Self(octets))
    }

    /// Return the address octets in transmission order.
    pub const fn octets(&self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    /// Query whether this is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Query whether the group bit is set.
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }
}

impl AsRef<[u8]> for MacAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LENGTH]> for MacAddress {
    fn from(octets: [u8; ADDRESS_LENGTH]) -> Self {
        Self(octets)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

//! IEEE 802.11 Block Ack / Block Ack Request control field.
//!
//! ```notrust
//! +------------+-----------+-------------------+----------+-----+
//! | Ack Policy | Multi-TID | Compressed Bitmap | Reserved | TID |
//! +------------+-----------+-------------------+----------+-----+
//!        1           1               1               9        4
//! ```

use bitfield_struct::bitfield;

/// How the recipient of a block ack request is expected to respond.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AckPolicy {
    /// The block ack may follow in a later TXOP.
    Delayed = 0,
    /// The block ack is expected in the same TXOP.
    Immediate = 1,
}

impl AckPolicy {
    // This has to be a const fn
    const fn into_bits(self) -> u8 {
        self as _
    }
    const fn from_bits(value: u8) -> Self {
        match value {
            0 => Self::Delayed,
            _ => Self::Immediate,
        }
    }
}

/// The 16-bit control word of block acknowledgments and their requests.
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
pub struct BlockAckControl {
    #[bits(1)]
    pub policy: AckPolicy,
    pub multi_tid: bool,
    pub compressed_bitmap: bool,
    #[bits(9)]
    _reserved: u16,
    #[bits(4)]
    pub tid: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_field_isolation() {
        let control = BlockAckControl::new()
            .with_policy(AckPolicy::Immediate)
            .with_compressed_bitmap(true)
            .with_tid(5);
        assert_eq!(control.into_bits(), 0x5005);
        assert_eq!(control.policy(), AckPolicy::Immediate);
        assert!(!control.multi_tid());
        assert!(control.compressed_bitmap());
        assert_eq!(control.tid(), 5);

        let control = control.with_tid(0);
        assert_eq!(control.into_bits(), 0x0005);
    }

    #[test]
    fn unmutated_round_trip() {
        for word in [0x0000u16, 0x5005, 0xf007, 0xffff] {
            assert_eq!(BlockAckControl::from_bits(word).into_bits(), word);
        }
    }
}

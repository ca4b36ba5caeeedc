//! IEEE 802.11 Sequence Control field.
//!
//! ```notrust
//! +-----------------+-----------------+
//! | Fragment Number | Sequence Number |
//! +-----------------+-----------------+
//!          4                 12
//! ```

use bitfield_struct::bitfield;

/// The 16-bit sequence control word of frames that carry one.
///
/// The same layout backs the Block Ack Starting Sequence Control field.
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
pub struct SequenceControl {
    #[bits(4)]
    pub fragment_number: u8,
    #[bits(12)]
    pub sequence_number: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_field_isolation() {
        let sc = SequenceControl::new()
            .with_fragment_number(0)
            .with_sequence_number(1468);
        assert_eq!(sc.into_bits(), 1468 << 4);
        assert_eq!(sc.fragment_number(), 0);
        assert_eq!(sc.sequence_number(), 1468);

        let sc = sc.with_fragment_number(0xf);
        assert_eq!(sc.sequence_number(), 1468);
        assert_eq!(sc.fragment_number(), 0xf);

        let sc = sc.with_sequence_number(0xfff);
        assert_eq!(sc.fragment_number(), 0xf);
        assert_eq!(sc.into_bits(), 0xffff);
    }

    #[test]
    fn unmutated_round_trip() {
        for word in [0x0000u16, 0x5bc0, 0x0771, 0xffff] {
            assert_eq!(SequenceControl::from_bits(word).into_bits(), word);
        }
    }
}

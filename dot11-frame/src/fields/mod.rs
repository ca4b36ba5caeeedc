//! Field definitions shared by all MAC frame types: the decomposed control
//! words and the base field-layout table.

mod block_ack_control;
mod capability_information;
mod frame_control;
mod sequence_control;

pub use block_ack_control::*;
pub use capability_information::*;
pub use frame_control::*;
pub use sequence_control::*;

/// Byte offsets of the fields every MAC frame shares, anchored at the frame
/// control word.
///
/// All offsets are running sums of the preceding fixed-field widths.
/// Subtype-specific tables in the `mac` module continue these sums the same
/// way, so relocating a field means touching exactly one constant.
pub mod layout {
    use crate::addressing::ADDRESS_LENGTH;

    pub const FRAME_CONTROL: usize = 0;
    pub const FRAME_CONTROL_LENGTH: usize = 2;

    pub const DURATION_ID: usize = FRAME_CONTROL + FRAME_CONTROL_LENGTH;
    pub const DURATION_ID_LENGTH: usize = 2;

    /// Offset of the first address field.
    pub const ADDRESS1: usize = DURATION_ID + DURATION_ID_LENGTH;

    pub const SEQUENCE_CONTROL_LENGTH: usize = 2;

    /// Width of the trailing frame check sequence.
    pub const FCS_LENGTH: usize = 4;

    /// Offset of the n-th (zero-based) contiguous address field.
    pub const fn address(index: usize) -> usize {
        ADDRESS1 + index * ADDRESS_LENGTH
    }

    /// Offset of the sequence control word of frames carrying three
    /// addresses (management and data frames).
    pub const SEQUENCE_CONTROL: usize = address(3);

    /// Fixed width of the management header: frame control, duration, three
    /// addresses and sequence control.
    pub const MGMT_HEADER_LENGTH: usize = SEQUENCE_CONTROL + SEQUENCE_CONTROL_LENGTH;

    /// Offset of the fourth address of wireless-bridge data frames. It
    /// follows the sequence control word, not the third address.
    pub const ADDRESS4: usize = SEQUENCE_CONTROL + SEQUENCE_CONTROL_LENGTH;

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn running_sums() {
            assert_eq!(DURATION_ID, 2);
            assert_eq!(ADDRESS1, 4);
            assert_eq!(address(1), 10);
            assert_eq!(address(2), 16);
            assert_eq!(SEQUENCE_CONTROL, 22);
            assert_eq!(MGMT_HEADER_LENGTH, 24);
            assert_eq!(ADDRESS4, 24);
        }
    }
}

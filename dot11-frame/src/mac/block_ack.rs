//! Block acknowledgment frames and their solicitations.

use byteorder::{ByteOrder, LE};
use dot11_util::{Error, Result};

use crate::{
    addressing::MacAddress,
    fields::{layout, BlockAckControl, FrameControl, FrameSubtype, SequenceControl},
    FrameView, FrameViewMut, Segment,
};

/// Field layout of the block ack family, continuing the two-address control
/// header.
mod field {
    use crate::addressing::ADDRESS_LENGTH;
    use crate::fields::layout::ADDRESS1;

    pub const CONTROL: usize = ADDRESS1 + 2 * ADDRESS_LENGTH;
    pub const CONTROL_LENGTH: usize = 2;
    pub const STARTING_SEQUENCE_CONTROL: usize = CONTROL + CONTROL_LENGTH;
    pub const STARTING_SEQUENCE_CONTROL_LENGTH: usize = 2;
    pub const BITMAP: usize = STARTING_SEQUENCE_CONTROL + STARTING_SEQUENCE_CONTROL_LENGTH;
}

/// Bitmap width selected by the compressed-bitmap flag of the control word.
const fn bitmap_length(control: BlockAckControl) -> usize {
    if control.compressed_bitmap() {
        8
    } else {
        128
    }
}

/// A block ack request, soliciting one batched acknowledgment for the
/// window starting at the given sequence control.
#[derive(Debug)]
pub struct BlockAckRequestFrame<Bytes> {
    segment: Segment<Bytes>,
}

/// A block acknowledgment, batching per-frame acknowledgments into one
/// bitmap.
#[derive(Debug)]
pub struct BlockAckFrame<Bytes> {
    segment: Segment<Bytes>,
}

macro_rules! block_ack_common {
    ($Frame:ident) => {
        impl<Bytes: AsRef<[u8]>> $Frame<Bytes> {
            pub fn new(segment: Segment<Bytes>) -> Self {
                Self { segment }
            }

            /// Receiver address (address 1).
            pub fn receiver(&self) -> Option<MacAddress> {
                self.address(0)
            }

            /// Transmitter address (address 2).
            pub fn transmitter(&self) -> Option<MacAddress> {
                self.address(1)
            }

            /// The block ack control word.
            pub fn block_ack_control(&self) -> Option<BlockAckControl> {
                let bytes = self.frame_ref();
                if field::CONTROL + field::CONTROL_LENGTH > bytes.len() {
                    return None;
                }
                Some(BlockAckControl::from_bits(LE::read_u16(
                    &bytes[field::CONTROL..],
                )))
            }

            /// First sequence number the acknowledgment window covers.
            pub fn starting_sequence_control(&self) -> Option<SequenceControl> {
                let bytes = self.frame_ref();
                if field::STARTING_SEQUENCE_CONTROL + field::STARTING_SEQUENCE_CONTROL_LENGTH
                    > bytes.len()
                {
                    return None;
                }
                Some(SequenceControl::from_bits(LE::read_u16(
                    &bytes[field::STARTING_SEQUENCE_CONTROL..],
                )))
            }

            pub fn into_inner(self) -> Segment<Bytes> {
                self.segment
            }
        }

        impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> $Frame<Bytes> {
            /// Write the block ack control word.
            pub fn set_block_ack_control(&mut self, control: BlockAckControl) {
                LE::write_u16(
                    &mut self.frame_mut()[field::CONTROL..field::CONTROL + 2],
                    control.into_bits(),
                );
            }

            /// Write the starting sequence control word.
            pub fn set_starting_sequence_control(&mut self, sc: SequenceControl) {
                LE::write_u16(
                    &mut self.frame_mut()[field::STARTING_SEQUENCE_CONTROL
                        ..field::STARTING_SEQUENCE_CONTROL + 2],
                    sc.into_bits(),
                );
            }
        }

        impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> FrameViewMut for $Frame<Bytes> {
            fn frame_mut(&mut self) -> &mut [u8] {
                self.segment.as_mut()
            }
        }
    };
}

block_ack_common!(BlockAckRequestFrame);
block_ack_common!(BlockAckFrame);

impl<Bytes: AsRef<[u8]>> FrameView for BlockAckRequestFrame<Bytes> {
    fn frame_ref(&self) -> &[u8] {
        self.segment.as_ref()
    }

    fn frame_size(&self) -> usize {
        field::BITMAP
    }
}

impl<Bytes: AsRef<[u8]>> BlockAckFrame<Bytes> {
    /// The acknowledgment bitmap; its width follows the compressed-bitmap
    /// flag. Absent when the buffer ends before the bitmap does.
    pub fn bitmap(&self) -> Option<&[u8]> {
        let control = self.block_ack_control()?;
        let bytes = self.frame_ref();
        let end = field::BITMAP + bitmap_length(control);
        if end > bytes.len() {
            return None;
        }
        Some(&bytes[field::BITMAP..end])
    }
}

impl<Bytes: AsRef<[u8]>> FrameView for BlockAckFrame<Bytes> {
    fn frame_ref(&self) -> &[u8] {
        self.segment.as_ref()
    }

    fn frame_size(&self) -> usize {
        match self.block_ack_control() {
            Some(control) => field::BITMAP + bitmap_length(control),
            None => field::BITMAP,
        }
    }
}

/// Bytes needed for a block ack request, including the FCS.
pub const BLOCK_ACK_REQUEST_BUFFER_LENGTH: usize = field::BITMAP + layout::FCS_LENGTH;

/// Initialize a block ack request from scratch in `buffer`.
///
/// The FCS is left for an explicit [`FrameViewMut::update_fcs()`]. The
/// buffer must be exactly [`BLOCK_ACK_REQUEST_BUFFER_LENGTH`] bytes long.
pub fn block_ack_request_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    receiver: MacAddress,
    transmitter: MacAddress,
    control: BlockAckControl,
    starting_sequence: SequenceControl,
    buffer: Bytes,
) -> Result<BlockAckRequestFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if segment.len() != BLOCK_ACK_REQUEST_BUFFER_LENGTH {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = BlockAckRequestFrame { segment };
    frame.set_frame_control(FrameControl::new().with_subtype(FrameSubtype::BlockAckRequest));
    frame.set_address(0, receiver);
    frame.set_address(1, transmitter);
    frame.set_block_ack_control(control);
    frame.set_starting_sequence_control(starting_sequence);
    Ok(frame)
}

/// Bytes needed for a block ack carrying the bitmap selected by `control`,
/// including the FCS.
pub const fn block_ack_buffer_length(control: BlockAckControl) -> usize {
    field::BITMAP + bitmap_length(control) + layout::FCS_LENGTH
}

/// Initialize a block ack from scratch in `buffer`.
///
/// The bitmap must match the width selected by the control word. The FCS is
/// left for an explicit [`FrameViewMut::update_fcs()`]. The buffer must be
/// exactly [`block_ack_buffer_length()`] bytes long.
pub fn block_ack_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    receiver: MacAddress,
    transmitter: MacAddress,
    control: BlockAckControl,
    starting_sequence: SequenceControl,
    bitmap: &[u8],
    buffer: Bytes,
) -> Result<BlockAckFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if bitmap.len() != bitmap_length(control) || segment.len() != block_ack_buffer_length(control)
    {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = BlockAckFrame { segment };
    frame.set_frame_control(FrameControl::new().with_subtype(FrameSubtype::BlockAck));
    frame.set_address(0, receiver);
    frame.set_address(1, transmitter);
    frame.set_block_ack_control(control);
    frame.set_starting_sequence_control(starting_sequence);
    frame.frame_mut()[field::BITMAP..field::BITMAP + bitmap.len()].copy_from_slice(bitmap);
    Ok(frame)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use super::*;
    use crate::fields::AckPolicy;

    #[test]
    fn request_field_positions() {
        // Control word at 16, starting sequence control at 18, per the
        // running sum over two addresses.
        assert_eq!(field::CONTROL, 16);
        assert_eq!(field::STARTING_SEQUENCE_CONTROL, 18);
        assert_eq!(BLOCK_ACK_REQUEST_BUFFER_LENGTH, 24);

        let mut bytes = [0u8; BLOCK_ACK_REQUEST_BUFFER_LENGTH];
        bytes[0] = 0x84; // control frame, block ack request subtype
        bytes[16] = 0x05; // immediate policy, compressed bitmap
        bytes[17] = 0x50; // TID 5
        bytes[18] = 0xc0; // fragment 0, sequence 1468
        bytes[19] = 0x5b;

        let frame = BlockAckRequestFrame::new(Segment::new(&bytes[..]));
        let control = frame.block_ack_control().unwrap();
        assert_eq!(control.policy(), AckPolicy::Immediate);
        assert!(!control.multi_tid());
        assert!(control.compressed_bitmap());
        assert_eq!(control.tid(), 5);

        let ssc = frame.starting_sequence_control().unwrap();
        assert_eq!(ssc.fragment_number(), 0);
        assert_eq!(ssc.sequence_number(), 1468);
        assert_eq!(frame.frame_size(), 20);
    }

    #[test]
    fn request_round_trip() {
        let control = BlockAckControl::new()
            .with_policy(AckPolicy::Immediate)
            .with_compressed_bitmap(true)
            .with_tid(3);
        let ssc = SequenceControl::new().with_sequence_number(100);

        let mut buffer = [0u8; BLOCK_ACK_REQUEST_BUFFER_LENGTH];
        let mut frame = block_ack_request_frame(
            MacAddress::new([1; 6]),
            MacAddress::new([2; 6]),
            control,
            ssc,
            &mut buffer[..],
        )
        .unwrap();
        frame.update_fcs().unwrap();

        let mut out = vec![0u8; frame.total_length()];
        frame.emit(&mut out).unwrap();

        let reparsed = BlockAckRequestFrame::new(Segment::new(&out[..]));
        assert_eq!(reparsed.block_ack_control(), Some(control));
        assert_eq!(reparsed.starting_sequence_control(), Some(ssc));
        assert_eq!(reparsed.receiver(), Some(MacAddress::new([1; 6])));
        assert!(reparsed.fcs_valid());
    }

    #[test]
    fn bitmap_width_follows_the_control_word() {
        let compressed = BlockAckControl::new().with_compressed_bitmap(true);
        let full = BlockAckControl::new();
        assert_eq!(block_ack_buffer_length(compressed), 32);
        assert_eq!(block_ack_buffer_length(full), 152);

        let bitmap = [0xffu8; 8];
        let mut buffer = [0u8; 32];
        let mut frame = block_ack_frame(
            MacAddress::new([1; 6]),
            MacAddress::new([2; 6]),
            compressed,
            SequenceControl::new(),
            &bitmap,
            &mut buffer[..],
        )
        .unwrap();
        frame.update_fcs().unwrap();
        assert_eq!(frame.bitmap(), Some(&bitmap[..]));
        assert_eq!(frame.frame_size(), 28);
        assert!(frame.fcs_valid());

        // A bitmap not matching the control word is rejected.
        assert!(block_ack_frame(
            MacAddress::new([1; 6]),
            MacAddress::new([2; 6]),
            full,
            SequenceControl::new(),
            &bitmap,
            &mut [0u8; 152][..],
        )
        .is_err());
    }
}

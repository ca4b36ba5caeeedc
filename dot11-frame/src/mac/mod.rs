//! Typed views over the IEEE 802.11 MAC frame family.
//!
//! Each subtype with a dedicated view gets a `*Frame` reader/writer plus a
//! `*_frame()` constructor that initializes a caller-provided buffer with
//! field defaults. [`MacFrame::parse()`] is the single entry point that maps
//! the subtype bits of a raw buffer to the matching view.

mod action;
mod assoc;
mod auth;
mod beacon;
mod block_ack;
mod control;
mod data;
mod probe;

pub use action::*;
pub use assoc::*;
pub use auth::*;
pub use beacon::*;
pub use block_ack::*;
pub use control::*;
pub use data::*;
pub use probe::*;

use byteorder::{ByteOrder, LE};
use dot11_util::debug;

use crate::{
    addressing::MacAddress,
    fields::{layout, FrameControl, FrameSubtype, SequenceControl},
    FrameView, FrameViewMut, Segment,
};

/// A parsed MAC frame, classified by the subtype bits of its frame control
/// word.
///
/// Unrecognized subtypes (and buffers too short to classify at all) come
/// back as explicit [`MacFrame::Unknown`] frames rather than parse failures,
/// so a single corrupt record never aborts processing of a capture stream.
#[derive(Debug)]
pub enum MacFrame<Bytes> {
    Beacon(BeaconFrame<Bytes>),
    ProbeRequest(ProbeRequestFrame<Bytes>),
    ProbeResponse(ProbeResponseFrame<Bytes>),
    AssociationRequest(AssociationRequestFrame<Bytes>),
    AssociationResponse(AssociationResponseFrame<Bytes>),
    Authentication(AuthenticationFrame<Bytes>),
    Deauthentication(DeauthenticationFrame<Bytes>),
    Disassociation(DisassociationFrame<Bytes>),
    Action(ActionFrame<Bytes>),
    Rts(RtsFrame<Bytes>),
    Cts(CtsFrame<Bytes>),
    Ack(AckFrame<Bytes>),
    PsPoll(PsPollFrame<Bytes>),
    CfEnd(CfEndFrame<Bytes>),
    BlockAckRequest(BlockAckRequestFrame<Bytes>),
    BlockAck(BlockAckFrame<Bytes>),
    Data(DataFrame<Bytes>),
    /// A subtype this crate has no dedicated view for.
    Unknown(GenericFrame<Bytes>),
}

impl<Bytes: AsRef<[u8]>> MacFrame<Bytes> {
    /// Classify the frame contained in `segment` and wrap it in the matching
    /// view.
    pub fn parse(segment: Segment<Bytes>) -> Self {
        if segment.len() < layout::FRAME_CONTROL_LENGTH {
            debug!("buffer too short to classify, using the generic view");
            return MacFrame::Unknown(GenericFrame::new(segment));
        }

        let fc = FrameControl::from_bits(segment.read_u16(layout::FRAME_CONTROL));
        match fc.subtype() {
            FrameSubtype::Beacon => MacFrame::Beacon(BeaconFrame::new(segment)),
            FrameSubtype::ProbeRequest => MacFrame::ProbeRequest(ProbeRequestFrame::new(segment)),
            FrameSubtype::ProbeResponse => {
                MacFrame::ProbeResponse(ProbeResponseFrame::new(segment))
            }
            FrameSubtype::AssociationRequest => {
                MacFrame::AssociationRequest(AssociationRequestFrame::new(segment))
            }
            FrameSubtype::AssociationResponse => {
                MacFrame::AssociationResponse(AssociationResponseFrame::new(segment))
            }
            FrameSubtype::Authentication => {
                MacFrame::Authentication(AuthenticationFrame::new(segment))
            }
            FrameSubtype::Deauthentication => {
                MacFrame::Deauthentication(DeauthenticationFrame::new(segment))
            }
            FrameSubtype::Disassociation => {
                MacFrame::Disassociation(DisassociationFrame::new(segment))
            }
            FrameSubtype::Action => MacFrame::Action(ActionFrame::new(segment)),
            FrameSubtype::Rts => MacFrame::Rts(RtsFrame::new(segment)),
            FrameSubtype::Cts => MacFrame::Cts(CtsFrame::new(segment)),
            FrameSubtype::Ack => MacFrame::Ack(AckFrame::new(segment)),
            FrameSubtype::PsPoll => MacFrame::PsPoll(PsPollFrame::new(segment)),
            FrameSubtype::CfEnd | FrameSubtype::CfEndCfAck => {
                MacFrame::CfEnd(CfEndFrame::new(segment))
            }
            FrameSubtype::BlockAckRequest => {
                MacFrame::BlockAckRequest(BlockAckRequestFrame::new(segment))
            }
            FrameSubtype::BlockAck => MacFrame::BlockAck(BlockAckFrame::new(segment)),
            subtype if subtype.is_data() => MacFrame::Data(DataFrame::new(segment)),
            _ => {
                debug!("no dedicated view for this subtype, using the generic one");
                MacFrame::Unknown(GenericFrame::new(segment))
            }
        }
    }

    /// The contained view, dynamically dispatched.
    pub fn view(&self) -> &dyn FrameView {
        match self {
            MacFrame::Beacon(frame) => frame,
            MacFrame::ProbeRequest(frame) => frame,
            MacFrame::ProbeResponse(frame) => frame,
            MacFrame::AssociationRequest(frame) => frame,
            MacFrame::AssociationResponse(frame) => frame,
            MacFrame::Authentication(frame) => frame,
            MacFrame::Deauthentication(frame) => frame,
            MacFrame::Disassociation(frame) => frame,
            MacFrame::Action(frame) => frame,
            MacFrame::Rts(frame) => frame,
            MacFrame::Cts(frame) => frame,
            MacFrame::Ack(frame) => frame,
            MacFrame::PsPoll(frame) => frame,
            MacFrame::CfEnd(frame) => frame,
            MacFrame::BlockAckRequest(frame) => frame,
            MacFrame::BlockAck(frame) => frame,
            MacFrame::Data(frame) => frame,
            MacFrame::Unknown(frame) => frame,
        }
    }

    /// See [`FrameView::fcs_valid()`].
    pub fn fcs_valid(&self) -> bool {
        self.view().fcs_valid()
    }
}

/// Accessors shared by the management frames: three addresses and a sequence
/// control word following the common prefix.
pub trait ManagementFrameView: FrameView {
    /// Destination address (address 1).
    fn destination(&self) -> Option<MacAddress> {
        self.address(0)
    }

    /// Source address (address 2).
    fn source(&self) -> Option<MacAddress> {
        self.address(1)
    }

    /// BSS identifier (address 3).
    fn bssid(&self) -> Option<MacAddress> {
        self.address(2)
    }

    /// Fragment and sequence numbers.
    fn sequence_control(&self) -> Option<SequenceControl> {
        let bytes = self.frame_ref();
        if layout::SEQUENCE_CONTROL + layout::SEQUENCE_CONTROL_LENGTH > bytes.len() {
            return None;
        }
        Some(SequenceControl::from_bits(LE::read_u16(
            &bytes[layout::SEQUENCE_CONTROL..],
        )))
    }
}

/// Setters shared by the management frames.
pub trait ManagementFrameViewMut: FrameViewMut {
    /// Write the destination address (address 1).
    fn set_destination(&mut self, address: MacAddress) {
        self.set_address(0, address);
    }

    /// Write the source address (address 2).
    fn set_source(&mut self, address: MacAddress) {
        self.set_address(1, address);
    }

    /// Write the BSS identifier (address 3).
    fn set_bssid(&mut self, address: MacAddress) {
        self.set_address(2, address);
    }

    /// Write the sequence control word.
    fn set_sequence_control(&mut self, sc: SequenceControl) {
        LE::write_u16(
            &mut self.frame_mut()
                [layout::SEQUENCE_CONTROL..layout::SEQUENCE_CONTROL + 2],
            sc.into_bits(),
        );
    }
}

/// The trailing element region of a management frame: everything between the
/// fixed fields and the FCS. Empty when the buffer ends earlier.
pub(crate) fn element_bytes(bytes: &[u8], fixed: usize) -> &[u8] {
    let end = bytes.len().saturating_sub(layout::FCS_LENGTH);
    if end <= fixed {
        &[]
    } else {
        &bytes[fixed..end]
    }
}

/// Write the management header defaults into a freshly zeroed frame.
pub(crate) fn init_management_header<Frame: ManagementFrameViewMut>(
    frame: &mut Frame,
    subtype: FrameSubtype,
    destination: MacAddress,
    source: MacAddress,
    bssid: MacAddress,
) {
    frame.set_frame_control(FrameControl::new().with_subtype(subtype));
    frame.set_destination(destination);
    frame.set_source(source);
    frame.set_bssid(bssid);
}

/// Raw passthrough for frames without a dedicated view.
///
/// Only the common header is exposed; the body is kept verbatim and the FCS
/// is assumed to occupy the trailing four bytes.
#[derive(Debug)]
pub struct GenericFrame<Bytes> {
    segment: Segment<Bytes>,
}

impl<Bytes: AsRef<[u8]>> GenericFrame<Bytes> {
    pub fn new(segment: Segment<Bytes>) -> Self {
        Self { segment }
    }

    /// The combined type/subtype classification, if readable.
    pub fn subtype(&self) -> Option<FrameSubtype> {
        self.frame_control().map(|fc| fc.subtype())
    }

    /// The frame body between the common header and the FCS.
    pub fn body(&self) -> &[u8] {
        let bytes = self.segment.as_ref();
        let start = layout::ADDRESS1.min(self.frame_size());
        &bytes[start..self.frame_size()]
    }

    pub fn into_inner(self) -> Segment<Bytes> {
        self.segment
    }
}

impl<Bytes: AsRef<[u8]>> FrameView for GenericFrame<Bytes> {
    fn frame_ref(&self) -> &[u8] {
        self.segment.as_ref()
    }

    fn frame_size(&self) -> usize {
        self.segment.len().saturating_sub(layout::FCS_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use super::*;
    use crate::{ie::IeRepr, ParseStatus};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn dispatch_by_subtype() {
        init_logging();

        let ra = MacAddress::new([1; 6]);
        let ta = MacAddress::new([2; 6]);

        let mut buffer = [0u8; RTS_BUFFER_LENGTH];
        let frame = rts_frame(ra, ta, &mut buffer[..]).unwrap();
        let mut out = vec![0u8; frame.total_length()];
        frame.emit(&mut out).unwrap();
        assert!(matches!(
            MacFrame::parse(Segment::new(&out[..])),
            MacFrame::Rts(_)
        ));

        let mut buffer = [0u8; CTS_BUFFER_LENGTH];
        let frame = cts_frame(ra, &mut buffer[..]).unwrap();
        frame.emit(&mut out).unwrap();
        assert!(matches!(
            MacFrame::parse(Segment::new(&out[..frame.total_length()])),
            MacFrame::Cts(_)
        ));

        let ies = [IeRepr::with_raw_id(0, b"net")];
        let mut buffer = vec![0u8; beacon_buffer_length(&ies)];
        let frame = beacon_frame(MacAddress::BROADCAST, ta, ta, &ies, &mut buffer[..]).unwrap();
        let mut out = vec![0u8; frame.total_length()];
        frame.emit(&mut out).unwrap();
        assert!(matches!(
            MacFrame::parse(Segment::new(&out[..])),
            MacFrame::Beacon(_)
        ));

        let mut buffer = vec![0u8; data_buffer_length(b"payload")];
        let frame = data_frame(ra, ta, ta, b"payload", &mut buffer[..]).unwrap();
        let mut out = vec![0u8; frame.total_length()];
        frame.emit(&mut out).unwrap();
        assert!(matches!(
            MacFrame::parse(Segment::new(&out[..])),
            MacFrame::Data(_)
        ));
    }

    #[test]
    fn unrecognized_subtypes_become_generic_frames() {
        init_logging();

        // Management subtype 0b0010 is a reassociation request, which has no
        // dedicated view here.
        let mut bytes = [0u8; 34];
        bytes[0] = 0x20;
        let frame = MacFrame::parse(Segment::new(&bytes[..]));
        let MacFrame::Unknown(frame) = frame else {
            panic!("expected the generic view");
        };
        assert_eq!(frame.subtype(), Some(FrameSubtype::ReassociationRequest));
        assert_eq!(frame.frame_size(), 30);
        assert_eq!(frame.body().len(), 26);
        assert_eq!(frame.parse_status(), ParseStatus::FullyParsed);
    }

    #[test]
    fn unclassifiable_buffers_stay_safe() {
        init_logging();

        let frame = MacFrame::parse(Segment::new(&[0x01u8][..]));
        assert!(!frame.fcs_valid());
        let MacFrame::Unknown(frame) = frame else {
            panic!("expected the generic view");
        };
        assert_eq!(frame.frame_control(), None);
        assert_eq!(frame.duration_id(), None);
        assert_eq!(frame.address(0), None);
        assert_eq!(frame.frame_size(), 0);
        assert_eq!(frame.parse_status(), ParseStatus::Truncated);
    }
}

//! Control frames with a fixed layout: RTS, CTS, ACK, PS-Poll and CF-End.

use dot11_util::{Error, Result};

use crate::{
    addressing::MacAddress,
    fields::{layout, FrameControl, FrameSubtype},
    FrameView, FrameViewMut, Segment,
};

/// An RTS frame soliciting a CTS before a long exchange.
#[derive(Debug)]
pub struct RtsFrame<Bytes> {
    segment: Segment<Bytes>,
}

/// A CTS frame granting the medium.
#[derive(Debug)]
pub struct CtsFrame<Bytes> {
    segment: Segment<Bytes>,
}

/// A per-frame acknowledgment.
#[derive(Debug)]
pub struct AckFrame<Bytes> {
    segment: Segment<Bytes>,
}

/// A CF-End frame closing a contention-free period.
#[derive(Debug)]
pub struct CfEndFrame<Bytes> {
    segment: Segment<Bytes>,
}

macro_rules! fixed_control_frame {
    ($Frame:ident, $addresses:literal, $buffer_length:ident) => {
        impl<Bytes: AsRef<[u8]>> $Frame<Bytes> {
            pub fn new(segment: Segment<Bytes>) -> Self {
                Self { segment }
            }

            /// Receiver address (address 1).
            pub fn receiver(&self) -> Option<MacAddress> {
                self.address(0)
            }

            pub fn into_inner(self) -> Segment<Bytes> {
                self.segment
            }
        }

        impl<Bytes: AsRef<[u8]>> FrameView for $Frame<Bytes> {
            fn frame_ref(&self) -> &[u8] {
                self.segment.as_ref()
            }

            fn frame_size(&self) -> usize {
                layout::address($addresses)
            }
        }

        impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> FrameViewMut for $Frame<Bytes> {
            fn frame_mut(&mut self) -> &mut [u8] {
                self.segment.as_mut()
            }
        }

        /// Bytes needed for this frame, including the FCS.
        pub const $buffer_length: usize = layout::address($addresses) + layout::FCS_LENGTH;
    };
}

fixed_control_frame!(RtsFrame, 2, RTS_BUFFER_LENGTH);
fixed_control_frame!(CtsFrame, 1, CTS_BUFFER_LENGTH);
fixed_control_frame!(AckFrame, 1, ACK_BUFFER_LENGTH);
fixed_control_frame!(CfEndFrame, 2, CF_END_BUFFER_LENGTH);

impl<Bytes: AsRef<[u8]>> RtsFrame<Bytes> {
    /// Transmitter address (address 2).
    pub fn transmitter(&self) -> Option<MacAddress> {
        self.address(1)
    }
}

impl<Bytes: AsRef<[u8]>> CfEndFrame<Bytes> {
    /// BSS identifier (address 2).
    pub fn bssid(&self) -> Option<MacAddress> {
        self.address(1)
    }
}

fn init_control_frame<Frame: FrameViewMut>(frame: &mut Frame, subtype: FrameSubtype) {
    frame.set_frame_control(FrameControl::new().with_subtype(subtype));
}

/// Initialize an RTS frame from scratch in `buffer`.
///
/// The FCS is left for an explicit [`FrameViewMut::update_fcs()`]. The
/// buffer must be exactly [`RTS_BUFFER_LENGTH`] bytes long.
pub fn rts_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    receiver: MacAddress,
    transmitter: MacAddress,
    buffer: Bytes,
) -> Result<RtsFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if segment.len() != RTS_BUFFER_LENGTH {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = RtsFrame { segment };
    init_control_frame(&mut frame, FrameSubtype::Rts);
    frame.set_address(0, receiver);
    frame.set_address(1, transmitter);
    Ok(frame)
}

/// Initialize a CTS frame from scratch in `buffer`.
///
/// The buffer must be exactly [`CTS_BUFFER_LENGTH`] bytes long.
pub fn cts_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    receiver: MacAddress,
    buffer: Bytes,
) -> Result<CtsFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if segment.len() != CTS_BUFFER_LENGTH {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = CtsFrame { segment };
    init_control_frame(&mut frame, FrameSubtype::Cts);
    frame.set_address(0, receiver);
    Ok(frame)
}

/// Initialize an ACK frame from scratch in `buffer`.
///
/// The buffer must be exactly [`ACK_BUFFER_LENGTH`] bytes long.
pub fn ack_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    receiver: MacAddress,
    buffer: Bytes,
) -> Result<AckFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if segment.len() != ACK_BUFFER_LENGTH {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = AckFrame { segment };
    init_control_frame(&mut frame, FrameSubtype::Ack);
    frame.set_address(0, receiver);
    Ok(frame)
}

/// Initialize a CF-End frame from scratch in `buffer`.
///
/// The buffer must be exactly [`CF_END_BUFFER_LENGTH`] bytes long.
pub fn cf_end_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    receiver: MacAddress,
    bssid: MacAddress,
    buffer: Bytes,
) -> Result<CfEndFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if segment.len() != CF_END_BUFFER_LENGTH {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = CfEndFrame { segment };
    init_control_frame(&mut frame, FrameSubtype::CfEnd);
    frame.set_address(0, receiver);
    frame.set_address(1, bssid);
    Ok(frame)
}

/// A PS-Poll frame: a dozing station asking the access point for buffered
/// traffic. The duration position carries the association ID instead.
#[derive(Debug)]
pub struct PsPollFrame<Bytes> {
    segment: Segment<Bytes>,
}

impl<Bytes: AsRef<[u8]>> PsPollFrame<Bytes> {
    pub fn new(segment: Segment<Bytes>) -> Self {
        Self { segment }
    }

    /// The association ID of the polling station, carried where other frames
    /// put the duration.
    pub fn association_id(&self) -> Option<u16> {
        self.duration_id()
    }

    /// BSS identifier (address 1).
    pub fn bssid(&self) -> Option<MacAddress> {
        self.address(0)
    }

    /// Transmitter address (address 2).
    pub fn transmitter(&self) -> Option<MacAddress> {
        self.address(1)
    }

    pub fn into_inner(self) -> Segment<Bytes> {
        self.segment
    }
}

impl<Bytes: AsRef<[u8]>> FrameView for PsPollFrame<Bytes> {
    fn frame_ref(&self) -> &[u8] {
        self.segment.as_ref()
    }

    fn frame_size(&self) -> usize {
        layout::address(2)
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> FrameViewMut for PsPollFrame<Bytes> {
    fn frame_mut(&mut self) -> &mut [u8] {
        self.segment.as_mut()
    }
}

/// Bytes needed for a PS-Poll frame, including the FCS.
pub const PS_POLL_BUFFER_LENGTH: usize = layout::address(2) + layout::FCS_LENGTH;

/// Initialize a PS-Poll frame from scratch in `buffer`.
///
/// The buffer must be exactly [`PS_POLL_BUFFER_LENGTH`] bytes long.
pub fn ps_poll_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    association_id: u16,
    bssid: MacAddress,
    transmitter: MacAddress,
    buffer: Bytes,
) -> Result<PsPollFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if segment.len() != PS_POLL_BUFFER_LENGTH {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = PsPollFrame { segment };
    init_control_frame(&mut frame, FrameSubtype::PsPoll);
    frame.set_duration_id(association_id);
    frame.set_address(0, bssid);
    frame.set_address(1, transmitter);
    Ok(frame)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use super::*;
    use crate::fields::FrameKind;

    #[test]
    fn rts_round_trip() {
        let ra = MacAddress::new([0xaa; 6]);
        let ta = MacAddress::new([0xbb; 6]);

        let mut buffer = [0u8; RTS_BUFFER_LENGTH];
        let mut frame = rts_frame(ra, ta, &mut buffer[..]).unwrap();
        frame.set_duration_id(44);
        frame.update_fcs().unwrap();

        let mut out = vec![0u8; frame.total_length()];
        frame.emit(&mut out).unwrap();
        assert_eq!(out.len(), 20);

        let reparsed = RtsFrame::new(Segment::new(&out[..]));
        let fc = reparsed.frame_control().unwrap();
        assert_eq!(fc.kind(), FrameKind::Control);
        assert_eq!(fc.subtype(), FrameSubtype::Rts);
        assert_eq!(reparsed.duration_id(), Some(44));
        assert_eq!(reparsed.receiver(), Some(ra));
        assert_eq!(reparsed.transmitter(), Some(ta));
        assert!(reparsed.fcs_valid());
    }

    #[test]
    fn single_address_frames() {
        let ra = MacAddress::new([0xaa; 6]);

        let mut buffer = [0u8; CTS_BUFFER_LENGTH];
        let mut frame = cts_frame(ra, &mut buffer[..]).unwrap();
        frame.update_fcs().unwrap();
        assert_eq!(frame.frame_size(), 10);
        assert_eq!(frame.receiver(), Some(ra));
        assert!(frame.fcs_valid());

        let mut buffer = [0u8; ACK_BUFFER_LENGTH];
        let mut frame = ack_frame(ra, &mut buffer[..]).unwrap();
        frame.update_fcs().unwrap();
        assert_eq!(
            frame.frame_control().unwrap().subtype(),
            FrameSubtype::Ack
        );
        assert!(frame.fcs_valid());
    }

    #[test]
    fn ps_poll_carries_the_association_id() {
        let bssid = MacAddress::new([0x0c; 6]);
        let ta = MacAddress::new([0x0d; 6]);

        let mut buffer = [0u8; PS_POLL_BUFFER_LENGTH];
        let mut frame = ps_poll_frame(0xc001, bssid, ta, &mut buffer[..]).unwrap();
        frame.update_fcs().unwrap();

        assert_eq!(frame.association_id(), Some(0xc001));
        assert_eq!(frame.bssid(), Some(bssid));
        assert_eq!(frame.transmitter(), Some(ta));
        assert!(frame.fcs_valid());
    }

    #[test]
    fn cf_end_round_trip() {
        let ra = MacAddress::BROADCAST;
        let bssid = MacAddress::new([0x0c; 6]);

        let mut buffer = [0u8; CF_END_BUFFER_LENGTH];
        let mut frame = cf_end_frame(ra, bssid, &mut buffer[..]).unwrap();
        frame.update_fcs().unwrap();

        assert_eq!(frame.receiver(), Some(ra));
        assert_eq!(frame.bssid(), Some(bssid));
        assert!(frame.fcs_valid());
    }
}

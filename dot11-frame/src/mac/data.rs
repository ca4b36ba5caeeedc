//! Data frames, including the QoS flavors.

use byteorder::{ByteOrder, LE};
use dot11_util::{Error, Result};

use crate::{
    addressing::MacAddress,
    fields::{layout, FrameControl, FrameSubtype, SequenceControl},
    address_at, FrameView, FrameViewMut, Segment,
};

const QOS_CONTROL_LENGTH: usize = 2;

/// A data frame of any subtype.
///
/// The number of addresses and their roles follow the ToDS/FromDS flags: a
/// fourth address appears only on wireless-bridge frames carrying both, and
/// the QoS subtypes insert a QoS control word before the payload.
#[derive(Debug)]
pub struct DataFrame<Bytes> {
    segment: Segment<Bytes>,
}

impl<Bytes: AsRef<[u8]>> DataFrame<Bytes> {
    pub fn new(segment: Segment<Bytes>) -> Self {
        Self { segment }
    }

    fn flags(&self) -> (bool, bool) {
        match self.frame_control() {
            Some(fc) => (fc.to_ds(), fc.from_ds()),
            None => (false, false),
        }
    }

    fn is_qos(&self) -> bool {
        self.frame_control()
            .map(|fc| fc.subtype().is_qos())
            .unwrap_or(false)
    }

    /// Whether a fourth address is present (ToDS and FromDS both set).
    pub fn has_address4(&self) -> bool {
        let (to_ds, from_ds) = self.flags();
        to_ds && from_ds
    }

    /// Width of the MAC header, depending on the ToDS/FromDS flags and the
    /// QoS subtypes.
    pub fn header_length(&self) -> usize {
        let mut length = layout::SEQUENCE_CONTROL + layout::SEQUENCE_CONTROL_LENGTH;
        if self.has_address4() {
            length += crate::addressing::ADDRESS_LENGTH;
        }
        if self.is_qos() {
            length += QOS_CONTROL_LENGTH;
        }
        length
    }

    /// Fragment and sequence numbers.
    pub fn sequence_control(&self) -> Option<SequenceControl> {
        let bytes = self.frame_ref();
        if layout::SEQUENCE_CONTROL + layout::SEQUENCE_CONTROL_LENGTH > bytes.len() {
            return None;
        }
        Some(SequenceControl::from_bits(LE::read_u16(
            &bytes[layout::SEQUENCE_CONTROL..],
        )))
    }

    /// The fourth address of wireless-bridge frames.
    pub fn address4(&self) -> Option<MacAddress> {
        if !self.has_address4() {
            return None;
        }
        address_at(self.frame_ref(), layout::ADDRESS4)
    }

    /// The QoS control word of the QoS subtypes.
    pub fn qos_control(&self) -> Option<u16> {
        if !self.is_qos() {
            return None;
        }
        let pos = self.header_length() - QOS_CONTROL_LENGTH;
        let bytes = self.frame_ref();
        if pos + QOS_CONTROL_LENGTH > bytes.len() {
            return None;
        }
        Some(LE::read_u16(&bytes[pos..]))
    }

    /// Destination of the carried payload, derived from the ToDS/FromDS
    /// flags.
    pub fn destination(&self) -> Option<MacAddress> {
        let (to_ds, _) = self.flags();
        if to_ds {
            self.address(2)
        } else {
            self.address(0)
        }
    }

    /// Original source of the carried payload, derived from the ToDS/FromDS
    /// flags.
    pub fn source(&self) -> Option<MacAddress> {
        match self.flags() {
            (_, false) => self.address(1),
            (false, true) => self.address(2),
            (true, true) => self.address4(),
        }
    }

    /// The BSS the frame traverses; absent on wireless-bridge frames.
    pub fn bssid(&self) -> Option<MacAddress> {
        match self.flags() {
            (false, false) => self.address(2),
            (true, false) => self.address(0),
            (false, true) => self.address(1),
            (true, true) => None,
        }
    }

    /// The payload between the MAC header and the FCS.
    pub fn payload(&self) -> &[u8] {
        let bytes = self.frame_ref();
        let start = self.header_length();
        let end = bytes.len().saturating_sub(layout::FCS_LENGTH);
        if end <= start {
            &[]
        } else {
            &bytes[start..end]
        }
    }

    pub fn into_inner(self) -> Segment<Bytes> {
        self.segment
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> DataFrame<Bytes> {
    /// Write the sequence control word.
    pub fn set_sequence_control(&mut self, sc: SequenceControl) {
        LE::write_u16(
            &mut self.frame_mut()
                [layout::SEQUENCE_CONTROL..layout::SEQUENCE_CONTROL + 2],
            sc.into_bits(),
        );
    }
}

impl<Bytes: AsRef<[u8]>> FrameView for DataFrame<Bytes> {
    fn frame_ref(&self) -> &[u8] {
        self.segment.as_ref()
    }

    fn frame_size(&self) -> usize {
        self.header_length() + self.payload().len()
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> FrameViewMut for DataFrame<Bytes> {
    fn frame_mut(&mut self) -> &mut [u8] {
        self.segment.as_mut()
    }
}

/// Bytes needed for a three-address data frame with the given payload,
/// including the FCS.
pub fn data_buffer_length(payload: &[u8]) -> usize {
    layout::SEQUENCE_CONTROL + layout::SEQUENCE_CONTROL_LENGTH + payload.len() + layout::FCS_LENGTH
}

/// Initialize a plain (ToDS/FromDS clear) data frame from scratch in
/// `buffer`.
///
/// The FCS is left for an explicit [`FrameViewMut::update_fcs()`]. The
/// buffer must be exactly [`data_buffer_length()`] bytes long.
pub fn data_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    destination: MacAddress,
    source: MacAddress,
    bssid: MacAddress,
    payload: &[u8],
    buffer: Bytes,
) -> Result<DataFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if segment.len() != data_buffer_length(payload) {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = DataFrame { segment };
    frame.set_frame_control(FrameControl::new().with_subtype(FrameSubtype::Data));
    frame.set_address(0, destination);
    frame.set_address(1, source);
    frame.set_address(2, bssid);
    let start = frame.header_length();
    frame.frame_mut()[start..start + payload.len()].copy_from_slice(payload);
    Ok(frame)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use super::*;

    const STATION: MacAddress = MacAddress::new([1; 6]);
    const PEER: MacAddress = MacAddress::new([2; 6]);
    const ACCESS_POINT: MacAddress = MacAddress::new([3; 6]);

    #[test]
    fn plain_data_round_trip() {
        let payload = b"\xaa\xaa\x03\x00\x00\x00\x08\x00rest of an LLC frame";
        let mut buffer = vec![0u8; data_buffer_length(payload)];
        let mut frame = data_frame(PEER, STATION, ACCESS_POINT, payload, &mut buffer[..]).unwrap();
        frame.set_sequence_control(SequenceControl::new().with_sequence_number(9));
        frame.update_fcs().unwrap();

        let mut out = vec![0u8; frame.total_length()];
        frame.emit(&mut out).unwrap();

        let reparsed = DataFrame::new(Segment::new(&out[..]));
        assert_eq!(reparsed.header_length(), 24);
        assert_eq!(reparsed.destination(), Some(PEER));
        assert_eq!(reparsed.source(), Some(STATION));
        assert_eq!(reparsed.bssid(), Some(ACCESS_POINT));
        assert_eq!(reparsed.address4(), None);
        assert_eq!(reparsed.qos_control(), None);
        assert_eq!(reparsed.payload(), &payload[..]);
        assert_eq!(
            reparsed.sequence_control().unwrap().sequence_number(),
            9
        );
        assert!(reparsed.fcs_valid());
    }

    #[test]
    fn address_roles_follow_the_ds_flags() {
        // ToDS: the access point relays for a station, the destination sits
        // in address 3.
        let mut bytes = [0u8; 34];
        bytes[0] = 0x08; // data frame
        bytes[1] = 0x01; // ToDS
        bytes[4..10].copy_from_slice(ACCESS_POINT.as_ref());
        bytes[10..16].copy_from_slice(STATION.as_ref());
        bytes[16..22].copy_from_slice(PEER.as_ref());

        let frame = DataFrame::new(Segment::new(&bytes[..]));
        assert_eq!(frame.bssid(), Some(ACCESS_POINT));
        assert_eq!(frame.source(), Some(STATION));
        assert_eq!(frame.destination(), Some(PEER));

        // FromDS: roles of addresses 2 and 3 swap.
        bytes[1] = 0x02;
        bytes[4..10].copy_from_slice(PEER.as_ref());
        bytes[10..16].copy_from_slice(ACCESS_POINT.as_ref());
        bytes[16..22].copy_from_slice(STATION.as_ref());

        let frame = DataFrame::new(Segment::new(&bytes[..]));
        assert_eq!(frame.destination(), Some(PEER));
        assert_eq!(frame.bssid(), Some(ACCESS_POINT));
        assert_eq!(frame.source(), Some(STATION));
    }

    #[test]
    fn wireless_bridge_frames_carry_four_addresses() {
        let relay = MacAddress::new([4; 6]);

        let mut bytes = [0u8; 40];
        bytes[0] = 0x08;
        bytes[1] = 0x03; // ToDS and FromDS
        bytes[4..10].copy_from_slice(relay.as_ref());
        bytes[10..16].copy_from_slice(ACCESS_POINT.as_ref());
        bytes[16..22].copy_from_slice(PEER.as_ref());
        bytes[24..30].copy_from_slice(STATION.as_ref());

        let frame = DataFrame::new(Segment::new(&bytes[..]));
        assert!(frame.has_address4());
        assert_eq!(frame.header_length(), 30);
        assert_eq!(frame.destination(), Some(PEER));
        assert_eq!(frame.source(), Some(STATION));
        assert_eq!(frame.address4(), Some(STATION));
        assert_eq!(frame.bssid(), None);
        assert_eq!(frame.payload().len(), 6);
    }

    #[test]
    fn qos_data_carries_a_control_word() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x88; // QoS data
        bytes[24] = 0x05; // TID 5
        bytes[25] = 0x00;

        let frame = DataFrame::new(Segment::new(&bytes[..]));
        assert_eq!(frame.header_length(), 26);
        assert_eq!(frame.qos_control(), Some(0x0005));
        assert_eq!(frame.payload().len(), 2);

        // A null function frame carries no payload at all.
        let mut bytes = [0u8; 28];
        bytes[0] = 0x48;
        let frame = DataFrame::new(Segment::new(&bytes[..]));
        assert_eq!(frame.qos_control(), None);
        assert_eq!(frame.payload(), b"");
        assert_eq!(frame.frame_size(), 24);
    }
}

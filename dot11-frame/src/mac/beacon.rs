//! Beacon management frames.

use byteorder::{ByteOrder, LE};
use dot11_util::{Error, Result};

use crate::{
    addressing::MacAddress,
    fields::{layout, CapabilityInformation, FrameSubtype},
    ie::{emit_ies, ies_length, IeList, IeRepr},
    FrameView, FrameViewMut, Segment,
};

use super::{element_bytes, init_management_header, ManagementFrameView, ManagementFrameViewMut};

/// Field layout of the beacon body, continuing the management header.
mod field {
    use crate::fields::layout::MGMT_HEADER_LENGTH;

    pub const TIMESTAMP: usize = MGMT_HEADER_LENGTH;
    pub const TIMESTAMP_LENGTH: usize = 8;
    pub const BEACON_INTERVAL: usize = TIMESTAMP + TIMESTAMP_LENGTH;
    pub const BEACON_INTERVAL_LENGTH: usize = 2;
    pub const CAPABILITY_INFORMATION: usize = BEACON_INTERVAL + BEACON_INTERVAL_LENGTH;
    pub const CAPABILITY_INFORMATION_LENGTH: usize = 2;
    pub const ELEMENTS: usize = CAPABILITY_INFORMATION + CAPABILITY_INFORMATION_LENGTH;
}

/// A beacon: the periodic announcement of a BSS, carrying the network's
/// timing fields, capabilities and element list.
#[derive(Debug)]
pub struct BeaconFrame<Bytes> {
    segment: Segment<Bytes>,
}

impl<Bytes: AsRef<[u8]>> BeaconFrame<Bytes> {
    /// Wrap a frame buffer. Any length is accepted: fields beyond the end of
    /// a short buffer read as absent and the FCS reports invalid.
    pub fn new(segment: Segment<Bytes>) -> Self {
        Self { segment }
    }

    /// The TSF timer value at transmission time, in microseconds.
    pub fn timestamp(&self) -> Option<u64> {
        let bytes = self.frame_ref();
        if field::TIMESTAMP + field::TIMESTAMP_LENGTH > bytes.len() {
            return None;
        }
        Some(LE::read_u64(&bytes[field::TIMESTAMP..]))
    }

    /// The beacon interval in time units of 1024 microseconds.
    pub fn beacon_interval(&self) -> Option<u16> {
        let bytes = self.frame_ref();
        if field::BEACON_INTERVAL + field::BEACON_INTERVAL_LENGTH > bytes.len() {
            return None;
        }
        Some(LE::read_u16(&bytes[field::BEACON_INTERVAL..]))
    }

    /// The advertised capability word.
    pub fn capability_information(&self) -> Option<CapabilityInformation> {
        let bytes = self.frame_ref();
        if field::CAPABILITY_INFORMATION + field::CAPABILITY_INFORMATION_LENGTH > bytes.len() {
            return None;
        }
        Some(CapabilityInformation::from_bits(LE::read_u16(
            &bytes[field::CAPABILITY_INFORMATION..],
        )))
    }

    /// The trailing element sequence.
    pub fn elements(&self) -> IeList<'_> {
        IeList::new(element_bytes(self.frame_ref(), field::ELEMENTS))
    }

    pub fn into_inner(self) -> Segment<Bytes> {
        self.segment
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> BeaconFrame<Bytes> {
    /// Write the TSF timestamp.
    pub fn set_timestamp(&mut self, timestamp: u64) {
        LE::write_u64(
            &mut self.frame_mut()[field::TIMESTAMP..field::TIMESTAMP + field::TIMESTAMP_LENGTH],
            timestamp,
        );
    }

    /// Write the beacon interval.
    pub fn set_beacon_interval(&mut self, interval: u16) {
        LE::write_u16(
            &mut self.frame_mut()[field::BEACON_INTERVAL..field::BEACON_INTERVAL + 2],
            interval,
        );
    }

    /// Write the capability word.
    pub fn set_capability_information(&mut self, capability: CapabilityInformation) {
        LE::write_u16(
            &mut self.frame_mut()
                [field::CAPABILITY_INFORMATION..field::CAPABILITY_INFORMATION + 2],
            capability.into_bits(),
        );
    }
}

impl<Bytes: AsRef<[u8]>> FrameView for BeaconFrame<Bytes> {
    fn frame_ref(&self) -> &[u8] {
        self.segment.as_ref()
    }

    fn frame_size(&self) -> usize {
        field::ELEMENTS + self.elements().encoded_length()
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> FrameViewMut for BeaconFrame<Bytes> {
    fn frame_mut(&mut self) -> &mut [u8] {
        self.segment.as_mut()
    }
}

impl<Bytes: AsRef<[u8]>> ManagementFrameView for BeaconFrame<Bytes> {}
impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> ManagementFrameViewMut for BeaconFrame<Bytes> {}

/// Bytes needed for a beacon carrying `ies`, including the FCS.
pub fn beacon_buffer_length(ies: &[IeRepr]) -> usize {
    field::ELEMENTS + ies_length(ies) + layout::FCS_LENGTH
}

/// Initialize a beacon from scratch in `buffer`.
///
/// Writes the management header, zeroed timing and capability fields and the
/// given elements. The FCS is left for an explicit
/// [`FrameViewMut::update_fcs()`] once all edits are done. The buffer must be
/// exactly [`beacon_buffer_length()`] bytes long.
pub fn beacon_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    destination: MacAddress,
    source: MacAddress,
    bssid: MacAddress,
    ies: &[IeRepr],
    buffer: Bytes,
) -> Result<BeaconFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if segment.len() != beacon_buffer_length(ies) {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = BeaconFrame { segment };
    init_management_header(&mut frame, FrameSubtype::Beacon, destination, source, bssid);
    emit_ies(ies, &mut frame.frame_mut()[field::ELEMENTS..])?;
    Ok(frame)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use super::*;
    use crate::ie::ElementId;

    #[test]
    fn build_and_reparse() {
        let ies = [
            IeRepr::new(ElementId::Ssid, b"lounge"),
            IeRepr::new(ElementId::DsParameterSet, &[11]),
        ];
        let mut buffer = vec![0u8; beacon_buffer_length(&ies)];
        let mut frame = beacon_frame(
            MacAddress::BROADCAST,
            MacAddress::new([2; 6]),
            MacAddress::new([2; 6]),
            &ies,
            &mut buffer[..],
        )
        .unwrap();

        frame.set_timestamp(0x0123_4567_89ab_cdef);
        frame.set_beacon_interval(100);
        frame.set_capability_information(CapabilityInformation::new().with_ess(true));
        frame.update_fcs().unwrap();
        assert!(frame.fcs_valid());

        let mut out = vec![0u8; frame.total_length()];
        frame.emit(&mut out).unwrap();

        let reparsed = BeaconFrame::new(Segment::new(&out[..]));
        assert_eq!(reparsed.timestamp(), Some(0x0123_4567_89ab_cdef));
        assert_eq!(reparsed.beacon_interval(), Some(100));
        assert_eq!(
            reparsed.capability_information(),
            Some(CapabilityInformation::new().with_ess(true))
        );
        assert_eq!(reparsed.destination(), Some(MacAddress::BROADCAST));
        assert_eq!(reparsed.elements().get(0).unwrap().value(), b"lounge");
        assert!(reparsed.fcs_valid());
    }
}

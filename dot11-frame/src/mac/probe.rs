//! Probe request/response management frames.

use byteorder::{ByteOrder, LE};
use dot11_util::{Error, Result};

use crate::{
    addressing::MacAddress,
    fields::{layout, CapabilityInformation, FrameSubtype},
    ie::{emit_ies, ies_length, IeList, IeRepr},
    FrameView, FrameViewMut, Segment,
};

use super::{element_bytes, init_management_header, ManagementFrameView, ManagementFrameViewMut};

/// Field layout of the probe response body, continuing the management
/// header. A probe response mirrors the beacon body.
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

/// A probe request: a station asking for networks in range. The body is
/// nothing but an element sequence.
#[derive(Debug)]
pub struct ProbeRequestFrame<Bytes> {
    segment: Segment<Bytes>,
}

impl<Bytes: AsRef<[u8]>> ProbeRequestFrame<Bytes> {
    pub fn new(segment: Segment<Bytes>) -> Self {
        Self { segment }
    }

    /// The trailing element sequence.
    pub fn elements(&self) -> IeList<'_> {
        IeList::new(element_bytes(self.frame_ref(), layout::MGMT_HEADER_LENGTH))
    }

    pub fn into_inner(self) -> Segment<Bytes> {
        self.segment
    }
}

impl<Bytes: AsRef<[u8]>> FrameView for ProbeRequestFrame<Bytes> {
    fn frame_ref(&self) -> &[u8] {
        self.segment.as_ref()
    }

    fn frame_size(&self) -> usize {
        layout::MGMT_HEADER_LENGTH + self.elements().encoded_length()
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> FrameViewMut for ProbeRequestFrame<Bytes> {
    fn frame_mut(&mut self) -> &mut [u8] {
        self.segment.as_mut()
    }
}

impl<Bytes: AsRef<[u8]>> ManagementFrameView for ProbeRequestFrame<Bytes> {}
impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> ManagementFrameViewMut for ProbeRequestFrame<Bytes> {}

/// Bytes needed for a probe request carrying `ies`, including the FCS.
pub fn probe_request_buffer_length(ies: &[IeRepr]) -> usize {
    layout::MGMT_HEADER_LENGTH + ies_length(ies) + layout::FCS_LENGTH
}

/// Initialize a probe request from scratch in `buffer`.
///
/// The FCS is left for an explicit [`FrameViewMut::update_fcs()`]. The
/// buffer must be exactly [`probe_request_buffer_length()`] bytes long.
pub fn probe_request_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    destination: MacAddress,
    source: MacAddress,
    bssid: MacAddress,
    ies: &[IeRepr],
    buffer: Bytes,
) -> Result<ProbeRequestFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if segment.len() != probe_request_buffer_length(ies) {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = ProbeRequestFrame { segment };
    init_management_header(
        &mut frame,
        FrameSubtype::ProbeRequest,
        destination,
        source,
        bssid,
    );
    emit_ies(ies, &mut frame.frame_mut()[layout::MGMT_HEADER_LENGTH..])?;
    Ok(frame)
}

/// A probe response: the answer of an access point to a probe request,
/// carrying the same timing and capability fields as a beacon.
#[derive(Debug)]
pub struct ProbeResponseFrame<Bytes> {
    segment: Segment<Bytes>,
}

impl<Bytes: AsRef<[u8]>> ProbeResponseFrame<Bytes> {
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

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> ProbeResponseFrame<Bytes> {
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

impl<Bytes: AsRef<[u8]>> FrameView for ProbeResponseFrame<Bytes> {
    fn frame_ref(&self) -> &[u8] {
        self.segment.as_ref()
    }

    fn frame_size(&self) -> usize {
        field::ELEMENTS + self.elements().encoded_length()
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> FrameViewMut for ProbeResponseFrame<Bytes> {
    fn frame_mut(&mut self) -> &mut [u8] {
        self.segment.as_mut()
    }
}

impl<Bytes: AsRef<[u8]>> ManagementFrameView for ProbeResponseFrame<Bytes> {}
impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> ManagementFrameViewMut for ProbeResponseFrame<Bytes> {}

/// Bytes needed for a probe response carrying `ies`, including the FCS.
pub fn probe_response_buffer_length(ies: &[IeRepr]) -> usize {
    field::ELEMENTS + ies_length(ies) + layout::FCS_LENGTH
}

/// Initialize a probe response from scratch in `buffer`.
///
/// Writes the management header, zeroed timing and capability fields and the
/// given elements. The FCS is left for an explicit
/// [`FrameViewMut::update_fcs()`] once all edits are done. The buffer must be
/// exactly [`probe_response_buffer_length()`] bytes long.
pub fn probe_response_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    destination: MacAddress,
    source: MacAddress,
    bssid: MacAddress,
    ies: &[IeRepr],
    buffer: Bytes,
) -> Result<ProbeResponseFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if segment.len() != probe_response_buffer_length(ies) {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = ProbeResponseFrame { segment };
    init_management_header(
        &mut frame,
        FrameSubtype::ProbeResponse,
        destination,
        source,
        bssid,
    );
    emit_ies(ies, &mut frame.frame_mut()[field::ELEMENTS..])?;
    Ok(frame)
}

//! Association request/response management frames.

use byteorder::{ByteOrder, LE};
use dot11_util::{Error, Result};

use crate::{
    addressing::MacAddress,
    fields::{layout, CapabilityInformation, FrameSubtype},
    ie::{emit_ies, ies_length, IeList, IeRepr},
    FrameView, FrameViewMut, Segment,
};

use super::{element_bytes, init_management_header, ManagementFrameView, ManagementFrameViewMut};

/// Field layout of the association request body.
mod request_field {
    use crate::fields::layout::MGMT_HEADER_LENGTH;

    pub const CAPABILITY_INFORMATION: usize = MGMT_HEADER_LENGTH;
    pub const CAPABILITY_INFORMATION_LENGTH: usize = 2;
    pub const LISTEN_INTERVAL: usize = CAPABILITY_INFORMATION + CAPABILITY_INFORMATION_LENGTH;
    pub const LISTEN_INTERVAL_LENGTH: usize = 2;
    pub const ELEMENTS: usize = LISTEN_INTERVAL + LISTEN_INTERVAL_LENGTH;
}

/// Field layout of the association response body.
mod response_field {
    use crate::fields::layout::MGMT_HEADER_LENGTH;

    pub const CAPABILITY_INFORMATION: usize = MGMT_HEADER_LENGTH;
    pub const CAPABILITY_INFORMATION_LENGTH: usize = 2;
    pub const STATUS_CODE: usize = CAPABILITY_INFORMATION + CAPABILITY_INFORMATION_LENGTH;
    pub const STATUS_CODE_LENGTH: usize = 2;
    pub const ASSOCIATION_ID: usize = STATUS_CODE + STATUS_CODE_LENGTH;
    pub const ASSOCIATION_ID_LENGTH: usize = 2;
    pub const ELEMENTS: usize = ASSOCIATION_ID + ASSOCIATION_ID_LENGTH;
}

/// A station's request to join a BSS.
#[derive(Debug)]
pub struct AssociationRequestFrame<Bytes> {
    segment: Segment<Bytes>,
}

impl<Bytes: AsRef<[u8]>> AssociationRequestFrame<Bytes> {
    pub fn new(segment: Segment<Bytes>) -> Self {
        Self { segment }
    }

    /// The capability word the station claims.
    pub fn capability_information(&self) -> Option<CapabilityInformation> {
        let bytes = self.frame_ref();
        if request_field::CAPABILITY_INFORMATION + request_field::CAPABILITY_INFORMATION_LENGTH
            > bytes.len()
        {
            return None;
        }
        Some(CapabilityInformation::from_bits(LE::read_u16(
            &bytes[request_field::CAPABILITY_INFORMATION..],
        )))
    }

    /// How many beacon intervals the station may sleep between listening.
    pub fn listen_interval(&self) -> Option<u16> {
        let bytes = self.frame_ref();
        if request_field::LISTEN_INTERVAL + request_field::LISTEN_INTERVAL_LENGTH > bytes.len() {
            return None;
        }
        Some(LE::read_u16(&bytes[request_field::LISTEN_INTERVAL..]))
    }

    /// The trailing element sequence.
    pub fn elements(&self) -> IeList<'_> {
        IeList::new(element_bytes(self.frame_ref(), request_field::ELEMENTS))
    }

    pub fn into_inner(self) -> Segment<Bytes> {
        self.segment
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> AssociationRequestFrame<Bytes> {
    /// Write the capability word.
    pub fn set_capability_information(&mut self, capability: CapabilityInformation) {
        LE::write_u16(
            &mut self.frame_mut()[request_field::CAPABILITY_INFORMATION
                ..request_field::CAPABILITY_INFORMATION + 2],
            capability.into_bits(),
        );
    }

    /// Write the listen interval.
    pub fn set_listen_interval(&mut self, interval: u16) {
        LE::write_u16(
            &mut self.frame_mut()
                [request_field::LISTEN_INTERVAL..request_field::LISTEN_INTERVAL + 2],
            interval,
        );
    }
}

impl<Bytes: AsRef<[u8]>> FrameView for AssociationRequestFrame<Bytes> {
    fn frame_ref(&self) -> &[u8] {
        self.segment.as_ref()
    }

    fn frame_size(&self) -> usize {
        request_field::ELEMENTS + self.elements().encoded_length()
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> FrameViewMut for AssociationRequestFrame<Bytes> {
    fn frame_mut(&mut self) -> &mut [u8] {
        self.segment.as_mut()
    }
}

impl<Bytes: AsRef<[u8]>> ManagementFrameView for AssociationRequestFrame<Bytes> {}
impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> ManagementFrameViewMut for AssociationRequestFrame<Bytes> {}

/// Bytes needed for an association request carrying `ies`, including the FCS.
pub fn association_request_buffer_length(ies: &[IeRepr]) -> usize {
    request_field::ELEMENTS + ies_length(ies) + layout::FCS_LENGTH
}

/// Initialize an association request from scratch in `buffer`.
///
/// The FCS is left for an explicit [`FrameViewMut::update_fcs()`]. The
/// buffer must be exactly [`association_request_buffer_length()`] bytes long.
pub fn association_request_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    destination: MacAddress,
    source: MacAddress,
    bssid: MacAddress,
    ies: &[IeRepr],
    buffer: Bytes,
) -> Result<AssociationRequestFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if segment.len() != association_request_buffer_length(ies) {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = AssociationRequestFrame { segment };
    init_management_header(
        &mut frame,
        FrameSubtype::AssociationRequest,
        destination,
        source,
        bssid,
    );
    emit_ies(ies, &mut frame.frame_mut()[request_field::ELEMENTS..])?;
    Ok(frame)
}

/// The access point's answer to an association request.
#[derive(Debug)]
pub struct AssociationResponseFrame<Bytes> {
    segment: Segment<Bytes>,
}

impl<Bytes: AsRef<[u8]>> AssociationResponseFrame<Bytes> {
    pub fn new(segment: Segment<Bytes>) -> Self {
        Self { segment }
    }

    /// The capability word granted by the access point.
    pub fn capability_information(&self) -> Option<CapabilityInformation> {
        let bytes = self.frame_ref();
        if response_field::CAPABILITY_INFORMATION + response_field::CAPABILITY_INFORMATION_LENGTH
            > bytes.len()
        {
            return None;
        }
        Some(CapabilityInformation::from_bits(LE::read_u16(
            &bytes[response_field::CAPABILITY_INFORMATION..],
        )))
    }

    /// The status code; zero signals success.
    pub fn status_code(&self) -> Option<u16> {
        let bytes = self.frame_ref();
        if response_field::STATUS_CODE + response_field::STATUS_CODE_LENGTH > bytes.len() {
            return None;
        }
        Some(LE::read_u16(&bytes[response_field::STATUS_CODE..]))
    }

    /// The association identifier assigned to the station.
    pub fn association_id(&self) -> Option<u16> {
        let bytes = self.frame_ref();
        if response_field::ASSOCIATION_ID + response_field::ASSOCIATION_ID_LENGTH > bytes.len() {
            return None;
        }
        Some(LE::read_u16(&bytes[response_field::ASSOCIATION_ID..]))
    }

    /// The trailing element sequence.
    pub fn elements(&self) -> IeList<'_> {
        IeList::new(element_bytes(self.frame_ref(), response_field::ELEMENTS))
    }

    pub fn into_inner(self) -> Segment<Bytes> {
        self.segment
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> AssociationResponseFrame<Bytes> {
    /// Write the capability word.
    pub fn set_capability_information(&mut self, capability: CapabilityInformation) {
        LE::write_u16(
            &mut self.frame_mut()[response_field::CAPABILITY_INFORMATION
                ..response_field::CAPABILITY_INFORMATION + 2],
            capability.into_bits(),
        );
    }

    /// Write the status code.
    pub fn set_status_code(&mut self, status: u16) {
        LE::write_u16(
            &mut self.frame_mut()[response_field::STATUS_CODE..response_field::STATUS_CODE + 2],
            status,
        );
    }

    /// Write the association identifier.
    pub fn set_association_id(&mut self, id: u16) {
        LE::write_u16(
            &mut self.frame_mut()
                [response_field::ASSOCIATION_ID..response_field::ASSOCIATION_ID + 2],
            id,
        );
    }
}

impl<Bytes: AsRef<[u8]>> FrameView for AssociationResponseFrame<Bytes> {
    fn frame_ref(&self) -> &[u8] {
        self.segment.as_ref()
    }

    fn frame_size(&self) -> usize {
        response_field::ELEMENTS + self.elements().encoded_length()
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> FrameViewMut for AssociationResponseFrame<Bytes> {
    fn frame_mut(&mut self) -> &mut [u8] {
        self.segment.as_mut()
    }
}

impl<Bytes: AsRef<[u8]>> ManagementFrameView for AssociationResponseFrame<Bytes> {}
impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> ManagementFrameViewMut for AssociationResponseFrame<Bytes> {}

/// Bytes needed for an association response carrying `ies`, including the
/// FCS.
pub fn association_response_buffer_length(ies: &[IeRepr]) -> usize {
    response_field::ELEMENTS + ies_length(ies) + layout::FCS_LENGTH
}

/// Initialize an association response from scratch in `buffer`.
///
/// The FCS is left for an explicit [`FrameViewMut::update_fcs()`]. The
/// buffer must be exactly [`association_response_buffer_length()`] bytes
/// long.
pub fn association_response_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    destination: MacAddress,
    source: MacAddress,
    bssid: MacAddress,
    ies: &[IeRepr],
    buffer: Bytes,
) -> Result<AssociationResponseFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if segment.len() != association_response_buffer_length(ies) {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = AssociationResponseFrame { segment };
    init_management_header(
        &mut frame,
        FrameSubtype::AssociationResponse,
        destination,
        source,
        bssid,
    );
    emit_ies(ies, &mut frame.frame_mut()[response_field::ELEMENTS..])?;
    Ok(frame)
}

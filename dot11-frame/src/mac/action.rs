//! Action management frames.

use dot11_util::{Error, Result};

use crate::{
    addressing::MacAddress,
    fields::{layout, FrameSubtype},
    FrameView, FrameViewMut, Segment,
};

use super::{init_management_header, ManagementFrameView, ManagementFrameViewMut};

/// An action frame: a management frame whose body starts with a category
/// octet and is otherwise interpreted per category by upper layers.
#[derive(Debug)]
pub struct ActionFrame<Bytes> {
    segment: Segment<Bytes>,
}

impl<Bytes: AsRef<[u8]>> ActionFrame<Bytes> {
    pub fn new(segment: Segment<Bytes>) -> Self {
        Self { segment }
    }

    /// The action category octet.
    pub fn category(&self) -> Option<u8> {
        self.body().first().copied()
    }

    /// The raw action body following the management header.
    pub fn body(&self) -> &[u8] {
        let bytes = self.frame_ref();
        let end = bytes.len().saturating_sub(layout::FCS_LENGTH);
        if end <= layout::MGMT_HEADER_LENGTH {
            &[]
        } else {
            &bytes[layout::MGMT_HEADER_LENGTH..end]
        }
    }

    pub fn into_inner(self) -> Segment<Bytes> {
        self.segment
    }
}

impl<Bytes: AsRef<[u8]>> FrameView for ActionFrame<Bytes> {
    fn frame_ref(&self) -> &[u8] {
        self.segment.as_ref()
    }

    fn frame_size(&self) -> usize {
        layout::MGMT_HEADER_LENGTH + self.body().len()
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> FrameViewMut for ActionFrame<Bytes> {
    fn frame_mut(&mut self) -> &mut [u8] {
        self.segment.as_mut()
    }
}

impl<Bytes: AsRef<[u8]>> ManagementFrameView for ActionFrame<Bytes> {}
impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> ManagementFrameViewMut for ActionFrame<Bytes> {}

/// Bytes needed for an action frame with the given body, including the FCS.
pub fn action_buffer_length(body: &[u8]) -> usize {
    layout::MGMT_HEADER_LENGTH + body.len() + layout::FCS_LENGTH
}

/// Initialize an action frame from scratch in `buffer`.
///
/// The FCS is left for an explicit [`FrameViewMut::update_fcs()`]. The
/// buffer must be exactly [`action_buffer_length()`] bytes long.
pub fn action_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    destination: MacAddress,
    source: MacAddress,
    bssid: MacAddress,
    body: &[u8],
    buffer: Bytes,
) -> Result<ActionFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if segment.len() != action_buffer_length(body) {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = ActionFrame { segment };
    init_management_header(&mut frame, FrameSubtype::Action, destination, source, bssid);
    frame.frame_mut()[layout::MGMT_HEADER_LENGTH..layout::MGMT_HEADER_LENGTH + body.len()]
        .copy_from_slice(body);
    Ok(frame)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use super::*;

    #[test]
    fn round_trip() {
        // Category 3 (block ack), action 0 (ADDBA request).
        let body = [3u8, 0, 0x10, 0x02, 0x10, 0x00, 0x00, 0x00, 0x00];
        let mut buffer = vec![0u8; action_buffer_length(&body)];
        let mut frame = action_frame(
            MacAddress::new([1; 6]),
            MacAddress::new([2; 6]),
            MacAddress::new([1; 6]),
            &body,
            &mut buffer[..],
        )
        .unwrap();
        frame.update_fcs().unwrap();

        let mut out = vec![0u8; frame.total_length()];
        frame.emit(&mut out).unwrap();

        let reparsed = ActionFrame::new(Segment::new(&out[..]));
        assert_eq!(reparsed.category(), Some(3));
        assert_eq!(reparsed.body(), &body);
        assert_eq!(reparsed.frame_size(), 24 + body.len());
        assert!(reparsed.fcs_valid());
    }
}

//! Authentication, deauthentication and disassociation management frames.

use byteorder::{ByteOrder, LE};
use dot11_util::{Error, Result};

use crate::{
    addressing::MacAddress,
    fields::{layout, FrameSubtype},
    ie::{emit_ies, ies_length, IeList, IeRepr},
    FrameView, FrameViewMut, Segment,
};

use super::{element_bytes, init_management_header, ManagementFrameView, ManagementFrameViewMut};

/// Field layout of the authentication body.
mod field {
    use crate::fields::layout::MGMT_HEADER_LENGTH;

    pub const ALGORITHM_NUMBER: usize = MGMT_HEADER_LENGTH;
    pub const ALGORITHM_NUMBER_LENGTH: usize = 2;
    pub const TRANSACTION_SEQUENCE: usize = ALGORITHM_NUMBER + ALGORITHM_NUMBER_LENGTH;
    pub const TRANSACTION_SEQUENCE_LENGTH: usize = 2;
    pub const STATUS_CODE: usize = TRANSACTION_SEQUENCE + TRANSACTION_SEQUENCE_LENGTH;
    pub const STATUS_CODE_LENGTH: usize = 2;
    pub const ELEMENTS: usize = STATUS_CODE + STATUS_CODE_LENGTH;

    pub const REASON_CODE: usize = MGMT_HEADER_LENGTH;
    pub const REASON_CODE_LENGTH: usize = 2;
}

/// An authentication exchange frame. Shared-key handshakes append a
/// challenge text element.
#[derive(Debug)]
pub struct AuthenticationFrame<Bytes> {
    segment: Segment<Bytes>,
}

impl<Bytes: AsRef<[u8]>> AuthenticationFrame<Bytes> {
    pub fn new(segment: Segment<Bytes>) -> Self {
        Self { segment }
    }

    /// The authentication algorithm number; zero is open system.
    pub fn algorithm_number(&self) -> Option<u16> {
        let bytes = self.frame_ref();
        if field::ALGORITHM_NUMBER + field::ALGORITHM_NUMBER_LENGTH > bytes.len() {
            return None;
        }
        Some(LE::read_u16(&bytes[field::ALGORITHM_NUMBER..]))
    }

    /// Position of this frame within the authentication handshake.
    pub fn transaction_sequence(&self) -> Option<u16> {
        let bytes = self.frame_ref();
        if field::TRANSACTION_SEQUENCE + field::TRANSACTION_SEQUENCE_LENGTH > bytes.len() {
            return None;
        }
        Some(LE::read_u16(&bytes[field::TRANSACTION_SEQUENCE..]))
    }

    /// The status code; zero signals success.
    pub fn status_code(&self) -> Option<u16> {
        let bytes = self.frame_ref();
        if field::STATUS_CODE + field::STATUS_CODE_LENGTH > bytes.len() {
            return None;
        }
        Some(LE::read_u16(&bytes[field::STATUS_CODE..]))
    }

    /// The trailing element sequence.
    pub fn elements(&self) -> IeList<'_> {
        IeList::new(element_bytes(self.frame_ref(), field::ELEMENTS))
    }

    pub fn into_inner(self) -> Segment<Bytes> {
        self.segment
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> AuthenticationFrame<Bytes> {
    /// Write the algorithm number.
    pub fn set_algorithm_number(&mut self, algorithm: u16) {
        LE::write_u16(
            &mut self.frame_mut()[field::ALGORITHM_NUMBER..field::ALGORITHM_NUMBER + 2],
            algorithm,
        );
    }

    /// Write the transaction sequence number.
    pub fn set_transaction_sequence(&mut self, sequence: u16) {
        LE::write_u16(
            &mut self.frame_mut()[field::TRANSACTION_SEQUENCE..field::TRANSACTION_SEQUENCE + 2],
            sequence,
        );
    }

    /// Write the status code.
    pub fn set_status_code(&mut self, status: u16) {
        LE::write_u16(
            &mut self.frame_mut()[field::STATUS_CODE..field::STATUS_CODE + 2],
            status,
        );
    }
}

impl<Bytes: AsRef<[u8]>> FrameView for AuthenticationFrame<Bytes> {
    fn frame_ref(&self) -> &[u8] {
        self.segment.as_ref()
    }

    fn frame_size(&self) -> usize {
        field::ELEMENTS + self.elements().encoded_length()
    }
}

impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> FrameViewMut for AuthenticationFrame<Bytes> {
    fn frame_mut(&mut self) -> &mut [u8] {
        self.segment.as_mut()
    }
}

impl<Bytes: AsRef<[u8]>> ManagementFrameView for AuthenticationFrame<Bytes> {}
impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> ManagementFrameViewMut for AuthenticationFrame<Bytes> {}

/// Bytes needed for an authentication frame carrying `ies`, including the
/// FCS.
pub fn authentication_buffer_length(ies: &[IeRepr]) -> usize {
    field::ELEMENTS + ies_length(ies) + layout::FCS_LENGTH
}

/// Initialize an authentication frame from scratch in `buffer`.
///
/// The FCS is left for an explicit [`FrameViewMut::update_fcs()`]. The
/// buffer must be exactly [`authentication_buffer_length()`] bytes long.
pub fn authentication_frame<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
    destination: MacAddress,
    source: MacAddress,
    bssid: MacAddress,
    ies: &[IeRepr],
    buffer: Bytes,
) -> Result<AuthenticationFrame<Bytes>> {
    let mut segment = Segment::new(buffer);
    if segment.len() != authentication_buffer_length(ies) {
        return Err(Error);
    }
    segment.as_mut().fill(0);

    let mut frame = AuthenticationFrame { segment };
    init_management_header(
        &mut frame,
        FrameSubtype::Authentication,
        destination,
        source,
        bssid,
    );
    emit_ies(ies, &mut frame.frame_mut()[field::ELEMENTS..])?;
    Ok(frame)
}

/// A deauthentication notice: the body is a single reason code.
#[derive(Debug)]
pub struct DeauthenticationFrame<Bytes> {
    segment: Segment<Bytes>,
}

/// A disassociation notice: same body as a deauthentication.
#[derive(Debug)]
pub struct DisassociationFrame<Bytes> {
    segment: Segment<Bytes>,
}

macro_rules! reason_code_frame {
    ($Frame:ident, $subtype:expr, $buffer_length:ident, $constructor:ident) => {
        impl<Bytes: AsRef<[u8]>> $Frame<Bytes> {
            pub fn new(segment: Segment<Bytes>) -> Self {
                Self { segment }
            }

            /// Why the link is being torn down.
            pub fn reason_code(&self) -> Option<u16> {
                let bytes = self.frame_ref();
                if field::REASON_CODE + field::REASON_CODE_LENGTH > bytes.len() {
                    return None;
                }
                Some(LE::read_u16(&bytes[field::REASON_CODE..]))
            }

            pub fn into_inner(self) -> Segment<Bytes> {
                self.segment
            }
        }

        impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> $Frame<Bytes> {
            /// Write the reason code.
            pub fn set_reason_code(&mut self, reason: u16) {
                LE::write_u16(
                    &mut self.frame_mut()[field::REASON_CODE..field::REASON_CODE + 2],
                    reason,
                );
            }
        }

        impl<Bytes: AsRef<[u8]>> FrameView for $Frame<Bytes> {
            fn frame_ref(&self) -> &[u8] {
                self.segment.as_ref()
            }

            fn frame_size(&self) -> usize {
                field::REASON_CODE + field::REASON_CODE_LENGTH
            }
        }

        impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> FrameViewMut for $Frame<Bytes> {
            fn frame_mut(&mut self) -> &mut [u8] {
                self.segment.as_mut()
            }
        }

        impl<Bytes: AsRef<[u8]>> ManagementFrameView for $Frame<Bytes> {}
        impl<Bytes: AsRef<[u8]> + AsMut<[u8]>> ManagementFrameViewMut for $Frame<Bytes> {}

        /// Bytes needed for this frame, including the FCS.
        pub const $buffer_length: usize =
            field::REASON_CODE + field::REASON_CODE_LENGTH + layout::FCS_LENGTH;

        /// Initialize the frame from scratch in `buffer`.
        ///
        /// The FCS is left for an explicit [`FrameViewMut::update_fcs()`].
        pub fn $constructor<Bytes: AsRef<[u8]> + AsMut<[u8]>>(
            destination: MacAddress,
            source: MacAddress,
            bssid: MacAddress,
            reason: u16,
            buffer: Bytes,
        ) -> Result<$Frame<Bytes>> {
            let mut segment = Segment::new(buffer);
            if segment.len() != $buffer_length {
                return Err(Error);
            }
            segment.as_mut().fill(0);

            let mut frame = $Frame { segment };
            init_management_header(&mut frame, $subtype, destination, source, bssid);
            frame.set_reason_code(reason);
            Ok(frame)
        }
    };
}

reason_code_frame!(
    DeauthenticationFrame,
    FrameSubtype::Deauthentication,
    DEAUTHENTICATION_BUFFER_LENGTH,
    deauthentication_frame
);
reason_code_frame!(
    DisassociationFrame,
    FrameSubtype::Disassociation,
    DISASSOCIATION_BUFFER_LENGTH,
    disassociation_frame
);

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use super::*;
    use crate::ie::ElementId;

    #[test]
    fn shared_key_handshake_round_trip() {
        let ies = [IeRepr::new(ElementId::ChallengeText, &[0x5a; 16])];
        let mut buffer = vec![0u8; authentication_buffer_length(&ies)];
        let mut frame = authentication_frame(
            MacAddress::new([1; 6]),
            MacAddress::new([2; 6]),
            MacAddress::new([1; 6]),
            &ies,
            &mut buffer[..],
        )
        .unwrap();

        frame.set_algorithm_number(1);
        frame.set_transaction_sequence(2);
        frame.set_status_code(0);
        frame.update_fcs().unwrap();

        let mut out = vec![0u8; frame.total_length()];
        frame.emit(&mut out).unwrap();

        let reparsed = AuthenticationFrame::new(Segment::new(&out[..]));
        assert_eq!(reparsed.algorithm_number(), Some(1));
        assert_eq!(reparsed.transaction_sequence(), Some(2));
        assert_eq!(reparsed.status_code(), Some(0));
        assert_eq!(reparsed.elements().get(0).unwrap(), ies[0]);
        assert!(reparsed.fcs_valid());
    }

    #[test]
    fn teardown_notices() {
        let mut buffer = [0u8; DEAUTHENTICATION_BUFFER_LENGTH];
        let mut frame = deauthentication_frame(
            MacAddress::new([1; 6]),
            MacAddress::new([2; 6]),
            MacAddress::new([1; 6]),
            7,
            &mut buffer[..],
        )
        .unwrap();
        frame.update_fcs().unwrap();
        assert_eq!(frame.reason_code(), Some(7));
        assert_eq!(frame.frame_size(), 26);
        assert!(frame.fcs_valid());

        let mut buffer = [0u8; DISASSOCIATION_BUFFER_LENGTH];
        let frame = disassociation_frame(
            MacAddress::new([1; 6]),
            MacAddress::new([2; 6]),
            MacAddress::new([1; 6]),
            8,
            &mut buffer[..],
        )
        .unwrap();
        // Construction alone never stamps the checksum.
        assert_eq!(frame.fcs(), Some(0));
        assert!(!frame.fcs_valid());
    }
}

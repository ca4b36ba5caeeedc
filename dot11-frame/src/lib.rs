//! IEEE 802.11 MAC frame parsing and building.
//!
//! This crate dissects captured link-layer bytes into typed frame views and
//! serializes populated frames back into transmit-ready bytes, recomputing
//! the trailing frame check sequence on request. Field access is zero-copy:
//! every getter and setter reads or writes the shared [`Segment`] buffer
//! directly, so there is no per-field storage that could go stale.
//!
//! Parsing starts at [`mac::MacFrame::parse()`], which classifies the frame
//! by the subtype bits of its frame control word and selects the matching
//! view. Frames are built from scratch with the per-subtype constructor
//! functions in [`mac`], which write field defaults into a caller-provided
//! buffer; the checksum is only stamped by an explicit
//! [`FrameViewMut::update_fcs()`].

#![no_std]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod addressing;
pub mod fields;
pub mod ie;
pub mod mac;
pub mod segment;

pub use addressing::MacAddress;
pub use dot11_util::{Error, Result};
pub use mac::MacFrame;
pub use segment::Segment;

use byteorder::{ByteOrder, LE};
use crc::{Crc, CRC_32_ISO_HDLC};

use crate::addressing::ADDRESS_LENGTH;
use crate::fields::{layout, FrameControl};

// The FCS field contains a 32-bit ANSI X3.66-1979 CRC (aka CRC-32/ISO-HDLC,
// see https://reveng.sourceforge.io/crc-catalogue/17plus.htm).
const FCS_CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Parse progress of a frame view over its buffer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParseStatus {
    /// The buffer covers the whole declared frame including the FCS.
    FullyParsed,
    /// The buffer ends before the declared frame does. Fields beyond the end
    /// read as absent and the FCS reports invalid.
    Truncated,
}

pub(crate) fn address_at(bytes: &[u8], pos: usize) -> Option<MacAddress> {
    if pos + ADDRESS_LENGTH > bytes.len() {
        return None;
    }
    MacAddress::from_bytes(&bytes[pos..pos + ADDRESS_LENGTH]).ok()
}

/// Read access shared by every MAC frame view.
///
/// Accessors return `None` instead of reading past the end of a short
/// buffer: a view over a truncated capture keeps the in-bounds fields
/// readable and reports an invalid FCS rather than failing to parse.
pub trait FrameView {
    /// The raw frame bytes, starting at the frame control word.
    fn frame_ref(&self) -> &[u8];

    /// Bytes covered by the MAC header and frame body, excluding the FCS.
    ///
    /// Recomputed from the fixed field widths and the variable trailer on
    /// every call, so it never goes stale after a mutation.
    fn frame_size(&self) -> usize;

    /// Total length of the frame on the wire, including the FCS.
    fn total_length(&self) -> usize {
        self.frame_size() + layout::FCS_LENGTH
    }

    /// Whether the buffer covers the whole declared frame.
    fn parse_status(&self) -> ParseStatus {
        if self.frame_ref().len() >= self.total_length() {
            ParseStatus::FullyParsed
        } else {
            ParseStatus::Truncated
        }
    }

    /// The frame control word, absent when even that lies beyond the buffer.
    fn frame_control(&self) -> Option<FrameControl> {
        let bytes = self.frame_ref();
        if layout::FRAME_CONTROL + layout::FRAME_CONTROL_LENGTH > bytes.len() {
            return None;
        }
        Some(FrameControl::from_bits(LE::read_u16(
            &bytes[layout::FRAME_CONTROL..],
        )))
    }

    /// The duration/ID field.
    fn duration_id(&self) -> Option<u16> {
        let bytes = self.frame_ref();
        if layout::DURATION_ID + layout::DURATION_ID_LENGTH > bytes.len() {
            return None;
        }
        Some(LE::read_u16(&bytes[layout::DURATION_ID..]))
    }

    /// The n-th (zero-based) contiguous address field.
    fn address(&self, index: usize) -> Option<MacAddress> {
        address_at(self.frame_ref(), layout::address(index))
    }

    /// The stored frame check sequence.
    fn fcs(&self) -> Option<u32> {
        let bytes = self.frame_ref();
        let pos = self.frame_size();
        if pos + layout::FCS_LENGTH > bytes.len() {
            return None;
        }
        Some(LE::read_u32(&bytes[pos..]))
    }

    /// The FCS recomputed over the covered frame bytes.
    fn computed_fcs(&self) -> Option<u32> {
        let bytes = self.frame_ref();
        let size = self.frame_size();
        if size > bytes.len() {
            return None;
        }
        Some(FCS_CRC.checksum(&bytes[..size]))
    }

    /// Compare the stored FCS against a fresh computation, without mutating
    /// the frame.
    fn fcs_valid(&self) -> bool {
        match (self.fcs(), self.computed_fcs()) {
            (Some(stored), Some(computed)) => stored == computed,
            _ => false,
        }
    }

    /// Copy the transmit-ready frame bytes (header, body and FCS) to the
    /// start of `out` and return the number of bytes written.
    ///
    /// Returns an error when the frame is truncated or `out` is too short.
    fn emit(&self, out: &mut [u8]) -> Result<usize> {
        let total = self.total_length();
        if self.frame_ref().len() < total || out.len() < total {
            return Err(Error);
        }
        out[..total].copy_from_slice(&self.frame_ref()[..total]);
        Ok(total)
    }
}

/// Write access shared by every MAC frame view over a mutable buffer.
///
/// Setters address fixed fields and panic when the field lies outside the
/// buffer; structural changes (element lists, payload sizes) go through the
/// constructor functions in [`mac`] instead.
pub trait FrameViewMut: FrameView {
    /// The raw frame bytes for writing.
    fn frame_mut(&mut self) -> &mut [u8];

    /// Write the frame control word.
    fn set_frame_control(&mut self, fc: FrameControl) {
        LE::write_u16(
            &mut self.frame_mut()[layout::FRAME_CONTROL..layout::FRAME_CONTROL + 2],
            fc.into_bits(),
        );
    }

    /// Write the duration/ID field.
    fn set_duration_id(&mut self, duration: u16) {
        LE::write_u16(
            &mut self.frame_mut()[layout::DURATION_ID..layout::DURATION_ID + 2],
            duration,
        );
    }

    /// Write the n-th (zero-based) contiguous address field.
    fn set_address(&mut self, index: usize, address: MacAddress) {
        let pos = layout::address(index);
        self.frame_mut()[pos..pos + ADDRESS_LENGTH].copy_from_slice(address.as_ref());
    }

    /// Recompute the FCS over the covered frame bytes and store it in the
    /// trailing checksum field.
    ///
    /// Never called implicitly: callers stamp the checksum once their edits
    /// are complete. Returns an error when the buffer cannot hold the frame
    /// and its FCS.
    fn update_fcs(&mut self) -> Result<()> {
        let size = self.frame_size();
        let bytes = self.frame_mut();
        if size + layout::FCS_LENGTH > bytes.len() {
            return Err(Error);
        }
        let fcs = FCS_CRC.checksum(&bytes[..size]);
        LE::write_u32(&mut bytes[size..size + layout::FCS_LENGTH], fcs);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fcs_crc_check_value() {
        // The standard check input for CRC-32/ISO-HDLC.
        assert_eq!(FCS_CRC.checksum(b"123456789"), 0xcbf43926);
    }
}

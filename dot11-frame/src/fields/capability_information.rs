//! IEEE 802.11 Capability Information field.

use bitfield_struct::bitfield;

/// The 16-bit capability word advertised by beacons and (re)association
/// frames.
///
/// Bits without a named accessor are reserved here and preserved verbatim
/// across decode/encode.
#[bitfield(u16)]
#[derive(PartialEq, Eq)]
pub struct CapabilityInformation {
    pub ess: bool,
    pub ibss: bool,
    pub cf_pollable: bool,
    pub cf_poll_request: bool,
    pub privacy: bool,
    pub short_preamble: bool,
    pub pbcc: bool,
    pub channel_agility: bool,
    #[bits(2)]
    _reserved0: u8,
    pub short_time_slot: bool,
    #[bits(2)]
    _reserved1: u8,
    pub dsss_ofdm: bool,
    #[bits(2)]
    _reserved2: u8,
}

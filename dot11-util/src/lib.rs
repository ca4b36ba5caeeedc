//! This crate contains generic utilities other dot11 crates depend upon but
//! not directly related to the IEEE 802.11 standard.
//!
//! The main purpose of this crate is to make dot11 as self-contained as
//! possible.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod log;

#[cfg(any(feature = "defmt", feature = "log"))]
pub use self::log::*;

/// A generic error.
#[derive(Debug, Clone, Copy)]
pub struct Error;

/// A type alias for `Result<T, dot11-util::Error>`.
pub type Result<T> = core::result::Result<T, Error>;

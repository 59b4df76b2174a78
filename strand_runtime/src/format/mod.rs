// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compiled image format.
//!
//! A compiled image is a flat byte buffer:
//!
//! ```text
//! magic        4 bytes   b"STRD"
//! version      u8        currently 1
//! flags        u8        reserved, must be 0
//! globals      uleb128   global slot count
//! units        uleb128   unit count
//! unit table   per unit: hash (u64, little endian), code offset (uleb128), params (u8)
//! code length  uleb128
//! code         bytes
//! ```
//!
//! Unit code offsets are absolute positions within the whole buffer and must land inside the
//! code section; an empty body may also start exactly at its end. The buffer must end exactly
//! at the end of the code section.

use core::fmt;

use crate::unit::UnitHash;

mod reader;
mod writer;

pub use reader::Reader;
pub(crate) use reader::{Image, read_header, read_image};
pub use writer::{ImageBuilder, write_sleb128_i64, write_uleb128_u64};

/// Leading magic bytes of every compiled image.
pub const MAGIC: [u8; 4] = *b"STRD";

/// The image version this crate reads and writes.
pub const VERSION: u8 = 1;

/// Why a compiled image was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// The buffer does not start with [`MAGIC`].
    BadMagic,
    /// The version byte is not [`VERSION`].
    UnsupportedVersion(u8),
    /// The buffer ended in the middle of a field.
    UnexpectedEof,
    /// A LEB128 field was overlong or overflowed.
    InvalidVarint,
    /// The reserved flags byte was not zero.
    ReservedFlags(u8),
    /// A unit's code offset falls outside the code section.
    OffsetOutOfBounds {
        /// Unit index in compiled order.
        unit: usize,
        /// The offending offset.
        offset: u64,
    },
    /// Two units share a hash.
    DuplicateUnit(UnitHash),
    /// The unit count exceeds the configured limit.
    TooManyUnits,
    /// The global slot count exceeds the configured limit.
    TooManyGlobals,
    /// Bytes remain after the code section.
    TrailingBytes,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadMagic => write!(f, "bad magic"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported image version {v}"),
            Self::UnexpectedEof => write!(f, "unexpected end of image"),
            Self::InvalidVarint => write!(f, "invalid varint"),
            Self::ReservedFlags(flags) => write!(f, "reserved flags set: {flags:#04x}"),
            Self::OffsetOutOfBounds { unit, offset } => {
                write!(f, "unit {unit} code offset {offset} out of bounds")
            }
            Self::DuplicateUnit(hash) => write!(f, "duplicate unit {hash}"),
            Self::TooManyUnits => write!(f, "too many units"),
            Self::TooManyGlobals => write!(f, "too many globals"),
            Self::TrailingBytes => write!(f, "trailing bytes after code section"),
        }
    }
}

impl core::error::Error for LoadError {}

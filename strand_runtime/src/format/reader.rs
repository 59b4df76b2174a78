// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::ops::Range;

use hashbrown::HashSet;

use super::{LoadError, MAGIC, VERSION};
use crate::context::Limits;
use crate::unit::{UnitDescriptor, UnitHash};

/// Forward-only cursor over image or code bytes.
///
/// Executors use it to decode operands from a unit's code slice.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Starts reading at the beginning of `bytes`.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Current position in bytes.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Returns `true` once every byte has been consumed.
    #[must_use]
    pub const fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Reads one byte.
    pub fn u8(&mut self) -> Result<u8, LoadError> {
        let b = *self.bytes.get(self.pos).ok_or(LoadError::UnexpectedEof)?;
        self.pos += 1;
        Ok(b)
    }

    /// Reads a little-endian `u64`.
    pub fn u64_le(&mut self) -> Result<u64, LoadError> {
        let raw = self.take(8)?;
        let mut buf = [0_u8; 8];
        buf.copy_from_slice(raw);
        Ok(u64::from_le_bytes(buf))
    }

    /// Consumes and returns the next `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], LoadError> {
        let end = self.pos.checked_add(n).ok_or(LoadError::UnexpectedEof)?;
        let out = self
            .bytes
            .get(self.pos..end)
            .ok_or(LoadError::UnexpectedEof)?;
        self.pos = end;
        Ok(out)
    }

    /// Reads an unsigned LEB128 integer.
    pub fn uleb(&mut self) -> Result<u64, LoadError> {
        let mut value = 0_u64;
        for i in 0..10 {
            let b = self.u8()?;
            let payload = b & 0x7f;
            if i == 9 && payload > 1 {
                return Err(LoadError::InvalidVarint);
            }
            value |= u64::from(payload) << (7 * i);
            if b & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(LoadError::InvalidVarint)
    }

    /// Reads a signed LEB128 integer.
    pub fn sleb(&mut self) -> Result<i64, LoadError> {
        let mut value = 0_i64;
        let mut shift = 0_u32;
        for i in 0..10 {
            let b = self.u8()?;
            let payload = b & 0x7f;
            if i == 9 && payload != 0x00 && payload != 0x7f {
                return Err(LoadError::InvalidVarint);
            }
            value |= i64::from(payload) << shift;
            shift += 7;
            if b & 0x80 == 0 {
                if shift < 64 && b & 0x40 != 0 {
                    value |= !0_i64 << shift;
                }
                return Ok(value);
            }
        }
        Err(LoadError::InvalidVarint)
    }
}

/// Fixed header fields, readable even when the rest of the image is damaged.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Header {
    pub(crate) globals: u64,
}

/// A validated image: descriptors plus where the code lives.
#[derive(Clone, Debug)]
pub(crate) struct Image {
    pub(crate) globals: usize,
    pub(crate) units: Vec<UnitDescriptor>,
    pub(crate) code: Range<usize>,
}

fn header(r: &mut Reader<'_>) -> Result<Header, LoadError> {
    if r.take(MAGIC.len()).map_err(|_| LoadError::BadMagic)? != MAGIC {
        return Err(LoadError::BadMagic);
    }
    let version = r.u8()?;
    if version != VERSION {
        return Err(LoadError::UnsupportedVersion(version));
    }
    let flags = r.u8()?;
    if flags != 0 {
        return Err(LoadError::ReservedFlags(flags));
    }
    Ok(Header { globals: r.uleb()? })
}

pub(crate) fn read_header(bytes: &[u8]) -> Result<Header, LoadError> {
    header(&mut Reader::new(bytes))
}

pub(crate) fn read_image(bytes: &[u8], limits: &Limits) -> Result<Image, LoadError> {
    let mut r = Reader::new(bytes);
    let Header { globals } = header(&mut r)?;
    let globals = usize::try_from(globals)
        .ok()
        .filter(|g| *g <= limits.max_globals)
        .ok_or(LoadError::TooManyGlobals)?;

    let count = usize::try_from(r.uleb()?)
        .ok()
        .filter(|c| *c <= limits.max_units)
        .ok_or(LoadError::TooManyUnits)?;

    let mut seen = HashSet::with_capacity(count);
    let mut table = Vec::with_capacity(count);
    for _ in 0..count {
        let hash = UnitHash(r.u64_le()?);
        let offset = r.uleb()?;
        let params = r.u8()?;
        if !seen.insert(hash) {
            return Err(LoadError::DuplicateUnit(hash));
        }
        table.push((hash, offset, params));
    }

    let code_len = usize::try_from(r.uleb()?).map_err(|_| LoadError::UnexpectedEof)?;
    let start = r.pos();
    r.take(code_len)?;
    let code = start..r.pos();
    if !r.is_at_end() {
        return Err(LoadError::TrailingBytes);
    }

    let units = table
        .into_iter()
        .enumerate()
        .map(|(unit, (hash, offset, params))| {
            // An empty body may start at the very end of the code section.
            let in_code = usize::try_from(offset).is_ok_and(|o| code.start <= o && o <= code.end);
            match u32::try_from(offset) {
                Ok(offset) if in_code => Ok(UnitDescriptor {
                    hash,
                    offset,
                    params,
                }),
                _ => Err(LoadError::OffsetOutOfBounds { unit, offset }),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Image {
        globals,
        units,
        code,
    })
}

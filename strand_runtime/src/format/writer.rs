// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use super::{MAGIC, VERSION};
use crate::unit::{UnitHash, unit_hash};

/// Writes an unsigned LEB128 integer.
#[allow(clippy::cast_possible_truncation, reason = "masked to seven bits")]
pub fn write_uleb128_u64(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let b = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(b);
            return;
        }
        out.push(b | 0x80);
    }
}

/// Writes a signed LEB128 integer.
#[allow(clippy::cast_possible_truncation, reason = "masked to seven bits")]
pub fn write_sleb128_i64(out: &mut Vec<u8>, mut value: i64) {
    loop {
        let b = (value & 0x7f) as u8;
        value >>= 7;
        let sign_clear = b & 0x40 == 0;
        if (value == 0 && sign_clear) || (value == -1 && !sign_clear) {
            out.push(b);
            return;
        }
        out.push(b | 0x80);
    }
}

fn uleb_len(mut value: u64) -> usize {
    let mut n = 1;
    while value >= 0x80 {
        value >>= 7;
        n += 1;
    }
    n
}

/// Assembles a compiled image from unit code blobs.
///
/// Units are laid out in the order they are added. Offsets are resolved to absolute buffer
/// positions by [`ImageBuilder::finish`].
///
/// ```
/// use strand_runtime::format::ImageBuilder;
///
/// let mut image = ImageBuilder::new(2);
/// image.unit("main", 0, &[0x00]).unit("helper", 1, &[0x00]);
/// let bytes = image.finish();
/// assert_eq!(&bytes[..4], b"STRD");
/// ```
#[derive(Clone, Debug, Default)]
pub struct ImageBuilder {
    globals: u64,
    units: Vec<(UnitHash, u8, usize)>,
    code: Vec<u8>,
}

impl ImageBuilder {
    /// Starts an image with `globals` global slots.
    #[must_use]
    pub fn new(globals: u64) -> Self {
        Self {
            globals,
            ..Self::default()
        }
    }

    /// Appends a unit named `name`.
    pub fn unit(&mut self, name: &str, params: u8, code: &[u8]) -> &mut Self {
        self.unit_with_hash(unit_hash(name), params, code)
    }

    /// Appends a unit under an explicit hash.
    pub fn unit_with_hash(&mut self, hash: UnitHash, params: u8, code: &[u8]) -> &mut Self {
        self.units.push((hash, params, self.code.len()));
        self.code.extend_from_slice(code);
        self
    }

    /// Serializes the image.
    #[must_use]
    pub fn finish(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&MAGIC);
        out.push(VERSION);
        out.push(0);
        write_uleb128_u64(&mut out, self.globals);
        write_uleb128_u64(&mut out, self.units.len() as u64);

        // Offset widths depend on where the code lands, which depends on the offset widths.
        // Start from the smallest layout and grow until it is stable.
        let fixed = out.len() + uleb_len(self.code.len() as u64);
        let mut base = fixed + self.units.len() * 10;
        loop {
            let table: usize = self
                .units
                .iter()
                .map(|(_, _, rel)| 9 + uleb_len((base + rel) as u64))
                .sum();
            if fixed + table == base {
                break;
            }
            base = fixed + table;
        }

        for (hash, params, rel) in &self.units {
            out.extend_from_slice(&hash.0.to_le_bytes());
            write_uleb128_u64(&mut out, (base + rel) as u64);
            out.push(*params);
        }
        write_uleb128_u64(&mut out, self.code.len() as u64);
        out.extend_from_slice(&self.code);
        out
    }
}

// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Callable unit descriptors.

use core::fmt;

/// Stable 64-bit identifier of a callable unit.
///
/// Compilers derive it from the unit's name with [`unit_hash`]; it is what callers, the
/// disassembler and cross-context references use to refer to a unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct UnitHash(pub u64);

impl fmt::Display for UnitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hashes a unit name (FNV-1a, 64-bit).
#[must_use]
pub const fn unit_hash(name: &str) -> UnitHash {
    let bytes = name.as_bytes();
    let mut h = FNV_OFFSET;
    let mut i = 0;
    while i < bytes.len() {
        h ^= bytes[i] as u64;
        h = h.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    UnitHash(h)
}

/// One entry of a context's unit table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnitDescriptor {
    /// Stable content hash.
    pub hash: UnitHash,
    /// Absolute byte offset of the unit's code within the compiled buffer.
    pub offset: u32,
    /// Declared formal-parameter count.
    pub params: u8,
}

/// How a caller names a unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnitTarget<'a> {
    /// By source name, hashed with [`unit_hash`].
    Name(&'a str),
    /// By precomputed hash.
    Hash(UnitHash),
}

impl UnitTarget<'_> {
    /// Resolves the target to a hash.
    #[must_use]
    pub const fn hash(self) -> UnitHash {
        match self {
            Self::Name(name) => unit_hash(name),
            Self::Hash(hash) => hash,
        }
    }
}

impl<'a> From<&'a str> for UnitTarget<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl From<UnitHash> for UnitTarget<'_> {
    fn from(hash: UnitHash) -> Self {
        Self::Hash(hash)
    }
}

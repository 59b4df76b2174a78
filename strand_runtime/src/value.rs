// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime value model for `strand_runtime`.
//!
//! [`Value`] is the tagged datum every script expression produces. Values are passed by copy at
//! the language level; heap payloads (strings, arrays, hash tables) are reference counted and
//! copy-on-write, so mutating one holder never changes what another holder observes.
//!
//! Native-data handles are the one exception: they alias host memory and are shared by design
//! (see [`crate::native`]).

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::native::NativeData;
use crate::table::HashTable;
use crate::unit::UnitHash;

/// The tag of a [`Value`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// The unset value.
    Null,
    /// Signed integer.
    Int,
    /// 64-bit float.
    Float,
    /// String.
    Str,
    /// Array.
    Array,
    /// Hash table.
    Hash,
    /// Native-data handle.
    Native,
    /// Unit reference.
    Unit,
}

impl Tag {
    /// Returns `true` for [`Tag::Int`] and [`Tag::Float`].
    #[must_use]
    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Lowercase name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
            Self::Array => "array",
            Self::Hash => "hash",
            Self::Native => "native",
            Self::Unit => "unit",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of a loaded [`Context`](crate::context::Context).
///
/// Ids are unique for the lifetime of the process (until the counter wraps).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct ContextId(pub u32);

/// A reference to a callable unit inside a specific context.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnitRef {
    /// Stable content hash of the unit.
    pub hash: UnitHash,
    /// Context owning the unit.
    pub context: ContextId,
}

/// A runtime value.
///
/// `PartialEq` on `Value` is structural (useful for hosts and tests). Script-level `==` lives in
/// [`crate::coerce::equals`], which applies numeric promotion and refuses container operands.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// The unset value. Distinct from `0` and `""`.
    #[default]
    Null,
    /// Signed integer, wrapped to the context's working width.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// Shared, copy-on-write string.
    Str(Rc<String>),
    /// Shared, copy-on-write array.
    Array(Rc<Vec<Value>>),
    /// Shared, copy-on-write hash table.
    Hash(Rc<HashTable>),
    /// Non-owning handle onto host data.
    Native(NativeData),
    /// Reference to a callable unit.
    Unit(UnitRef),
}

impl Value {
    /// Creates a string value.
    #[must_use]
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(Rc::new(s.into()))
    }

    /// Creates an array value from `items`.
    #[must_use]
    pub fn array(items: Vec<Self>) -> Self {
        Self::Array(Rc::new(items))
    }

    /// Creates an empty hash table value.
    #[must_use]
    pub fn hash() -> Self {
        Self::Hash(Rc::new(HashTable::new()))
    }

    /// Returns this value's tag.
    #[must_use]
    pub fn tag(&self) -> Tag {
        match self {
            Self::Null => Tag::Null,
            Self::Int(_) => Tag::Int,
            Self::Float(_) => Tag::Float,
            Self::Str(_) => Tag::Str,
            Self::Array(_) => Tag::Array,
            Self::Hash(_) => Tag::Hash,
            Self::Native(_) => Tag::Native,
            Self::Unit(_) => Tag::Unit,
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the numeric payload as a float, promoting integers.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the array elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Returns the hash table, if this is one.
    #[must_use]
    pub fn as_hash(&self) -> Option<&HashTable> {
        match self {
            Self::Hash(table) => Some(table),
            _ => None,
        }
    }

    /// Script truthiness: `null`, `0`, `0.0` and `""` are false, everything else is true.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Int(v) => *v != 0,
            Self::Float(v) => *v != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::Array(_) | Self::Hash(_) | Self::Native(_) | Self::Unit(_) => true,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Hash(a), Self::Hash(b)) => a == b,
            (Self::Native(a), Self::Native(b)) => a.same_target(b),
            (Self::Unit(a), Self::Unit(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::str(s)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::array(items)
    }
}

impl From<UnitRef> for Value {
    fn from(r: UnitRef) -> Self {
        Self::Unit(r)
    }
}

/// Canonical text form, used by string concatenation.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
            Self::Array(items) => write!(f, "[array:{}]", items.len()),
            Self::Hash(table) => write!(f, "[hash:{}]", table.len()),
            Self::Native(data) => write!(f, "[native:{}]", data.kind_name()),
            Self::Unit(r) => write!(f, "[unit:{}]", r.hash),
        }
    }
}

// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Script-level error taxonomy.
//!
//! Every failure that malformed script logic can provoke is reported as a [`ScriptError`] value
//! to the caller. Nothing in this crate aborts the host process on bad script input.

use alloc::boxed::Box;
use core::fmt;

use crate::format::LoadError;
use crate::unit::UnitHash;
use crate::value::Tag;

/// A script-level failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptError {
    /// An operator was applied to incompatible tags.
    TypeMismatch {
        /// Operator or operation name (e.g. `"+"`, `"push"`).
        op: &'static str,
        /// Tag of the left (or only) operand.
        lhs: Tag,
        /// Tag of the right operand, for binary operators.
        rhs: Option<Tag>,
    },
    /// A hash-table key was neither an integer nor a string.
    InvalidKey(Tag),
    /// `pop`, `pop_back` or `peek` on an empty sequence.
    EmptyContainer,
    /// Insert or access beyond the bounds of a sequence.
    IndexOutOfRange {
        /// Requested index.
        index: i64,
        /// Element count at the time of the access.
        len: usize,
    },
    /// A compiled buffer could not be loaded into a context.
    ContextCreationFailed(LoadError),
    /// Integer division or remainder by zero.
    DivisionByZero,
    /// A numeric literal could not be parsed.
    InvalidLiteral,
    /// A native-data handle outlived the host storage it aliases.
    DanglingNative,
    /// No unit with this hash exists in the context.
    UnknownUnit(UnitHash),
    /// No native function is registered under this name.
    UnknownNative(Box<str>),
    /// A unit reference was used with a context that does not own it.
    ForeignUnit(UnitHash),
    /// A native function reported a failure.
    Native(Box<str>),
}

impl ScriptError {
    pub(crate) fn mismatch(op: &'static str, lhs: Tag, rhs: Tag) -> Self {
        Self::TypeMismatch {
            op,
            lhs,
            rhs: Some(rhs),
        }
    }

    pub(crate) fn mismatch_unary(op: &'static str, lhs: Tag) -> Self {
        Self::TypeMismatch { op, lhs, rhs: None }
    }

    /// Builds a host-raised failure with a message.
    pub fn native(msg: impl Into<Box<str>>) -> Self {
        Self::Native(msg.into())
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch {
                op,
                lhs,
                rhs: Some(rhs),
            } => write!(f, "type mismatch: {lhs} {op} {rhs}"),
            Self::TypeMismatch { op, lhs, rhs: None } => {
                write!(f, "type mismatch: {op} on {lhs}")
            }
            Self::InvalidKey(tag) => write!(f, "invalid hash key of type {tag}"),
            Self::EmptyContainer => write!(f, "container is empty"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::ContextCreationFailed(err) => write!(f, "context creation failed: {err}"),
            Self::DivisionByZero => write!(f, "integer division by zero"),
            Self::InvalidLiteral => write!(f, "invalid numeric literal"),
            Self::DanglingNative => write!(f, "native data no longer alive"),
            Self::UnknownUnit(hash) => write!(f, "unknown unit {hash}"),
            Self::UnknownNative(name) => write!(f, "unknown native function `{name}`"),
            Self::ForeignUnit(hash) => write!(f, "unit {hash} belongs to another context"),
            Self::Native(msg) => write!(f, "native error: {msg}"),
        }
    }
}

impl core::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::ContextCreationFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LoadError> for ScriptError {
    fn from(err: LoadError) -> Self {
        Self::ContextCreationFailed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_names_both_operands() {
        let err = ScriptError::mismatch("+", Tag::Array, Tag::Int);
        assert_eq!(err.to_string(), "type mismatch: array + int");
    }

    #[test]
    fn load_errors_convert_to_creation_failure() {
        let err: ScriptError = LoadError::BadMagic.into();
        assert_eq!(err, ScriptError::ContextCreationFailed(LoadError::BadMagic));
        assert!(core::error::Error::source(&err).is_some());
    }
}

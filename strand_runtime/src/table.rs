// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Associative hash table keyed by integers or strings.
//!
//! Iteration order is unspecified. A read of a missing key yields [`Value::Null`] rather than
//! failing; a write to a missing key creates the entry.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::error::ScriptError;
use crate::value::Value;

/// A validated hash-table key.
///
/// Only integer and string values can be keys; [`HashKey::try_from`] reports anything else as
/// [`ScriptError::InvalidKey`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HashKey {
    /// Integer key.
    Int(i64),
    /// String key.
    Str(Rc<String>),
}

impl HashKey {
    /// Builds a string key.
    #[must_use]
    pub fn str(s: &str) -> Self {
        Self::Str(Rc::new(s.into()))
    }

    /// Converts the key back into a value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(v) => Value::Int(*v),
            Self::Str(s) => Value::Str(Rc::clone(s)),
        }
    }
}

impl TryFrom<&Value> for HashKey {
    type Error = ScriptError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(v) => Ok(Self::Int(*v)),
            Value::Str(s) => Ok(Self::Str(Rc::clone(s))),
            other => Err(ScriptError::InvalidKey(other.tag())),
        }
    }
}

impl From<i64> for HashKey {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for HashKey {
    fn from(s: &str) -> Self {
        Self::str(s)
    }
}

/// A script hash table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HashTable {
    entries: HashMap<HashKey, Value>,
}

impl HashTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Number of entries.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads `key`, yielding [`Value::Null`] when absent.
    #[must_use]
    pub fn get(&self, key: &HashKey) -> Value {
        self.entries.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Returns a mutable slot for `key`, creating it as `Null` when absent.
    pub fn entry_mut(&mut self, key: HashKey) -> &mut Value {
        self.entries.entry(key).or_insert(Value::Null)
    }

    /// Writes `value` under `key`, creating or overwriting the entry.
    pub fn insert(&mut self, key: HashKey, value: Value) {
        self.entries.insert(key, value);
    }

    /// Removes `key`, returning the previous value if any.
    pub fn remove(&mut self, key: &HashKey) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Returns `true` if `key` has an entry.
    #[must_use]
    pub fn contains_key(&self, key: &HashKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns all keys in unspecified order.
    #[must_use]
    pub fn keys(&self) -> Vec<HashKey> {
        self.entries.keys().cloned().collect()
    }

    /// Iterates entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&HashKey, &Value)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_null() {
        let t = HashTable::new();
        assert!(t.get(&HashKey::str("nope")).is_null());
    }

    #[test]
    fn int_and_string_keys_are_distinct() {
        let mut t = HashTable::new();
        t.insert(HashKey::Int(1), Value::from("int"));
        t.insert(HashKey::str("1"), Value::from("str"));
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(&HashKey::Int(1)), Value::from("int"));
        assert_eq!(t.get(&HashKey::str("1")), Value::from("str"));
    }

    #[test]
    fn non_scalar_keys_are_rejected() {
        assert_eq!(
            HashKey::try_from(&Value::Float(1.0)),
            Err(ScriptError::InvalidKey(crate::value::Tag::Float))
        );
        assert_eq!(
            HashKey::try_from(&Value::Null),
            Err(ScriptError::InvalidKey(crate::value::Tag::Null))
        );
    }

    #[test]
    fn remove_and_contains() {
        let mut t = HashTable::new();
        t.insert(HashKey::str("a"), Value::Int(1));
        assert!(t.contains_key(&HashKey::str("a")));
        assert_eq!(t.remove(&HashKey::str("a")), Some(Value::Int(1)));
        assert!(!t.contains_key(&HashKey::str("a")));
        assert!(t.is_empty());
    }
}

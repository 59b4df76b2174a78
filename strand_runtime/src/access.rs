// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subscript (`v[k]`), field (`v.name`) and count access across every container kind.
//!
//! Field access is sugar for string-keyed subscript access: `t.str` and `t["str"]` read and
//! write the same hash-table entry. On user-data records, fields resolve through the record and
//! may alias host memory.

use alloc::rc::Rc;

use crate::error::ScriptError;
use crate::native::NativeData;
use crate::table::{HashKey, HashTable};
use crate::value::{Tag, Value};

fn array_index(key: &Value, len: usize) -> Result<Option<usize>, ScriptError> {
    let Value::Int(i) = key else {
        return Err(ScriptError::mismatch("[]", Tag::Array, key.tag()));
    };
    Ok(usize::try_from(*i).ok().filter(|&i| i <= len))
}

fn vivify(target: &mut Value) {
    if target.is_null() {
        *target = Value::Hash(Rc::new(HashTable::new()));
    }
}

/// Reads `target[key]`.
///
/// Missing hash-table keys read as [`Value::Null`]. Out-of-range array indices are
/// [`ScriptError::IndexOutOfRange`].
pub fn index_get(target: &Value, key: &Value) -> Result<Value, ScriptError> {
    match target {
        Value::Array(items) => {
            let oob = || ScriptError::IndexOutOfRange {
                index: key.as_int().unwrap_or(-1),
                len: items.len(),
            };
            let at = array_index(key, items.len())?.ok_or_else(oob)?;
            items.get(at).cloned().ok_or_else(oob)
        }
        Value::Hash(table) => Ok(table.get(&HashKey::try_from(key)?)),
        Value::Str(s) => {
            let Value::Int(i) = key else {
                return Err(ScriptError::mismatch("[]", Tag::Str, key.tag()));
            };
            usize::try_from(*i)
                .ok()
                .and_then(|at| s.as_bytes().get(at))
                .map(|b| Value::Int(i64::from(*b)))
                .ok_or(ScriptError::IndexOutOfRange {
                    index: *i,
                    len: s.len(),
                })
        }
        Value::Native(NativeData::Slice(slice)) => {
            let Value::Int(i) = key else {
                return Err(ScriptError::mismatch("[]", Tag::Native, key.tag()));
            };
            slice.get(*i)
        }
        Value::Native(NativeData::Record(record)) => match key {
            Value::Str(name) => record.borrow().get(name),
            other => Err(ScriptError::InvalidKey(other.tag())),
        },
        Value::Native(NativeData::Value(weak)) => {
            let cell = weak.upgrade().ok_or(ScriptError::DanglingNative)?;
            let inner = cell.borrow().clone();
            index_get(&inner, key)
        }
        other => Err(ScriptError::mismatch("[]", other.tag(), key.tag())),
    }
}

/// Writes `target[key] = value`.
///
/// A `null` target becomes a new hash table first. Writing an array at `index == count`
/// appends; beyond that is [`ScriptError::IndexOutOfRange`].
pub fn index_set(target: &mut Value, key: &Value, value: Value) -> Result<(), ScriptError> {
    vivify(target);
    match target {
        Value::Array(items) => {
            let len = items.len();
            let Some(at) = array_index(key, len)? else {
                return Err(ScriptError::IndexOutOfRange {
                    index: key.as_int().unwrap_or(-1),
                    len,
                });
            };
            let items = Rc::make_mut(items);
            if at == len {
                items.push(value);
            } else {
                items[at] = value;
            }
            Ok(())
        }
        Value::Hash(table) => {
            let key = HashKey::try_from(key)?;
            Rc::make_mut(table).insert(key, value);
            Ok(())
        }
        Value::Native(NativeData::Slice(slice)) => {
            let Value::Int(i) = key else {
                return Err(ScriptError::mismatch("[]=", Tag::Native, key.tag()));
            };
            slice.set(*i, &value)
        }
        Value::Native(NativeData::Record(record)) => match key {
            Value::Str(name) => record.borrow_mut().set(name, value),
            other => Err(ScriptError::InvalidKey(other.tag())),
        },
        Value::Native(NativeData::Value(weak)) => {
            let cell = weak.upgrade().ok_or(ScriptError::DanglingNative)?;
            let mut inner = cell.borrow().clone();
            index_set(&mut inner, key, value)?;
            *cell.borrow_mut() = inner;
            Ok(())
        }
        other => Err(ScriptError::mismatch("[]=", other.tag(), key.tag())),
    }
}

/// Reads `target.name`.
pub fn field_get(target: &Value, name: &str) -> Result<Value, ScriptError> {
    match target {
        Value::Hash(table) => Ok(table.get(&HashKey::str(name))),
        Value::Native(NativeData::Record(record)) => record.borrow().get(name),
        Value::Native(NativeData::Value(weak)) => {
            let cell = weak.upgrade().ok_or(ScriptError::DanglingNative)?;
            let inner = cell.borrow().clone();
            field_get(&inner, name)
        }
        other => Err(ScriptError::mismatch_unary(".", other.tag())),
    }
}

/// Writes `target.name = value`. A `null` target becomes a new hash table first.
pub fn field_set(target: &mut Value, name: &str, value: Value) -> Result<(), ScriptError> {
    vivify(target);
    match target {
        Value::Hash(table) => {
            Rc::make_mut(table).insert(HashKey::str(name), value);
            Ok(())
        }
        Value::Native(NativeData::Record(record)) => record.borrow_mut().set(name, value),
        Value::Native(NativeData::Value(weak)) => {
            let cell = weak.upgrade().ok_or(ScriptError::DanglingNative)?;
            let mut inner = cell.borrow().clone();
            field_set(&mut inner, name, value)?;
            *cell.borrow_mut() = inner;
            Ok(())
        }
        other => Err(ScriptError::mismatch_unary(".=", other.tag())),
    }
}

/// Removes `key` from a hash table, returning the old value (`Null` if absent).
pub fn remove_key(target: &mut Value, key: &Value) -> Result<Value, ScriptError> {
    match target {
        Value::Hash(table) => {
            let key = HashKey::try_from(key)?;
            if !table.contains_key(&key) {
                return Ok(Value::Null);
            }
            Ok(Rc::make_mut(table).remove(&key).unwrap_or(Value::Null))
        }
        other => Err(ScriptError::mismatch_unary("remove_key", other.tag())),
    }
}

/// Returns `true` if a hash table has an entry for `key`.
pub fn contains_key(target: &Value, key: &Value) -> Result<bool, ScriptError> {
    match target {
        Value::Hash(table) => Ok(table.contains_key(&HashKey::try_from(key)?)),
        other => Err(ScriptError::mismatch_unary("contains_key", other.tag())),
    }
}

/// The `count` property: elements, entries, bytes or fields.
pub fn count(target: &Value) -> Result<usize, ScriptError> {
    match target {
        Value::Array(items) => Ok(items.len()),
        Value::Hash(table) => Ok(table.len()),
        Value::Str(s) => Ok(s.len()),
        Value::Native(NativeData::Slice(slice)) => slice.len(),
        Value::Native(NativeData::Record(record)) => Ok(record.borrow().len()),
        Value::Native(NativeData::Value(weak)) => {
            let cell = weak.upgrade().ok_or(ScriptError::DanglingNative)?;
            let inner = cell.borrow().clone();
            count(&inner)
        }
        other => Err(ScriptError::mismatch_unary("count", other.tag())),
    }
}

// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sequence primitives over array values.
//!
//! Every operation takes the sequence as `&mut Value` and mutates it in place. Arrays are
//! copy-on-write: a mutation first makes the backing storage exclusive, so other holders of the
//! same array keep observing the old contents.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::error::ScriptError;
use crate::value::Value;

fn items_mut<'a>(seq: &'a mut Value, op: &'static str) -> Result<&'a mut Vec<Value>, ScriptError> {
    match seq {
        Value::Array(items) => Ok(Rc::make_mut(items)),
        other => Err(ScriptError::mismatch_unary(op, other.tag())),
    }
}

fn out_of_range(index: usize, len: usize) -> ScriptError {
    ScriptError::IndexOutOfRange {
        index: i64::try_from(index).unwrap_or(i64::MAX),
        len,
    }
}

/// Appends `v`.
pub fn push(seq: &mut Value, v: Value) -> Result<usize, ScriptError> {
    let items = items_mut(seq, "push")?;
    items.push(v);
    Ok(items.len())
}

/// Removes and returns the first element; later elements shift down by one.
pub fn pop(seq: &mut Value) -> Result<Value, ScriptError> {
    let items = items_mut(seq, "pop")?;
    if items.is_empty() {
        return Err(ScriptError::EmptyContainer);
    }
    Ok(items.remove(0))
}

/// Removes and returns the last element.
pub fn pop_back(seq: &mut Value) -> Result<Value, ScriptError> {
    items_mut(seq, "pop_back")?
        .pop()
        .ok_or(ScriptError::EmptyContainer)
}

/// Inserts `v` at `index`, or at the end when `index` is `None`.
///
/// Fails with [`ScriptError::IndexOutOfRange`] if `index` is greater than the count.
pub fn insert(seq: &mut Value, v: Value, index: Option<usize>) -> Result<usize, ScriptError> {
    let items = items_mut(seq, "insert")?;
    let at = index.unwrap_or(items.len());
    if at > items.len() {
        return Err(out_of_range(at, items.len()));
    }
    items.insert(at, v);
    Ok(items.len())
}

/// Removes `count` contiguous elements starting at `index` (one when `count` is `None`).
///
/// The removal length is clamped to the elements available. An out-of-range `index` is an
/// error and leaves the sequence untouched. Returns the new count.
pub fn remove(seq: &mut Value, index: usize, count: Option<usize>) -> Result<usize, ScriptError> {
    let len = match &*seq {
        Value::Array(items) => items.len(),
        other => return Err(ScriptError::mismatch_unary("remove", other.tag())),
    };
    if index >= len {
        return Err(out_of_range(index, len));
    }
    let items = items_mut(seq, "remove")?;
    let end = index.saturating_add(count.unwrap_or(1)).min(len);
    items.drain(index..end);
    Ok(items.len())
}

/// Drops elements beyond `new_count`; a no-op when `new_count >= count`.
pub fn truncate(seq: &mut Value, new_count: usize) -> Result<usize, ScriptError> {
    match &*seq {
        Value::Array(items) if new_count >= items.len() => return Ok(items.len()),
        Value::Array(_) => {}
        other => return Err(ScriptError::mismatch_unary("truncate", other.tag())),
    }
    let items = items_mut(seq, "truncate")?;
    items.truncate(new_count);
    Ok(items.len())
}

/// Resets `seq` to an empty array, whatever it held before.
pub fn clear(seq: &mut Value) {
    *seq = Value::array(Vec::new());
}

/// Returns the last element without removing it.
pub fn peek(seq: &Value) -> Result<Value, ScriptError> {
    match seq {
        Value::Array(items) => items.last().cloned().ok_or(ScriptError::EmptyContainer),
        other => Err(ScriptError::mismatch_unary("peek", other.tag())),
    }
}

// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native interop boundary.
//!
//! Two directions cross this boundary:
//!
//! - **Host functions.** [`Natives`] maps names to [`NativeFunction`]s. Script code calls them
//!   with a variable argument list and a caller-allocated return slot (see [`NativeCall`]).
//! - **Host data.** Host memory is exposed to scripts without copying. The host owns the
//!   storage ([`HostBuffer`], [`HostValue`]); scripts only ever see non-owning views
//!   ([`NativeSlice`], [`NativeData::Value`]). Reads and writes go straight through to host
//!   memory, so changes are visible on both sides immediately.
//!
//! ## Lifetime contract
//!
//! The runtime never frees or relocates host storage. Views are `Weak`, so once the host drops
//! its storage every access through a surviving view fails with
//! [`ScriptError::DanglingNative`].
//!
//! ## User data
//!
//! [`UserData`] is an extensible record the host creates, attaches named fields to, and hands to
//! scripts as a [`Value`]. A field is a bridged value, an alias to a [`HostBuffer`], or an alias
//! to a [`HostValue`]. Records are shared, not copy-on-write: every holder sees every mutation.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use hashbrown::HashMap;

use crate::coerce::IntWidth;
use crate::error::ScriptError;
use crate::value::Value;

mod sealed {
    #[allow(unnameable_types, reason = "sealed trait")]
    pub trait Sealed {}
}

/// Integer element types that host buffers may hold.
pub trait NativeElement: Copy + Default + sealed::Sealed + 'static {
    /// Widens to the script integer representation.
    fn widen(self) -> i64;
    /// Narrows a script integer, wrapping to the element width.
    fn narrow(v: i64) -> Self;
    /// Wraps a weak view of host cells in the matching [`NativeSlice`] variant.
    fn view(cells: Weak<[Cell<Self>]>) -> NativeSlice;
}

macro_rules! native_elements {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl NativeElement for $t {
                #[inline]
                fn widen(self) -> i64 {
                    i64::from(self)
                }

                #[inline]
                #[allow(
                    trivial_numeric_casts,
                    clippy::cast_possible_truncation,
                    reason = "script writes wrap to the element width"
                )]
                fn narrow(v: i64) -> Self {
                    v as $t
                }

                fn view(cells: Weak<[Cell<Self>]>) -> NativeSlice {
                    NativeSlice::$variant(cells)
                }
            }
        )*

        /// A non-owning view of a host-owned integer array.
        #[derive(Clone, Debug)]
        pub enum NativeSlice {
            $(
                #[doc = concat!("View over `", stringify!($t), "` elements.")]
                $variant(Weak<[Cell<$t>]>),
            )*
        }

        impl NativeSlice {
            /// Number of elements, or [`ScriptError::DanglingNative`] if the storage is gone.
            pub fn len(&self) -> Result<usize, ScriptError> {
                let len = match self {
                    $(Self::$variant(w) => w.upgrade().map(|c| c.len()),)*
                };
                len.ok_or(ScriptError::DanglingNative)
            }

            /// Returns `true` if the view has no elements.
            pub fn is_empty(&self) -> Result<bool, ScriptError> {
                self.len().map(|len| len == 0)
            }

            /// Reads element `index`.
            pub fn get(&self, index: i64) -> Result<Value, ScriptError> {
                match self {
                    $(Self::$variant(w) => {
                        let cells = w.upgrade().ok_or(ScriptError::DanglingNative)?;
                        let cell = slot(&cells, index)?;
                        Ok(Value::Int(cell.get().widen()))
                    })*
                }
            }

            /// Writes element `index`; the value must be an integer.
            pub fn set(&self, index: i64, value: &Value) -> Result<(), ScriptError> {
                let Value::Int(v) = value else {
                    return Err(ScriptError::mismatch(
                        "[]=",
                        crate::value::Tag::Native,
                        value.tag(),
                    ));
                };
                match self {
                    $(Self::$variant(w) => {
                        let cells = w.upgrade().ok_or(ScriptError::DanglingNative)?;
                        slot(&cells, index)?.set(<$t>::narrow(*v));
                    })*
                }
                Ok(())
            }

            /// Element type name.
            #[must_use]
            pub fn element_name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => stringify!($t),)*
                }
            }

            fn same_target(&self, other: &Self) -> bool {
                match (self, other) {
                    $((Self::$variant(a), Self::$variant(b)) => Weak::ptr_eq(a, b),)*
                    _ => false,
                }
            }
        }
    };
}

native_elements! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
}

fn slot<T>(cells: &[Cell<T>], index: i64) -> Result<&Cell<T>, ScriptError> {
    usize::try_from(index)
        .ok()
        .and_then(|i| cells.get(i))
        .ok_or(ScriptError::IndexOutOfRange {
            index,
            len: cells.len(),
        })
}

/// Host-owned, fixed-size integer storage that scripts can alias.
///
/// Cloning a `HostBuffer` shares the storage; it stays alive while any host clone exists.
#[derive(Clone, Debug)]
pub struct HostBuffer<T: NativeElement> {
    cells: Rc<[Cell<T>]>,
}

impl<T: NativeElement> HostBuffer<T> {
    /// Takes ownership of `values` as the buffer contents.
    #[must_use]
    pub fn new(values: Vec<T>) -> Self {
        Self {
            cells: values.into_iter().map(Cell::new).collect(),
        }
    }

    /// Creates a buffer of `len` default (zero) elements.
    #[must_use]
    pub fn zeroed(len: usize) -> Self {
        Self::new(alloc::vec![T::default(); len])
    }

    /// Element count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the buffer has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reads element `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.cells.get(index).map(Cell::get)
    }

    /// Writes element `index`. Returns `false` if out of bounds.
    pub fn set(&self, index: usize, value: T) -> bool {
        match self.cells.get(index) {
            Some(cell) => {
                cell.set(value);
                true
            }
            None => false,
        }
    }

    /// Copies the current contents out.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.cells.iter().map(Cell::get).collect()
    }

    /// Returns a non-owning view for scripts.
    #[must_use]
    pub fn view(&self) -> NativeSlice {
        T::view(Rc::downgrade(&self.cells))
    }

    /// Returns a script value aliasing this buffer.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Native(NativeData::Slice(self.view()))
    }
}

/// A single host-managed value that scripts can alias.
#[derive(Clone, Debug, Default)]
pub struct HostValue {
    cell: Rc<RefCell<Value>>,
}

impl HostValue {
    /// Wraps `value`.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self {
            cell: Rc::new(RefCell::new(value)),
        }
    }

    /// Returns a copy of the current value.
    #[must_use]
    pub fn get(&self) -> Value {
        self.cell.borrow().clone()
    }

    /// Replaces the current value.
    pub fn set(&self, value: Value) {
        *self.cell.borrow_mut() = value;
    }

    /// Returns a script value aliasing this slot.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Native(NativeData::Value(Rc::downgrade(&self.cell)))
    }
}

/// One field of a user-data record.
#[derive(Clone, Debug)]
pub enum RecordField {
    /// A bridged script value (shared/copy-on-write like any other value).
    Value(Value),
    /// An alias to host integer storage.
    Slice(NativeSlice),
    /// An alias to a host-managed value.
    HostValue(Weak<RefCell<Value>>),
}

/// Field storage behind a user-data value.
#[derive(Clone, Debug, Default)]
pub struct Record {
    fields: HashMap<Box<str>, RecordField>,
}

impl Record {
    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reads field `name` as a script value.
    ///
    /// Alias fields yield a native handle onto the same storage, so element writes through the
    /// returned value reach the host. Missing fields read as [`Value::Null`].
    pub fn get(&self, name: &str) -> Result<Value, ScriptError> {
        match self.fields.get(name) {
            None => Ok(Value::Null),
            Some(RecordField::Value(v)) => Ok(v.clone()),
            Some(RecordField::Slice(s)) => Ok(Value::Native(NativeData::Slice(s.clone()))),
            Some(RecordField::HostValue(w)) => w
                .upgrade()
                .map(|cell| cell.borrow().clone())
                .ok_or(ScriptError::DanglingNative),
        }
    }

    /// Writes field `name` from script code.
    ///
    /// Writing a host-value alias writes through to the host slot. Writing any other field
    /// (including an array alias) rebinds it to the bridged value; host storage is left alone.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), ScriptError> {
        if let Some(RecordField::HostValue(w)) = self.fields.get(name) {
            let cell = w.upgrade().ok_or(ScriptError::DanglingNative)?;
            *cell.borrow_mut() = value;
            return Ok(());
        }
        self.fields.insert(name.into(), RecordField::Value(value));
        Ok(())
    }

    /// Attaches or replaces a field.
    pub fn attach(&mut self, name: &str, field: RecordField) {
        self.fields.insert(name.into(), field);
    }

    /// Returns the raw field, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&RecordField> {
        self.fields.get(name)
    }
}

/// Host handle used to build a user-data value.
#[derive(Clone, Debug, Default)]
pub struct UserData {
    record: Rc<RefCell<Record>>,
}

impl UserData {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a bridged value under `name`.
    pub fn add_value(&self, name: &str, value: Value) -> &Self {
        self.record
            .borrow_mut()
            .attach(name, RecordField::Value(value));
        self
    }

    /// Attaches a zero-copy alias to `buffer` under `name`.
    pub fn add_array<T: NativeElement>(&self, name: &str, buffer: &HostBuffer<T>) -> &Self {
        self.record
            .borrow_mut()
            .attach(name, RecordField::Slice(buffer.view()));
        self
    }

    /// Attaches an alias to a host-managed value under `name`.
    pub fn add_host_value(&self, name: &str, value: &HostValue) -> &Self {
        self.record
            .borrow_mut()
            .attach(name, RecordField::HostValue(Rc::downgrade(&value.cell)));
        self
    }

    /// Reads a field as the script would.
    pub fn get(&self, name: &str) -> Result<Value, ScriptError> {
        self.record.borrow().get(name)
    }

    /// Returns the script value for this record.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Native(NativeData::Record(Rc::clone(&self.record)))
    }
}

/// The payload of [`Value::Native`].
#[derive(Clone, Debug)]
pub enum NativeData {
    /// Alias to a host integer array.
    Slice(NativeSlice),
    /// Alias to a host-managed value.
    Value(Weak<RefCell<Value>>),
    /// User-data record.
    Record(Rc<RefCell<Record>>),
}

impl NativeData {
    /// Short kind name used in diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Slice(s) => s.element_name(),
            Self::Value(_) => "value",
            Self::Record(_) => "record",
        }
    }

    /// Returns `true` if both handles alias the same storage.
    #[must_use]
    pub fn same_target(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Slice(a), Self::Slice(b)) => a.same_target(b),
            (Self::Value(a), Self::Value(b)) => Weak::ptr_eq(a, b),
            (Self::Record(a), Self::Record(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Arguments, return slot and engine state handed to a native function.
#[derive(Debug)]
pub struct NativeCall<'a> {
    /// Arguments, first argument first.
    pub args: &'a [Value],
    /// Return slot; `Null` on entry.
    pub ret: &'a mut Value,
    /// The calling context's global slots.
    pub globals: &'a mut [Value],
    /// The calling context's working integer width.
    pub width: IntWidth,
}

impl NativeCall<'_> {
    /// Number of arguments.
    #[must_use]
    #[inline]
    pub fn argc(&self) -> usize {
        self.args.len()
    }

    /// Argument `index`, or `Null` if not supplied.
    #[must_use]
    pub fn arg(&self, index: usize) -> &Value {
        self.args.get(index).unwrap_or(&Value::Null)
    }
}

/// A host function callable from scripts.
///
/// Any `FnMut(&mut NativeCall<'_>) -> Result<(), ScriptError>` closure qualifies; captured state
/// plays the role of a user pointer.
pub trait NativeFunction {
    /// Runs the function, writing its result into `call.ret`.
    fn call(&mut self, call: &mut NativeCall<'_>) -> Result<(), ScriptError>;
}

impl<F> NativeFunction for F
where
    F: FnMut(&mut NativeCall<'_>) -> Result<(), ScriptError>,
{
    fn call(&mut self, call: &mut NativeCall<'_>) -> Result<(), ScriptError> {
        self(call)
    }
}

/// Registry of native functions, keyed by name.
#[derive(Default)]
pub struct Natives {
    fns: HashMap<Box<str>, Box<dyn NativeFunction>>,
}

impl Natives {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `f` under `name`, replacing any previous binding.
    ///
    /// Returns `true` if a previous binding was replaced.
    pub fn register<F>(&mut self, name: &str, f: F) -> bool
    where
        F: NativeFunction + 'static,
    {
        let replaced = self.fns.insert(name.into(), Box::new(f)).is_some();
        tracing::debug!(name, replaced, "native function registered");
        replaced
    }

    /// Removes the binding for `name`.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.fns.remove(name).is_some()
    }

    /// Returns `true` if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fns.contains_key(name)
    }

    /// Number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fns.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fns.is_empty()
    }

    /// Calls `name` with `args`, returning whatever the function left in the return slot.
    pub fn call(
        &mut self,
        name: &str,
        args: &[Value],
        globals: &mut [Value],
        width: IntWidth,
    ) -> Result<Value, ScriptError> {
        let f = self
            .fns
            .get_mut(name)
            .ok_or_else(|| ScriptError::UnknownNative(name.into()))?;
        tracing::trace!(name, argc = args.len(), "native call");
        let mut ret = Value::Null;
        let mut call = NativeCall {
            args,
            ret: &mut ret,
            globals,
            width,
        };
        f.call(&mut call)?;
        Ok(ret)
    }
}

impl fmt::Debug for Natives {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Natives")
            .field("len", &self.fns.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn slice_writes_reach_host_memory() {
        let host = HostBuffer::new(vec![1_i32, 2, 3]);
        let view = host.view();
        view.set(1, &Value::Int(20)).unwrap();
        assert_eq!(host.to_vec(), [1, 20, 3]);

        host.set(2, 30);
        assert_eq!(view.get(2), Ok(Value::Int(30)));
        assert_eq!(view.len(), Ok(3));
    }

    #[test]
    fn slice_writes_wrap_to_element_width() {
        let host = HostBuffer::<u8>::zeroed(1);
        host.view().set(0, &Value::Int(257)).unwrap();
        assert_eq!(host.get(0), Some(1));
    }

    #[test]
    fn slice_bounds_and_types() {
        let host = HostBuffer::new(vec![0_i16; 2]);
        let view = host.view();
        assert_eq!(
            view.get(2),
            Err(ScriptError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            view.get(-1),
            Err(ScriptError::IndexOutOfRange { index: -1, len: 2 })
        );
        assert!(matches!(
            view.set(0, &Value::from("x")),
            Err(ScriptError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn dropped_host_storage_is_reported_not_read() {
        let host = HostBuffer::new(vec![5_i64]);
        let view = host.view();
        drop(host);
        assert_eq!(view.get(0), Err(ScriptError::DanglingNative));
        assert_eq!(view.len(), Err(ScriptError::DanglingNative));
    }

    #[test]
    fn user_data_fields() {
        let buf = HostBuffer::new(vec![0_i32; 4]);
        let slot = HostValue::new(Value::Int(1));
        let ud = UserData::new();
        ud.add_value("name", Value::from("probe"))
            .add_array("samples", &buf)
            .add_host_value("level", &slot);

        assert_eq!(ud.get("name"), Ok(Value::from("probe")));
        assert_eq!(ud.get("level"), Ok(Value::Int(1)));
        assert!(ud.get("missing").unwrap().is_null());

        let Value::Native(NativeData::Slice(samples)) = ud.get("samples").unwrap() else {
            panic!("expected slice alias");
        };
        samples.set(3, &Value::Int(9)).unwrap();
        assert_eq!(buf.get(3), Some(9));
    }

    #[test]
    fn record_set_writes_through_host_value() {
        let slot = HostValue::new(Value::Null);
        let mut record = Record::default();
        record.attach("x", RecordField::HostValue(Rc::downgrade(&slot.cell)));
        record.set("x", Value::Int(7)).unwrap();
        assert_eq!(slot.get(), Value::Int(7));
    }

    #[test]
    fn natives_receive_args_and_fill_return_slot() {
        let mut calls = 0;
        let mut natives = Natives::new();
        natives.register("sum", move |call: &mut NativeCall<'_>| -> Result<(), ScriptError> {
            calls += 1;
            let mut total = 0;
            for a in call.args {
                total += a.as_int().ok_or_else(|| ScriptError::native("sum wants ints"))?;
            }
            *call.ret = Value::Int(total + calls - 1);
            Ok(())
        });
        let mut globals = vec![];
        let out = natives
            .call(
                "sum",
                &[Value::Int(1), Value::Int(2)],
                &mut globals,
                IntWidth::W64,
            )
            .unwrap();
        assert_eq!(out, Value::Int(3));
        assert_eq!(
            natives.call("nope", &[], &mut globals, IntWidth::W64),
            Err(ScriptError::UnknownNative("nope".into()))
        );
    }

    #[test]
    fn natives_can_touch_globals() {
        let mut natives = Natives::new();
        natives.register("bump", |call: &mut NativeCall<'_>| -> Result<(), ScriptError> {
            call.globals[0] = Value::Int(call.arg(0).as_int().unwrap_or(0) + 1);
            Ok(())
        });
        let mut globals = vec![Value::Null];
        natives
            .call("bump", &[Value::Int(41)], &mut globals, IntWidth::W64)
            .unwrap();
        assert_eq!(globals[0], Value::Int(42));
        assert!(natives.contains("bump"));
        assert!(natives.unregister("bump"));
        assert!(natives.is_empty());
    }
}

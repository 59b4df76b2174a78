// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core runtime of the Strand scripting engine.
//!
//! This crate holds everything an embedding needs around an opcode loop:
//!
//! - [`value`]: the dynamic [`Value`] type, with reference-counted, copy-on-write payloads.
//! - [`coerce`]: operator semantics (arithmetic, concatenation, comparison) and literal parsing
//!   at a configurable integer width.
//! - [`table`], [`array`] and [`access`]: hash tables, sequence primitives and subscripting.
//! - [`dispatch`]: `switch`-style case resolution over 64-bit, float, string and `null` labels.
//! - [`native`]: host functions and zero-copy aliases of host-owned memory.
//! - [`format`], [`context`] and [`disasm`]: compiled images, execution contexts and the unit
//!   table inspector.
//!
//! Execution itself is pluggable through [`context::Executor`].
//!
//! ## Example
//! ```
//! use strand_runtime::context::{CallFrame, Config, Context};
//! use strand_runtime::format::ImageBuilder;
//! use strand_runtime::native::Natives;
//! use strand_runtime::{ScriptError, Value};
//!
//! let mut image = ImageBuilder::new(1);
//! image.unit("main", 1, &[0x00]);
//! let bytes = image.finish();
//!
//! let mut ctx = Context::load(&bytes, &Config::default())?;
//! let mut natives = Natives::new();
//! let mut echo = |frame: CallFrame<'_>| -> Result<Value, ScriptError> {
//!     Ok(frame.args[0].clone())
//! };
//! let out = ctx.call(&mut natives, &mut echo, "main", &[Value::Int(7)])?;
//! assert_eq!(out, Value::Int(7));
//! # Ok::<(), ScriptError>(())
//! ```
//!
//! ## Features
//! - `std`: enables `std` support in `tracing`. The crate is `no_std` + `alloc` otherwise.

#![no_std]

extern crate alloc;

pub mod access;
pub mod array;
pub mod coerce;
pub mod context;
pub mod disasm;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod native;
pub mod table;
pub mod unit;
pub mod value;

pub use coerce::IntWidth;
pub use error::ScriptError;
pub use table::{HashKey, HashTable};
pub use unit::{UnitHash, UnitTarget, unit_hash};
pub use value::{Tag, Value};

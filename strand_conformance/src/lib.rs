// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conformance harness for `strand_runtime`.
//!
//! The runtime leaves opcode execution to the embedder. To exercise the call path end to end,
//! this crate ships [`MiniLoop`], a small stack machine implementing
//! [`Executor`](strand_runtime::context::Executor), and [`Asm`], which emits its code.
//!
//! The tests under `tests/` cover the value model, containers, case dispatch, the loader and
//! inspector, and the native boundary.

mod asm;
mod mini_loop;

pub use asm::{Asm, op};
pub use mini_loop::MiniLoop;

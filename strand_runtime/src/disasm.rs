// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text rendering of a compiled image's unit table.

use alloc::string::String;
use core::fmt::Write as _;

use crate::context::{Config, Context};
use crate::format::read_header;

/// Renders the global count and unit table of `image` without executing anything.
///
/// ```text
/// 2 globals
/// 1 units
/// 0 [af63dc4c8601ec8c] offset[19] arguments[1]
/// ```
///
/// A malformed image yields an `error: ...` line followed by the header's global count (0 if
/// even the header is unreadable) and `0 units`; this never fails.
#[must_use]
pub fn disassemble(image: &[u8], config: &Config) -> String {
    let mut out = String::new();
    match Context::load(image, config) {
        Ok(ctx) => {
            let _ = writeln!(out, "{} globals", ctx.globals().len());
            let _ = writeln!(out, "{} units", ctx.units().len());
            for (i, unit) in ctx.units().iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{i} [{}] offset[{}] arguments[{}]",
                    unit.hash, unit.offset, unit.params
                );
            }
        }
        Err(err) => {
            let globals = read_header(image).map_or(0, |h| h.globals);
            tracing::debug!(error = %err, globals, "disassembling a malformed image");
            let _ = writeln!(out, "error: {err}");
            let _ = writeln!(out, "{globals} globals");
            let _ = writeln!(out, "0 units");
        }
    }
    out
}

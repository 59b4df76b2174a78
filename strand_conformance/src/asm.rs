// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use strand_runtime::coerce::BinOp;
use strand_runtime::format::{write_sleb128_i64, write_uleb128_u64};

/// [`MiniLoop`](crate::MiniLoop) opcodes.
pub mod op {
    /// Return the top of stack (or `Null` when empty).
    pub const RET: u8 = 0x00;
    /// Push `Null`.
    pub const NULL: u8 = 0x01;
    /// Push argument `u8`.
    pub const ARG: u8 = 0x02;
    /// Push an integer literal (sleb128), wrapped to the working width.
    pub const INT: u8 = 0x03;
    /// Push a string literal (uleb128 length, bytes).
    pub const STR: u8 = 0x04;
    /// Push global slot `uleb128`.
    pub const GLOAD: u8 = 0x05;
    /// Pop into global slot `uleb128`.
    pub const GSTORE: u8 = 0x06;
    /// Pop `rhs` then `lhs`, push `lhs op rhs` (`u8` operator index).
    pub const BIN: u8 = 0x07;
    /// Pop two values, push `1` if they are equal and `0` otherwise.
    pub const EQ: u8 = 0x08;
    /// Call a native: `u8` argument count, then the name (uleb128 length, bytes).
    pub const NATIVE: u8 = 0x09;
    /// Discard the top of stack.
    pub const POP: u8 = 0x0A;
    /// Pop `key` then `target`, push `target[key]`.
    pub const INDEX_GET: u8 = 0x0B;
    /// Pop `value`, `key` and `target`, push the updated `target`.
    pub const INDEX_SET: u8 = 0x0C;
    /// Pop `rhs`, then apply `+=` to global slot `uleb128`.
    pub const GADD: u8 = 0x0D;
}

/// Operators addressable by [`op::BIN`], by index.
pub(crate) const BIN_OPS: [BinOp; 10] = [
    BinOp::Add,
    BinOp::Sub,
    BinOp::Mul,
    BinOp::Div,
    BinOp::Rem,
    BinOp::BitAnd,
    BinOp::BitOr,
    BinOp::BitXor,
    BinOp::Shl,
    BinOp::Shr,
];

/// Code emitter for [`MiniLoop`](crate::MiniLoop).
#[derive(Clone, Debug, Default)]
pub struct Asm {
    bytes: Vec<u8>,
}

impl Asm {
    /// Creates an empty code buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn op(&mut self, op: u8) -> &mut Self {
        self.bytes.push(op);
        self
    }

    fn name(&mut self, s: &str) {
        write_uleb128_u64(&mut self.bytes, s.len() as u64);
        self.bytes.extend_from_slice(s.as_bytes());
    }

    /// `ret`
    pub fn ret(&mut self) -> &mut Self {
        self.op(op::RET)
    }

    /// `null`
    pub fn null(&mut self) -> &mut Self {
        self.op(op::NULL)
    }

    /// Push argument `index`.
    pub fn arg(&mut self, index: u8) -> &mut Self {
        self.op(op::ARG).bytes.push(index);
        self
    }

    /// Push an integer.
    pub fn int(&mut self, v: i64) -> &mut Self {
        self.op(op::INT);
        write_sleb128_i64(&mut self.bytes, v);
        self
    }

    /// Push a string.
    pub fn str(&mut self, s: &str) -> &mut Self {
        self.op(op::STR).name(s);
        self
    }

    /// Push global `slot`.
    pub fn gload(&mut self, slot: u32) -> &mut Self {
        self.op(op::GLOAD);
        write_uleb128_u64(&mut self.bytes, u64::from(slot));
        self
    }

    /// Pop into global `slot`.
    pub fn gstore(&mut self, slot: u32) -> &mut Self {
        self.op(op::GSTORE);
        write_uleb128_u64(&mut self.bytes, u64::from(slot));
        self
    }

    /// `+=` the top of stack into global `slot`.
    pub fn gadd(&mut self, slot: u32) -> &mut Self {
        self.op(op::GADD);
        write_uleb128_u64(&mut self.bytes, u64::from(slot));
        self
    }

    /// Binary operator.
    pub fn bin(&mut self, bin: BinOp) -> &mut Self {
        let index = BIN_OPS.iter().position(|b| *b == bin).unwrap_or_default();
        self.op(op::BIN)
            .bytes
            .push(u8::try_from(index).unwrap_or_default());
        self
    }

    /// Equality test.
    pub fn eq(&mut self) -> &mut Self {
        self.op(op::EQ)
    }

    /// Call native `name` with the top `argc` values.
    pub fn native(&mut self, name: &str, argc: u8) -> &mut Self {
        self.op(op::NATIVE).bytes.push(argc);
        self.name(name);
        self
    }

    /// Discard the top of stack.
    pub fn pop(&mut self) -> &mut Self {
        self.op(op::POP)
    }

    /// Subscript read.
    pub fn index_get(&mut self) -> &mut Self {
        self.op(op::INDEX_GET)
    }

    /// Subscript write.
    pub fn index_set(&mut self) -> &mut Self {
        self.op(op::INDEX_SET)
    }

    /// The emitted code.
    #[must_use]
    pub fn finish(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coercion and comparison engine.
//!
//! Every binary operator inspects both operand tags first:
//!
//! - Int op Int stays Int and wraps at the working [`IntWidth`]; no overflow trap.
//! - Int op Float promotes to Float.
//! - `+` with a string on either side renders the other scalar operand (`null` included) in its
//!   canonical text form and concatenates, left to right.
//! - Containers, native handles and unit references never take part in arithmetic.
//!
//! Equality is by value and tag-aware: `null` equals only `null`, and `0` never equals `null`.

use alloc::rc::Rc;
use alloc::string::String;
use core::cmp::Ordering;
use core::fmt::Write as _;

use crate::error::ScriptError;
use crate::value::{Tag, Value};

/// Working integer width.
///
/// Values are stored as `i64`; at [`IntWidth::W32`] every integer result (and every integer
/// literal) is reinterpreted through the low 32 bits of its two's-complement pattern, so
/// `0xFFFFFFFF`, `4294967295` and `-1` are the same value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntWidth {
    /// 32-bit wraparound.
    W32,
    /// 64-bit wraparound.
    #[default]
    W64,
}

impl IntWidth {
    /// Number of bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::W32 => 32,
            Self::W64 => 64,
        }
    }

    /// Wraps `v` to this width, sign-extending back to `i64`.
    #[must_use]
    #[inline]
    #[allow(clippy::cast_possible_truncation, reason = "truncation is the wraparound")]
    pub const fn wrap(self, v: i64) -> i64 {
        match self {
            Self::W32 => v as i32 as i64,
            Self::W64 => v,
        }
    }

    /// Reinterprets the low bits of a two's-complement pattern at this width.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, reason = "truncation is the wraparound")]
    pub const fn wrap_bits(self, bits: u128) -> i64 {
        match self {
            Self::W32 => bits as u32 as i32 as i64,
            Self::W64 => bits as u64 as i64,
        }
    }
}

/// A binary operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
}

impl BinOp {
    /// Source-level symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
        }
    }

    const fn is_bitwise(self) -> bool {
        matches!(
            self,
            Self::BitAnd | Self::BitOr | Self::BitXor | Self::Shl | Self::Shr
        )
    }
}

/// Evaluates `lhs op rhs`.
pub fn binary(op: BinOp, lhs: &Value, rhs: &Value, width: IntWidth) -> Result<Value, ScriptError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => int_op(op, *a, *b, width).map(Value::Int),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            if op.is_bitwise() {
                return Err(ScriptError::mismatch(op.symbol(), lhs.tag(), rhs.tag()));
            }
            match (lhs.as_float(), rhs.as_float()) {
                (Some(a), Some(b)) => Ok(Value::Float(float_op(op, a, b))),
                _ => Err(ScriptError::mismatch(op.symbol(), lhs.tag(), rhs.tag())),
            }
        }
        (Value::Str(_), _) | (_, Value::Str(_)) if op == BinOp::Add => concat(lhs, rhs),
        _ => Err(ScriptError::mismatch(op.symbol(), lhs.tag(), rhs.tag())),
    }
}

/// Applies `lhs op= rhs`, updating `lhs` in place, and returns the new value.
///
/// Only numeric and string left operands are assignable; anything else is a
/// [`ScriptError::TypeMismatch`] and leaves `lhs` untouched.
pub fn compound_assign(
    op: BinOp,
    lhs: &mut Value,
    rhs: &Value,
    width: IntWidth,
) -> Result<Value, ScriptError> {
    if op == BinOp::Add
        && let Value::Str(s) = lhs
        && is_concat_operand(rhs.tag())
    {
        let buf = Rc::make_mut(s);
        let _ = write!(buf, "{rhs}");
        return Ok(lhs.clone());
    }
    if !matches!(lhs.tag(), Tag::Int | Tag::Float | Tag::Str) {
        let sym = match op {
            BinOp::Add => "+=",
            BinOp::Sub => "-=",
            BinOp::Mul => "*=",
            BinOp::Div => "/=",
            BinOp::Rem => "%=",
            BinOp::BitAnd => "&=",
            BinOp::BitOr => "|=",
            BinOp::BitXor => "^=",
            BinOp::Shl => "<<=",
            BinOp::Shr => ">>=",
        };
        return Err(ScriptError::mismatch(sym, lhs.tag(), rhs.tag()));
    }
    let next = binary(op, lhs, rhs, width)?;
    *lhs = next.clone();
    Ok(next)
}

/// `lhs += rhs`.
pub fn add_assign(lhs: &mut Value, rhs: &Value, width: IntWidth) -> Result<Value, ScriptError> {
    compound_assign(BinOp::Add, lhs, rhs, width)
}

/// Script-level `==`.
///
/// Arrays, hash tables and native handles are not comparable as scalars and report
/// [`ScriptError::TypeMismatch`].
pub fn equals(lhs: &Value, rhs: &Value) -> Result<bool, ScriptError> {
    match (lhs, rhs) {
        (Value::Array(_) | Value::Hash(_) | Value::Native(_), _)
        | (_, Value::Array(_) | Value::Hash(_) | Value::Native(_)) => {
            Err(ScriptError::mismatch("==", lhs.tag(), rhs.tag()))
        }
        _ => Ok(scalar_eq(lhs, rhs)),
    }
}

/// Script-level `!=`.
pub fn not_equals(lhs: &Value, rhs: &Value) -> Result<bool, ScriptError> {
    equals(lhs, rhs).map(|eq| !eq)
}

/// Scalar equality with numeric promotion; never fails.
///
/// Non-scalar operands compare unequal. Used by case dispatch, whose labels are always scalars.
pub(crate) fn scalar_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Null, Value::Null) => true,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => {
            int_float_cmp(*i, *f) == Some(Ordering::Equal)
        }
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Unit(a), Value::Unit(b)) => a == b,
        _ => false,
    }
}

/// Exact ordering of an integer against a float, or `None` when `f` is NaN.
///
/// The integer is never rounded through `f64`, so integers above 2^53 stay distinct from their
/// nearest float.
pub(crate) fn int_float_cmp(i: i64, f: f64) -> Option<Ordering> {
    // 2^63; every finite float below it and at or above -2^63 truncates into `i64` exactly.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        return None;
    }
    if f >= BOUND {
        return Some(Ordering::Less);
    }
    if f < -BOUND {
        return Some(Ordering::Greater);
    }
    let whole = f.trunc();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "`whole` is integral and inside the i64 range"
    )]
    let whole_int = whole as i64;
    Some(i.cmp(&whole_int).then_with(|| {
        // Same integer part: the fractional part decides.
        if f > whole {
            Ordering::Less
        } else if f < whole {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }))
}

/// Orders two values for `< <= > >=`.
///
/// Numbers compare numerically (mixed Int and Float compare exactly, without rounding the
/// integer) and strings compare by bytes.
/// Returns `Ok(None)` when a NaN is involved.
pub fn compare(lhs: &Value, rhs: &Value) -> Result<Option<Ordering>, ScriptError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(Some(a.cmp(b))),
        (Value::Float(a), Value::Float(b)) => Ok(a.partial_cmp(b)),
        (Value::Int(i), Value::Float(f)) => Ok(int_float_cmp(*i, *f)),
        (Value::Float(f), Value::Int(i)) => Ok(int_float_cmp(*i, *f).map(Ordering::reverse)),
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.as_bytes().cmp(b.as_bytes()))),
        _ => Err(ScriptError::mismatch("<", lhs.tag(), rhs.tag())),
    }
}

/// Unary `-`.
pub fn negate(v: &Value, width: IntWidth) -> Result<Value, ScriptError> {
    match v {
        Value::Int(a) => Ok(Value::Int(width.wrap(a.wrapping_neg()))),
        Value::Float(a) => Ok(Value::Float(-a)),
        other => Err(ScriptError::mismatch_unary("-", other.tag())),
    }
}

/// Unary `~`.
pub fn bit_not(v: &Value, width: IntWidth) -> Result<Value, ScriptError> {
    match v {
        Value::Int(a) => Ok(Value::Int(width.wrap(!a))),
        other => Err(ScriptError::mismatch_unary("~", other.tag())),
    }
}

/// Unary `!`, by truthiness.
#[must_use]
pub fn logical_not(v: &Value) -> Value {
    Value::Int(i64::from(!v.is_truthy()))
}

/// `v++`: increments in place, returning the new value.
pub fn increment(v: &mut Value, width: IntWidth) -> Result<Value, ScriptError> {
    step(v, 1, "++", width)
}

/// `v--`: decrements in place, returning the new value.
pub fn decrement(v: &mut Value, width: IntWidth) -> Result<Value, ScriptError> {
    step(v, -1, "--", width)
}

fn step(
    v: &mut Value,
    delta: i64,
    op: &'static str,
    width: IntWidth,
) -> Result<Value, ScriptError> {
    match v {
        Value::Int(a) => *a = width.wrap(a.wrapping_add(delta)),
        Value::Float(a) => *a += delta as f64,
        other => return Err(ScriptError::mismatch_unary(op, other.tag())),
    }
    Ok(v.clone())
}

/// Parses an integer literal and reinterprets it at `width`.
///
/// Accepts decimal, `0x`/`0X` hexadecimal and `0b`/`0B` binary digits with an optional leading
/// `-`. Magnitudes that do not fit the signed range are not errors: the literal's
/// two's-complement bit pattern is truncated to `width`, so the result does not depend on the
/// base the literal was written in. Magnitudes beyond 64 bits are rejected.
pub fn parse_int_literal(text: &str, width: IntWidth) -> Result<i64, ScriptError> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let hex = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X"));
    let (radix, digits) = if let Some(d) = hex {
        (16, d)
    } else if let Some(d) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        (2, d)
    } else {
        (10, body)
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ScriptError::InvalidLiteral);
    }
    let magnitude =
        u128::from_str_radix(digits, radix).map_err(|_| ScriptError::InvalidLiteral)?;
    if magnitude > u128::from(u64::MAX) {
        return Err(ScriptError::InvalidLiteral);
    }
    let bits = if negative {
        magnitude.wrapping_neg()
    } else {
        magnitude
    };
    Ok(width.wrap_bits(bits))
}

/// Parses an integer or float literal.
///
/// Text containing `.`, `e` or `E` (outside a hex literal) is a float; everything else goes
/// through [`parse_int_literal`].
pub fn parse_number_literal(text: &str, width: IntWidth) -> Result<Value, ScriptError> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let is_hex = unsigned.starts_with("0x") || unsigned.starts_with("0X");
    if !is_hex && text.bytes().any(|b| matches!(b, b'.' | b'e' | b'E')) {
        return text
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ScriptError::InvalidLiteral);
    }
    parse_int_literal(text, width).map(Value::Int)
}

fn is_concat_operand(tag: Tag) -> bool {
    matches!(tag, Tag::Null | Tag::Int | Tag::Float | Tag::Str)
}

fn concat(lhs: &Value, rhs: &Value) -> Result<Value, ScriptError> {
    if !is_concat_operand(lhs.tag()) || !is_concat_operand(rhs.tag()) {
        return Err(ScriptError::mismatch("+", lhs.tag(), rhs.tag()));
    }
    let mut out = String::new();
    let _ = write!(out, "{lhs}{rhs}");
    Ok(Value::str(out))
}

fn int_op(op: BinOp, a: i64, b: i64, width: IntWidth) -> Result<i64, ScriptError> {
    let shift = |b: i64| {
        #[allow(clippy::cast_possible_truncation, reason = "masked to the width below")]
        let s = b as u32;
        s & (width.bits() - 1)
    };
    let raw = match op {
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::Div => {
            if b == 0 {
                return Err(ScriptError::DivisionByZero);
            }
            a.wrapping_div(b)
        }
        BinOp::Rem => {
            if b == 0 {
                return Err(ScriptError::DivisionByZero);
            }
            a.wrapping_rem(b)
        }
        BinOp::BitAnd => a & b,
        BinOp::BitOr => a | b,
        BinOp::BitXor => a ^ b,
        BinOp::Shl => a.wrapping_shl(shift(b)),
        BinOp::Shr => a.wrapping_shr(shift(b)),
    };
    Ok(width.wrap(raw))
}

fn float_op(op: BinOp, a: f64, b: f64) -> f64 {
    match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        BinOp::Rem => a % b,
        // Bitwise operators are rejected before promotion.
        BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor | BinOp::Shl | BinOp::Shr => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn add(a: &Value, b: &Value) -> Value {
        binary(BinOp::Add, a, b, IntWidth::W64).unwrap()
    }

    #[test]
    fn int_arithmetic_wraps_at_width() {
        let max = Value::Int(i64::MAX);
        assert_eq!(add(&max, &Value::Int(1)), Value::Int(i64::MIN));

        let r = binary(BinOp::Add, &Value::Int(0x7fff_ffff), &Value::Int(1), IntWidth::W32);
        assert_eq!(r, Ok(Value::Int(-0x8000_0000)));
    }

    #[test]
    fn mixed_numeric_promotes_to_float() {
        assert_eq!(add(&Value::Int(1), &Value::Float(0.5)), Value::Float(1.5));
        assert_eq!(
            binary(BinOp::Div, &Value::Int(7), &Value::Int(2), IntWidth::W64),
            Ok(Value::Int(3))
        );
        assert_eq!(
            binary(BinOp::Div, &Value::Int(7), &Value::Float(2.0), IntWidth::W64),
            Ok(Value::Float(3.5))
        );
    }

    #[test]
    fn concatenation_is_left_to_right() {
        let mut acc = Value::Int(123);
        for rhs in [Value::from("string"), Value::Int(34), Value::from("hi")] {
            acc = add(&acc, &rhs);
        }
        assert_eq!(acc, Value::from("123string34hi"));
    }

    #[test]
    fn null_concatenates_as_text_but_containers_do_not() {
        assert_eq!(add(&Value::from("a"), &Value::Null), Value::from("anull"));
        assert_eq!(add(&Value::Null, &Value::from("b")), Value::from("nullb"));
        let mut s = Value::from("x=");
        assert_eq!(
            add_assign(&mut s, &Value::Null, IntWidth::W64),
            Ok(Value::from("x=null"))
        );
        assert!(binary(BinOp::Add, &Value::from("a"), &Value::hash(), IntWidth::W64).is_err());
        assert!(binary(BinOp::Add, &Value::Null, &Value::Int(1), IntWidth::W64).is_err());
    }

    #[test]
    fn number_plus_number_before_string_adds_first() {
        let sum = add(&Value::Int(1), &Value::Int(2));
        assert_eq!(add(&sum, &Value::from("x")), Value::from("3x"));
    }

    #[test]
    fn add_assign_appends_in_place() {
        let mut h2 = Value::from("Hello ");
        let shared = h2.clone();
        let out = add_assign(&mut h2, &Value::from("World"), IntWidth::W64).unwrap();
        assert_eq!(out, Value::from("Hello World"));
        assert_eq!(h2, Value::from("Hello World"));
        assert_eq!(shared, Value::from("Hello "));
    }

    #[test]
    fn add_assign_number_with_string_becomes_string() {
        let mut n = Value::Int(5);
        add_assign(&mut n, &Value::from("!"), IntWidth::W64).unwrap();
        assert_eq!(n, Value::from("5!"));
    }

    #[test]
    fn containers_reject_arithmetic() {
        let arr = Value::array(vec![]);
        assert!(matches!(
            binary(BinOp::Add, &arr, &Value::Int(1), IntWidth::W64),
            Err(ScriptError::TypeMismatch { op: "+", .. })
        ));
        assert!(matches!(
            binary(BinOp::Add, &Value::from("a"), &Value::hash(), IntWidth::W64),
            Err(ScriptError::TypeMismatch { .. })
        ));
        let mut h = Value::hash();
        assert!(add_assign(&mut h, &Value::Int(1), IntWidth::W64).is_err());
        assert!(h.as_hash().is_some());
    }

    #[test]
    fn integer_division_by_zero_fails() {
        assert_eq!(
            binary(BinOp::Rem, &Value::Int(1), &Value::Int(0), IntWidth::W64),
            Err(ScriptError::DivisionByZero)
        );
        let r = binary(BinOp::Div, &Value::Float(1.0), &Value::Int(0), IntWidth::W64).unwrap();
        assert_eq!(r, Value::Float(f64::INFINITY));
    }

    #[test]
    fn bitwise_requires_ints() {
        assert_eq!(
            binary(BinOp::Shl, &Value::Int(1), &Value::Int(4), IntWidth::W64),
            Ok(Value::Int(16))
        );
        assert!(binary(BinOp::BitAnd, &Value::Float(1.0), &Value::Int(1), IntWidth::W64).is_err());
    }

    #[test]
    fn equality_is_tag_aware() {
        assert_eq!(equals(&Value::Null, &Value::Null), Ok(true));
        assert_eq!(equals(&Value::Null, &Value::Int(0)), Ok(false));
        assert_eq!(equals(&Value::Int(0), &Value::Null), Ok(false));
        assert_eq!(equals(&Value::Int(2), &Value::Float(2.0)), Ok(true));
        assert_eq!(equals(&Value::from("2"), &Value::Int(2)), Ok(false));
        assert_eq!(not_equals(&Value::from("a"), &Value::from("b")), Ok(true));
        assert!(equals(&Value::array(vec![]), &Value::array(vec![])).is_err());
    }

    #[test]
    fn literal_forms_share_bit_patterns_at_32_bits() {
        let w = IntWidth::W32;
        let mut a = Value::Int(parse_int_literal("0xFFFFFFFF", w).unwrap());
        let mut b = Value::Int(parse_int_literal("4294967295", w).unwrap());
        assert_eq!(equals(&a, &b), Ok(true));
        increment(&mut a, w).unwrap();
        increment(&mut b, w).unwrap();
        assert_eq!(equals(&a, &b), Ok(true));

        let mut c = Value::Int(parse_int_literal("-2147483648", w).unwrap());
        let mut d = Value::Int(parse_int_literal("0x80000000", w).unwrap());
        assert_eq!(equals(&c, &d), Ok(true));
        increment(&mut c, w).unwrap();
        increment(&mut d, w).unwrap();
        assert_eq!(equals(&c, &d), Ok(true));
        assert_eq!(c, Value::Int(-2_147_483_647));
    }

    #[test]
    fn literal_forms_share_bit_patterns_at_64_bits() {
        let w = IntWidth::W64;
        assert_eq!(parse_int_literal("0xFFFFFFFFFFFFFFFF", w), Ok(-1));
        assert_eq!(parse_int_literal("18446744073709551615", w), Ok(-1));
        assert_eq!(parse_int_literal("5000000000", w), Ok(5_000_000_000));
        assert_eq!(parse_int_literal("0b101", w), Ok(5));
    }

    #[test]
    fn malformed_literals_are_rejected() {
        let w = IntWidth::W64;
        assert_eq!(parse_int_literal("", w), Err(ScriptError::InvalidLiteral));
        assert_eq!(parse_int_literal("0x", w), Err(ScriptError::InvalidLiteral));
        assert_eq!(parse_int_literal("+5", w), Err(ScriptError::InvalidLiteral));
        assert_eq!(parse_int_literal("12a", w), Err(ScriptError::InvalidLiteral));
        assert_eq!(
            parse_int_literal("0x1FFFFFFFFFFFFFFFF", w),
            Err(ScriptError::InvalidLiteral)
        );
    }

    #[test]
    fn number_literals_pick_float_or_int() {
        let w = IntWidth::W64;
        assert_eq!(parse_number_literal("1.25", w), Ok(Value::Float(1.25)));
        assert_eq!(parse_number_literal("1e3", w), Ok(Value::Float(1000.0)));
        assert_eq!(parse_number_literal("0xE", w), Ok(Value::Int(14)));
    }

    #[test]
    fn ordering() {
        assert_eq!(
            compare(&Value::Int(1), &Value::Float(1.5)),
            Ok(Some(Ordering::Less))
        );
        assert_eq!(
            compare(&Value::from("b"), &Value::from("a")),
            Ok(Some(Ordering::Greater))
        );
        assert_eq!(compare(&Value::Float(f64::NAN), &Value::Int(0)), Ok(None));
        assert!(compare(&Value::Null, &Value::Int(0)).is_err());
    }

    #[test]
    fn mixed_numbers_compare_without_rounding() {
        let two_53 = 1_i64 << 53;
        #[allow(clippy::cast_precision_loss, reason = "2^53 is exact in f64")]
        let f = Value::Float(two_53 as f64);
        assert_eq!(equals(&Value::Int(two_53 + 1), &f), Ok(false));
        assert_eq!(equals(&f, &Value::Int(two_53)), Ok(true));
        assert_eq!(
            compare(&Value::Int(two_53 + 1), &f),
            Ok(Some(Ordering::Greater))
        );
        assert_eq!(
            compare(&f, &Value::Int(two_53 + 1)),
            Ok(Some(Ordering::Less))
        );

        // Floats outside the i64 range order past every integer.
        assert_eq!(
            compare(&Value::Int(i64::MAX), &Value::Float(9.3e18)),
            Ok(Some(Ordering::Less))
        );
        assert_eq!(
            compare(&Value::Int(i64::MIN), &Value::Float(f64::NEG_INFINITY)),
            Ok(Some(Ordering::Greater))
        );
        let min = Value::Float(-9_223_372_036_854_775_808.0);
        assert_eq!(equals(&Value::Int(i64::MIN), &min), Ok(true));

        // Fractions break ties on the integer part, on both sides of zero.
        assert_eq!(
            compare(&Value::Int(-2), &Value::Float(-2.5)),
            Ok(Some(Ordering::Greater))
        );
        assert_eq!(
            compare(&Value::Int(2), &Value::Float(2.5)),
            Ok(Some(Ordering::Less))
        );
        assert_eq!(equals(&Value::Int(0), &Value::Float(-0.0)), Ok(true));
    }

    #[test]
    fn unary_ops() {
        let w = IntWidth::W32;
        let min = Value::Int(i64::from(i32::MIN));
        assert_eq!(negate(&min, w), Ok(min.clone()));
        assert_eq!(bit_not(&Value::Int(0), w), Ok(Value::Int(-1)));
        assert_eq!(logical_not(&Value::Null), Value::Int(1));
        let mut f = Value::Float(0.5);
        assert_eq!(decrement(&mut f, w), Ok(Value::Float(-0.5)));
    }
}

// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Case-dispatch resolution for `switch`-style multi-way branches.
//!
//! A [`SwitchBlock`] holds ordered arms, each with a scalar [`CaseLabel`] (or none, for the
//! default arm) and an opaque body. Resolution picks the first arm whose label equals the
//! scrutinee under script equality, falling back to the default arm. Execution then falls
//! through the following arms, in order, until a body returns [`Flow::Break`].
//!
//! Labels may be full 64-bit integers, floats, strings or `null`, so a jump table is only one
//! of three strategies:
//!
//! - [`Strategy::Dense`]: all labels are integers in a short, mostly-filled range.
//! - [`Strategy::Hashed`]: many labels, none of them floats.
//! - [`Strategy::Scan`]: everything else; an ordered equality probe.
//!
//! `null` and `0` are never conflated by any strategy.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

use hashbrown::HashMap;

use crate::coerce::int_float_cmp;
use crate::error::ScriptError;
use crate::value::Value;

/// Largest label span for which a dense table is built.
const DENSE_MAX_SPAN: u64 = 256;

/// Minimum label count before a hashed lookup beats an ordered scan.
const HASH_MIN_LABELS: usize = 8;

/// A scalar case label.
#[derive(Clone, Debug, PartialEq)]
pub enum CaseLabel {
    /// `case null:`
    Null,
    /// Integer label.
    Int(i64),
    /// Float label.
    Float(f64),
    /// String label.
    Str(Rc<String>),
}

impl CaseLabel {
    /// Returns `true` if the label equals `v` under script equality.
    #[must_use]
    pub fn matches(&self, v: &Value) -> bool {
        match (self, v) {
            (Self::Null, Value::Null) => true,
            (Self::Int(l), Value::Int(s)) => l == s,
            (Self::Float(l), Value::Float(s)) => l == s,
            (Self::Int(i), Value::Float(f)) | (Self::Float(f), Value::Int(i)) => {
                int_float_cmp(*i, *f) == Some(Ordering::Equal)
            }
            (Self::Str(l), Value::Str(s)) => l == s,
            _ => false,
        }
    }

    fn key(&self) -> Option<LabelKey> {
        match self {
            Self::Null => Some(LabelKey::Null),
            Self::Int(v) => Some(LabelKey::Int(*v)),
            Self::Str(s) => Some(LabelKey::Str(Rc::clone(s))),
            Self::Float(_) => None,
        }
    }
}

impl TryFrom<&Value> for CaseLabel {
    type Error = ScriptError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Null => Ok(Self::Null),
            Value::Int(i) => Ok(Self::Int(*i)),
            Value::Float(f) => Ok(Self::Float(*f)),
            Value::Str(s) => Ok(Self::Str(Rc::clone(s))),
            other => Err(ScriptError::mismatch_unary("case", other.tag())),
        }
    }
}

impl From<i64> for CaseLabel {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for CaseLabel {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for CaseLabel {
    fn from(s: &str) -> Self {
        Self::Str(Rc::new(s.into()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum LabelKey {
    Null,
    Int(i64),
    Str(Rc<String>),
}

impl LabelKey {
    fn of(v: &Value) -> Option<Self> {
        match v {
            Value::Null => Some(Self::Null),
            Value::Int(i) => Some(Self::Int(*i)),
            Value::Str(s) => Some(Self::Str(Rc::clone(s))),
            _ => None,
        }
    }
}

/// What a case body asks the resolver to do next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Fall through into the next arm's body.
    Continue,
    /// Leave the switch block.
    Break,
}

/// One arm of a switch block.
#[derive(Clone, Debug)]
pub struct Arm<B> {
    /// The case label, or `None` for `default:`.
    pub label: Option<CaseLabel>,
    /// The arm body.
    pub body: B,
}

impl<B> Arm<B> {
    /// A `case label:` arm.
    pub fn case(label: impl Into<CaseLabel>, body: B) -> Self {
        Self {
            label: Some(label.into()),
            body,
        }
    }

    /// A `default:` arm.
    pub fn default(body: B) -> Self {
        Self { label: None, body }
    }
}

/// Resolution strategy chosen for a block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Jump table indexed by `label - base`.
    Dense,
    /// Hash lookup keyed by label value.
    Hashed,
    /// Ordered equality probe.
    Scan,
}

#[derive(Clone, Debug)]
enum Table {
    Dense { base: i64, slots: Vec<Option<usize>> },
    Hashed(HashMap<LabelKey, usize>),
    Scan,
}

/// A compiled switch block.
#[derive(Clone, Debug)]
pub struct SwitchBlock<B> {
    arms: Vec<Arm<B>>,
    default: Option<usize>,
    table: Table,
}

impl<B> SwitchBlock<B> {
    /// Compiles `arms`, choosing a resolution strategy.
    ///
    /// When several arms carry equal labels the first one wins; when several default arms are
    /// given the first one is the default.
    pub fn new(arms: Vec<Arm<B>>) -> Self {
        let default = arms.iter().position(|a| a.label.is_none());
        let table = Self::plan(&arms);
        tracing::trace!(arms = arms.len(), strategy = ?Self::kind_of(&table), "switch compiled");
        Self {
            arms,
            default,
            table,
        }
    }

    fn plan(arms: &[Arm<B>]) -> Table {
        let labels: Vec<(usize, &CaseLabel)> = arms
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.label.as_ref().map(|l| (i, l)))
            .collect();
        if labels.is_empty() {
            return Table::Scan;
        }

        let ints: Option<Vec<(usize, i64)>> = labels
            .iter()
            .map(|(i, l)| match l {
                CaseLabel::Int(v) => Some((*i, *v)),
                _ => None,
            })
            .collect();
        if let Some(ints) = ints
            && let Some(table) = Self::plan_dense(&ints)
        {
            return table;
        }

        if labels.len() >= HASH_MIN_LABELS {
            let mut map = HashMap::with_capacity(labels.len());
            for (i, label) in &labels {
                let Some(key) = label.key() else {
                    return Table::Scan;
                };
                map.entry(key).or_insert(*i);
            }
            return Table::Hashed(map);
        }
        Table::Scan
    }

    fn plan_dense(ints: &[(usize, i64)]) -> Option<Table> {
        let min = ints.iter().map(|(_, v)| *v).min()?;
        let max = ints.iter().map(|(_, v)| *v).max()?;
        let span = u64::try_from(i128::from(max) - i128::from(min)).ok()?;
        let len = usize::try_from(span).ok()?.checked_add(1)?;
        if span >= DENSE_MAX_SPAN || len > ints.len() * 2 {
            return None;
        }
        let mut slots = vec![None; len];
        for (arm, v) in ints {
            let at = usize::try_from(v.wrapping_sub(min)).ok()?;
            if slots[at].is_none() {
                slots[at] = Some(*arm);
            }
        }
        Some(Table::Dense { base: min, slots })
    }

    const fn kind_of(table: &Table) -> Strategy {
        match table {
            Table::Dense { .. } => Strategy::Dense,
            Table::Hashed(_) => Strategy::Hashed,
            Table::Scan => Strategy::Scan,
        }
    }

    /// The strategy chosen for this block.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        Self::kind_of(&self.table)
    }

    /// The arms, in source order.
    #[must_use]
    pub fn arms(&self) -> &[Arm<B>] {
        &self.arms
    }

    /// Returns the index of the arm where execution starts, or `None` if nothing runs.
    #[must_use]
    pub fn resolve(&self, scrutinee: &Value) -> Option<usize> {
        self.find(scrutinee).or(self.default)
    }

    fn find(&self, scrutinee: &Value) -> Option<usize> {
        match (&self.table, scrutinee) {
            (Table::Dense { base, slots }, Value::Int(v)) => {
                let at = usize::try_from(v.checked_sub(*base)?).ok()?;
                slots.get(at).copied().flatten()
            }
            (Table::Hashed(map), Value::Null | Value::Int(_) | Value::Str(_)) => {
                LabelKey::of(scrutinee).and_then(|k| map.get(&k).copied())
            }
            // Floats may equal integer labels, so they always take the ordered probe.
            (Table::Dense { .. } | Table::Hashed(_), Value::Float(_)) | (Table::Scan, _) => self
                .arms
                .iter()
                .position(|a| a.label.as_ref().is_some_and(|l| l.matches(scrutinee))),
            (Table::Dense { .. } | Table::Hashed(_), _) => None,
        }
    }

    /// Runs the block for `scrutinee`.
    ///
    /// Bodies run from the resolved arm onward until one returns [`Flow::Break`] or the arms run
    /// out. Returns the index of the entry arm, if any arm ran.
    pub fn run<E, F>(&self, scrutinee: &Value, mut exec: F) -> Result<Option<usize>, E>
    where
        F: FnMut(&B) -> Result<Flow, E>,
    {
        let Some(start) = self.resolve(scrutinee) else {
            return Ok(None);
        };
        for arm in &self.arms[start..] {
            if exec(&arm.body)? == Flow::Break {
                break;
            }
        }
        Ok(Some(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// Runs `block` and records which bodies executed.
    fn trace<B: Copy>(block: &SwitchBlock<(B, Flow)>, v: &Value) -> Vec<B> {
        let mut seen = Vec::new();
        block
            .run(v, |&(id, flow)| {
                seen.push(id);
                Ok::<_, Infallible>(flow)
            })
            .unwrap();
        seen
    }

    #[test]
    fn fallthrough_until_break() {
        let block = SwitchBlock::new(vec![
            Arm::case(1_i64, ('a', Flow::Continue)),
            Arm::case(2_i64, ('b', Flow::Continue)),
            Arm::case(3_i64, ('c', Flow::Break)),
            Arm::case(4_i64, ('d', Flow::Break)),
        ]);
        assert_eq!(trace(&block, &Value::Int(1)), ['a', 'b', 'c']);
        assert_eq!(trace(&block, &Value::Int(3)), ['c']);
        assert!(trace(&block, &Value::Int(9)).is_empty());
    }

    #[test]
    fn default_in_the_middle_falls_through() {
        let block = SwitchBlock::new(vec![
            Arm::case(1_i64, ('a', Flow::Break)),
            Arm::default(('d', Flow::Continue)),
            Arm::case(2_i64, ('b', Flow::Break)),
        ]);
        assert_eq!(trace(&block, &Value::Int(7)), ['d', 'b']);
        assert_eq!(trace(&block, &Value::Int(2)), ['b']);
    }

    #[test]
    fn empty_block_runs_nothing() {
        let block: SwitchBlock<(u8, Flow)> = SwitchBlock::new(vec![]);
        assert_eq!(block.resolve(&Value::Int(0)), None);
        assert!(trace(&block, &Value::Null).is_empty());
    }

    #[test]
    fn null_and_zero_labels_stay_apart() {
        for filler in [0_usize, 10] {
            let mut arms = vec![
                Arm::case(0_i64, ("zero", Flow::Break)),
                Arm {
                    label: Some(CaseLabel::Null),
                    body: ("null", Flow::Break),
                },
            ];
            for i in 0..filler {
                arms.push(Arm::case(
                    alloc::format!("s{i}").as_str(),
                    ("filler", Flow::Break),
                ));
            }
            let block = SwitchBlock::new(arms);
            assert_eq!(trace(&block, &Value::Null), ["null"]);
            assert_eq!(trace(&block, &Value::Int(0)), ["zero"]);
        }
    }

    #[test]
    fn strategies_are_chosen_by_label_shape() {
        let dense = SwitchBlock::new((0_i64..5).map(|i| Arm::case(i, i)).collect());
        assert_eq!(dense.strategy(), Strategy::Dense);

        let sparse: SwitchBlock<i64> = SwitchBlock::new(
            (0_i64..10)
                .map(|i| Arm::case(5_000_000_000 + i * 1_000, i))
                .collect(),
        );
        assert_eq!(sparse.strategy(), Strategy::Hashed);

        let mixed = SwitchBlock::new(vec![Arm::case(1.5, 0), Arm::case("x", 1)]);
        assert_eq!(mixed.strategy(), Strategy::Scan);

        // Too few sparse labels to be worth hashing.
        let few: SwitchBlock<i64> = SwitchBlock::new(
            (0_i64..4)
                .map(|i| Arm::case(i * 5_000_000_000, i))
                .collect(),
        );
        assert_eq!(few.strategy(), Strategy::Scan);
        assert_eq!(few.resolve(&Value::Int(15_000_000_000)), Some(3));
    }

    #[test]
    fn large_labels_dispatch_without_truncation() {
        let arms = (0_i64..10)
            .map(|i| Arm::case(5_000_000_000 + i, (i, Flow::Break)))
            .chain([Arm::default((-1, Flow::Break))])
            .collect();
        let block = SwitchBlock::new(arms);
        assert_eq!(block.strategy(), Strategy::Dense);
        for i in 0..10 {
            assert_eq!(trace(&block, &Value::Int(5_000_000_000 + i)), [i]);
        }
        // 5_000_000_000 truncated to 32 bits is 705_032_704.
        assert_eq!(trace(&block, &Value::Int(705_032_704)), [-1]);
        assert_eq!(trace(&block, &Value::Int(5_000_000_010)), [-1]);
    }

    #[test]
    fn float_scrutinee_matches_integer_label() {
        let block = SwitchBlock::new(vec![
            Arm::case(1_i64, ('a', Flow::Break)),
            Arm::case(2_i64, ('b', Flow::Break)),
        ]);
        assert_eq!(block.strategy(), Strategy::Dense);
        assert_eq!(trace(&block, &Value::Float(2.0)), ['b']);
        assert!(trace(&block, &Value::Float(2.5)).is_empty());
    }

    #[test]
    fn float_scrutinee_matches_large_labels_exactly() {
        let two_53 = 1_i64 << 53;
        let block = SwitchBlock::new(vec![
            Arm::case(two_53 + 1, ("odd", Flow::Break)),
            Arm::case(two_53, ("even", Flow::Break)),
        ]);
        #[allow(clippy::cast_precision_loss, reason = "2^53 is exact in f64")]
        let scrutinee = Value::Float(two_53 as f64);
        assert_eq!(trace(&block, &scrutinee), ["even"]);
        assert!(!CaseLabel::Float(9.3e18).matches(&Value::Int(i64::MAX)));
    }

    #[test]
    fn duplicate_labels_first_wins() {
        let block = SwitchBlock::new(vec![
            Arm::case("k", ('a', Flow::Break)),
            Arm::case("k", ('b', Flow::Break)),
        ]);
        assert_eq!(trace(&block, &Value::from("k")), ['a']);
    }

    #[test]
    fn labels_from_values() {
        assert_eq!(CaseLabel::try_from(&Value::Int(3)), Ok(CaseLabel::Int(3)));
        assert!(CaseLabel::try_from(&Value::hash()).is_err());
    }

    #[test]
    fn body_errors_propagate() {
        let block = SwitchBlock::new(vec![Arm::case(1_i64, ())]);
        let out: Result<_, &str> = block.run(&Value::Int(1), |()| Err("boom"));
        assert_eq!(out, Err("boom"));
    }
}

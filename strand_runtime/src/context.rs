// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Execution contexts.
//!
//! A [`Context`] is a loaded compiled image: its unit descriptor table, its global slots and the
//! working integer width. A context either borrows the image (and then cannot outlive it) or
//! owns a copy; which one is visible through [`Context::is_borrowed`].
//!
//! Running code is delegated to an [`Executor`], the seam where an opcode loop plugs in. The
//! context resolves the unit, shapes the argument list and hands the executor a [`CallFrame`].

use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};

use hashbrown::HashMap;

use crate::coerce::IntWidth;
use crate::error::ScriptError;
use crate::format::read_image;
use crate::native::Natives;
use crate::unit::{UnitDescriptor, UnitHash, UnitTarget};
use crate::value::{ContextId, UnitRef, Value};

/// Resource limits applied at load and call time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of units in an image.
    pub max_units: usize,
    /// Maximum number of global slots in an image.
    pub max_globals: usize,
    /// Maximum number of arguments passed to a unit.
    pub max_args: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_units: 1 << 16,
            max_globals: 1 << 16,
            max_args: 255,
        }
    }
}

/// Context configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Resource limits.
    pub limits: Limits,
    /// Working integer width for arithmetic and literals.
    pub int_width: IntWidth,
}

impl Config {
    /// The default configuration at the given integer width.
    #[must_use]
    pub fn with_width(int_width: IntWidth) -> Self {
        Self {
            int_width,
            ..Self::default()
        }
    }
}

static NEXT_CONTEXT: AtomicU32 = AtomicU32::new(1);

/// Everything an executor needs to run one unit.
#[derive(Debug)]
pub struct CallFrame<'a> {
    /// The unit being called.
    pub unit: UnitDescriptor,
    /// Code from the unit's offset to the end of the code section.
    pub code: &'a [u8],
    /// Arguments, padded with `Null` up to the unit's parameter count.
    pub args: &'a [Value],
    /// The context's global slots.
    pub globals: &'a mut [Value],
    /// Native function registry.
    pub natives: &'a mut Natives,
    /// Working integer width.
    pub width: IntWidth,
}

impl CallFrame<'_> {
    /// Calls a registered native function with this frame's globals and width.
    pub fn call_native(&mut self, name: &str, args: &[Value]) -> Result<Value, ScriptError> {
        self.natives.call(name, args, self.globals, self.width)
    }
}

/// Runs unit code.
pub trait Executor {
    /// Executes `frame.unit`, returning its result.
    fn execute(&mut self, frame: CallFrame<'_>) -> Result<Value, ScriptError>;
}

impl<F> Executor for F
where
    F: FnMut(CallFrame<'_>) -> Result<Value, ScriptError>,
{
    fn execute(&mut self, frame: CallFrame<'_>) -> Result<Value, ScriptError> {
        self(frame)
    }
}

/// A loaded compiled image.
#[derive(Debug)]
pub struct Context<'buf> {
    id: ContextId,
    image: Cow<'buf, [u8]>,
    units: Vec<UnitDescriptor>,
    by_hash: HashMap<UnitHash, usize>,
    code_end: usize,
    globals: Vec<Value>,
    config: Config,
}

impl<'buf> Context<'buf> {
    /// Loads a context that borrows `image`.
    ///
    /// On failure no context exists; the error is [`ScriptError::ContextCreationFailed`].
    pub fn load(image: &'buf [u8], config: &Config) -> Result<Self, ScriptError> {
        Self::from_image(Cow::Borrowed(image), config)
    }

    fn from_image(image: Cow<'buf, [u8]>, config: &Config) -> Result<Self, ScriptError> {
        let parsed = read_image(&image, &config.limits).inspect_err(|err| {
            tracing::warn!(error = %err, len = image.len(), "context creation failed");
        })?;
        let by_hash = parsed
            .units
            .iter()
            .enumerate()
            .map(|(i, u)| (u.hash, i))
            .collect();
        let id = ContextId(NEXT_CONTEXT.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(
            context = id.0,
            units = parsed.units.len(),
            globals = parsed.globals,
            borrowed = matches!(image, Cow::Borrowed(_)),
            "context loaded"
        );
        Ok(Self {
            id,
            units: parsed.units,
            by_hash,
            code_end: parsed.code.end,
            globals: alloc::vec![Value::Null; parsed.globals],
            config: *config,
            image,
        })
    }

    /// Copies the image if it is borrowed, detaching the context from the caller's buffer.
    #[must_use]
    pub fn into_owned(self) -> Context<'static> {
        Context {
            id: self.id,
            image: Cow::Owned(self.image.into_owned()),
            units: self.units,
            by_hash: self.by_hash,
            code_end: self.code_end,
            globals: self.globals,
            config: self.config,
        }
    }

    /// Unique id of this context.
    #[must_use]
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Returns `true` if the context borrows its image rather than owning a copy.
    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        matches!(self.image, Cow::Borrowed(_))
    }

    /// The compiled image.
    #[must_use]
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// The configuration the context was loaded with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Working integer width.
    #[must_use]
    pub fn width(&self) -> IntWidth {
        self.config.int_width
    }

    /// Unit descriptors, in compiled order.
    #[must_use]
    pub fn units(&self) -> &[UnitDescriptor] {
        &self.units
    }

    /// Global slots.
    #[must_use]
    pub fn globals(&self) -> &[Value] {
        &self.globals
    }

    /// Global slots, mutably.
    #[must_use]
    pub fn globals_mut(&mut self) -> &mut [Value] {
        &mut self.globals
    }

    /// Looks up a unit by hash.
    #[must_use]
    pub fn unit_by_hash(&self, hash: UnitHash) -> Option<&UnitDescriptor> {
        self.by_hash.get(&hash).map(|&i| &self.units[i])
    }

    /// Looks up a unit by source name.
    #[must_use]
    pub fn unit_by_name(&self, name: &str) -> Option<&UnitDescriptor> {
        self.unit_by_hash(UnitTarget::Name(name).hash())
    }

    /// Resolves `target`, failing with [`ScriptError::UnknownUnit`].
    pub fn unit<'t>(
        &self,
        target: impl Into<UnitTarget<'t>>,
    ) -> Result<&UnitDescriptor, ScriptError> {
        let hash = target.into().hash();
        self.unit_by_hash(hash).ok_or(ScriptError::UnknownUnit(hash))
    }

    /// Returns a unit reference value bound to this context.
    pub fn unit_ref<'t>(&self, target: impl Into<UnitTarget<'t>>) -> Result<Value, ScriptError> {
        let unit = self.unit(target)?;
        Ok(Value::Unit(UnitRef {
            hash: unit.hash,
            context: self.id,
        }))
    }

    /// Calls the unit named by `target` with `args`.
    ///
    /// Arguments beyond the unit's parameter count are passed through; missing ones are
    /// padded with `Null`. More than [`Limits::max_args`] arguments fail with
    /// [`ScriptError::IndexOutOfRange`].
    pub fn call<'t>(
        &mut self,
        natives: &mut Natives,
        executor: &mut impl Executor,
        target: impl Into<UnitTarget<'t>>,
        args: &[Value],
    ) -> Result<Value, ScriptError> {
        let unit = *self.unit(target)?;
        let max = self.config.limits.max_args;
        if args.len() > max {
            return Err(ScriptError::IndexOutOfRange {
                index: i64::try_from(args.len()).unwrap_or(i64::MAX),
                len: max,
            });
        }

        let padded: Vec<Value>;
        let params = usize::from(unit.params);
        let args = if args.len() < params {
            padded = args
                .iter()
                .cloned()
                .chain(core::iter::repeat(Value::Null))
                .take(params)
                .collect();
            &padded[..]
        } else {
            args
        };

        let code = usize::try_from(unit.offset)
            .ok()
            .and_then(|start| self.image.get(start..self.code_end))
            .unwrap_or_default();
        tracing::trace!(context = self.id.0, unit = %unit.hash, argc = args.len(), "call");
        executor.execute(CallFrame {
            unit,
            code,
            args,
            globals: &mut self.globals,
            natives,
            width: self.config.int_width,
        })
    }

    /// Calls through a unit reference value.
    ///
    /// References minted by another context fail with [`ScriptError::ForeignUnit`].
    pub fn call_ref(
        &mut self,
        natives: &mut Natives,
        executor: &mut impl Executor,
        unit: &Value,
        args: &[Value],
    ) -> Result<Value, ScriptError> {
        let Value::Unit(r) = unit else {
            return Err(ScriptError::mismatch_unary("call", unit.tag()));
        };
        if r.context != self.id {
            return Err(ScriptError::ForeignUnit(r.hash));
        }
        self.call(natives, executor, r.hash, args)
    }
}

impl Context<'static> {
    /// Loads a context that owns `image`.
    pub fn load_owned(image: Vec<u8>, config: &Config) -> Result<Self, ScriptError> {
        Self::from_image(Cow::Owned(image), config)
    }
}

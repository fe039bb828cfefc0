//! Call-stack capture for diagnostics

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use crate::Context;

/// A captured call stack.
///
/// Cloning is cheap: clones share the same snapshot. Symbol resolution is
/// deferred until the stack is first rendered.
#[derive(Clone)]
pub struct Stack {
    backtrace: Arc<Backtrace>,
}

impl Stack {
    /// Capture the current call stack, ignoring `RUST_BACKTRACE`.
    pub fn capture() -> Self {
        Self {
            backtrace: Arc::new(Backtrace::force_capture()),
        }
    }

    /// Render the stack as text, one frame per line.
    pub fn render(&self) -> String {
        self.backtrace.to_string()
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.backtrace)
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Stack(<captured>)")
    }
}

/// Diagnostic record attached to one link of an error chain.
#[derive(Clone, Default)]
pub(crate) struct Trace {
    pub(crate) location: Option<&'static Location<'static>>,
    pub(crate) stack: Option<Stack>,
}

impl Trace {
    /// Record the caller's location and stack if `ctx` asks for it.
    ///
    /// Always empty under the `release` feature, where `ctx.stack_trace()`
    /// is constant `false`.
    #[track_caller]
    #[inline]
    pub(crate) fn capture(ctx: &Context) -> Self {
        if !ctx.stack_trace() {
            return Self::default();
        }
        Self {
            location: Some(Location::caller()),
            stack: Some(Stack::capture()),
        }
    }

    /// True when neither a call site nor a stack was recorded.
    pub(crate) fn is_empty(&self) -> bool {
        self.location.is_none() && self.stack.is_none()
    }

    /// Record a stack regardless of context or build mode.
    pub(crate) fn forced(location: Option<&'static Location<'static>>, stack: Stack) -> Self {
        Self {
            location,
            stack: Some(stack),
        }
    }
}

//! Diagnostics configuration carried through call chains

/// Environment variable read by [`Context::from_env`].
pub const STACK_TRACE_ENV: &str = "FAULTLINE_STACK_TRACE";

/// Per-scope diagnostics switch.
///
/// A `Context` is passed by reference into every constructor. It decides
/// whether the error captures a stack trace and call site at construction
/// time. There is no process-wide flag: two call chains can run with
/// different settings side by side.
///
/// With the `release` feature enabled, stack capture is compiled out and
/// [`Context::stack_trace`] always reports `false`. Recovered panics are the
/// one exception; they always carry a stack.
///
/// ```rust
/// use faultline_error::Context;
///
/// let ctx = Context::background();
/// assert!(!ctx.stack_trace());
///
/// let debug = ctx.with_stack_trace();
/// assert_eq!(debug.stack_trace(), cfg!(not(feature = "release")));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Context {
    stack_trace: bool,
}

impl Context {
    /// Default scope: no stack traces.
    pub const fn background() -> Self {
        Self { stack_trace: false }
    }

    /// Enable stack capture for errors created in this scope.
    pub const fn with_stack_trace(mut self) -> Self {
        self.stack_trace = true;
        self
    }

    /// Disable stack capture for errors created in this scope.
    pub const fn without_stack_trace(mut self) -> Self {
        self.stack_trace = false;
        self
    }

    /// Build a context from `FAULTLINE_STACK_TRACE`.
    ///
    /// Accepts `1`, `true`, `yes` and `on` (any case). Anything else, or an
    /// unset variable, leaves stack traces off. Meant for process startup;
    /// pass the resulting context down rather than re-reading the environment.
    pub fn from_env() -> Self {
        let enabled = std::env::var(STACK_TRACE_ENV)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        Self { stack_trace: enabled }
    }

    /// Whether errors created in this scope capture a stack trace.
    #[inline]
    pub const fn stack_trace(&self) -> bool {
        !cfg!(feature = "release") && self.stack_trace
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

//! The Error value

use std::borrow::Cow;
use std::error::Error as StdError;
use std::panic::Location;
use std::sync::Arc;

use faultline_result::Optional;

use crate::cause::{self, Cause};
use crate::stack::{Stack, Trace};
use crate::Context;

/// Label carried by errors recovered from a panic.
pub const PANIC: &str = "PANIC";

/// A value that is either "no error" or an error.
///
/// An error carries:
/// - `message`: human-readable text
/// - `kind`: an optional [`Cause`] discriminant for `match`-based handling
/// - `labels`: tracking labels added by `propagate` and `convert`
/// - `provenance`: the error it was wrapped or converted from (printing only)
/// - `stack`: a call stack, when the creating [`Context`] asked for one
///
/// The empty value is `Error::none()` (also `Default`). It allocates nothing
/// and every empty value compares equal to every other. A non-empty error is
/// equal to itself, its clones and its propagations: two calls to
/// `Error::new` with the same text are *not* equal, and neither is a `wrap`
/// result and the error it presents. `propagate` keeps equality; use
/// [`Error::is`] to ask whether an error appears in another's chain.
///
/// Errors are immutable and cheap to clone.
///
/// # Example
///
/// ```rust
/// use faultline_error::{err, propagate, Context, Error};
///
/// let ctx = Context::background();
/// let err: Error = err!(&ctx, "whoops: {}", "bad");
/// assert_eq!(err.message(), "whoops: bad");
///
/// let forwarded = propagate(&ctx, "load_config", err.clone());
/// assert!(forwarded.is(&err));
/// assert_eq!(forwarded.labels(), vec!["load_config"]);
/// ```
pub struct Error<C: Cause = &'static str> {
    pub(crate) node: Option<Arc<Node<C>>>,
}

pub(crate) struct Node<C: Cause> {
    pub(crate) kind: Kind<C>,
    pub(crate) trace: Trace,
}

pub(crate) enum Kind<C: Cause> {
    /// Created by `new` / `from_cause` / `with_cause`.
    Origin {
        message: Cow<'static, str>,
        cause: C,
    },
    /// An error from outside this crate. Always terminal.
    Foreign {
        message: String,
        error: anyhow::Error,
    },
    /// A recovered panic.
    Panic { message: String },
    /// `to` is the identity, `from` is provenance only.
    Converted {
        label: Option<&'static str>,
        from: Error<C>,
        to: Error<C>,
    },
    /// Every hop of a propagation, oldest first. `inner` is never itself
    /// `Propagated`.
    Propagated { hops: Vec<Hop>, inner: Error<C> },
}

#[derive(Clone)]
pub(crate) struct Hop {
    pub(crate) label: &'static str,
    pub(crate) trace: Trace,
}

// =============================================================================
// Constructors
// =============================================================================

impl<C: Cause> Error<C> {
    /// The empty ("no error") value.
    pub const fn none() -> Self {
        Self { node: None }
    }

    /// Create a new error from message text.
    ///
    /// The text is stored as given; no formatting happens. Use the
    /// [`err!`](crate::err) macro to format with arguments.
    #[track_caller]
    pub fn new(ctx: &Context, message: impl Into<Cow<'static, str>>) -> Self {
        Self::origin(ctx, message.into(), C::NONE)
    }

    /// Create a new error from a cause discriminant.
    ///
    /// The message is the cause's canonical text, or `TypeName(value)` when
    /// it has none.
    ///
    /// # Panics
    ///
    /// Panics if `cause` is the zero ("no error") discriminant.
    #[track_caller]
    pub fn from_cause(ctx: &Context, cause: C) -> Self {
        assert_cause(&cause);
        Self::origin(ctx, cause::describe(&cause), cause)
    }

    /// Create a new error with both a cause discriminant and message text.
    ///
    /// # Panics
    ///
    /// Panics if `cause` is the zero ("no error") discriminant.
    #[track_caller]
    pub fn with_cause(ctx: &Context, cause: C, message: impl Into<Cow<'static, str>>) -> Self {
        assert_cause(&cause);
        Self::origin(ctx, message.into(), cause)
    }

    /// Wrap an error from outside this crate as a terminal link.
    #[track_caller]
    pub fn foreign<E>(ctx: &Context, error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_anyhow(ctx, anyhow::Error::new(error))
    }

    /// Wrap an `anyhow::Error` as a terminal link.
    #[track_caller]
    pub fn from_anyhow(ctx: &Context, error: anyhow::Error) -> Self {
        let message = error.to_string();
        Self::from_kind(Kind::Foreign { message, error }, Trace::capture(ctx))
    }

    #[track_caller]
    fn origin(ctx: &Context, message: Cow<'static, str>, cause: C) -> Self {
        Self::from_kind(Kind::Origin { message, cause }, Trace::capture(ctx))
    }

    pub(crate) fn recovered(
        message: String,
        location: Option<&'static Location<'static>>,
        stack: Stack,
    ) -> Self {
        Self::from_kind(Kind::Panic { message }, Trace::forced(location, stack))
    }

    pub(crate) fn from_kind(kind: Kind<C>, trace: Trace) -> Self {
        Self {
            node: Some(Arc::new(Node { kind, trace })),
        }
    }
}

#[track_caller]
fn assert_cause<C: Cause>(cause: &C) {
    assert!(
        !cause.is_none(),
        "error built from the zero cause {:?}; the zero value means no error",
        cause
    );
}

// =============================================================================
// Accessors
// =============================================================================

impl<C: Cause> Error<C> {
    /// True for the empty ("no error") value. Never formats anything.
    #[inline]
    pub fn is_none(&self) -> bool {
        self.node.is_none()
    }

    /// True if this holds an error.
    #[inline]
    pub fn is_some(&self) -> bool {
        self.node.is_some()
    }

    /// The message of the identity error. Empty for `Error::none()`.
    pub fn message(&self) -> &str {
        match self.identity().map(|node| &node.kind) {
            Some(Kind::Origin { message, .. }) => &message[..],
            Some(Kind::Foreign { message, .. }) | Some(Kind::Panic { message }) => message.as_str(),
            _ => "",
        }
    }

    /// The cause discriminant, for use in `match`.
    ///
    /// Only meaningful for errors built with `from_cause` or `with_cause`
    /// (directly, or as the identity of a wrap/convert/propagate). Every
    /// other error, and the empty value, reports `C::NONE`.
    pub fn kind(&self) -> C {
        match self.identity().map(|node| &node.kind) {
            Some(Kind::Origin { cause, .. }) => *cause,
            _ => C::NONE,
        }
    }

    /// True if this error's discriminant is `cause`. Always false for the
    /// zero discriminant.
    pub fn is_kind(&self, cause: C) -> bool {
        !cause.is_none() && self.kind() == cause
    }

    /// True if the identity error is a recovered panic.
    pub fn is_panic(&self) -> bool {
        matches!(self.identity().map(|node| &node.kind), Some(Kind::Panic { .. }))
    }

    /// True if the identity error came from outside this crate.
    pub fn is_foreign(&self) -> bool {
        matches!(self.identity().map(|node| &node.kind), Some(Kind::Foreign { .. }))
    }

    /// Tracking labels along the identity chain, oldest first.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        self.collect_labels(&mut labels);
        labels
    }

    fn collect_labels(&self, out: &mut Vec<&'static str>) {
        let Some(node) = &self.node else {
            return;
        };
        match &node.kind {
            Kind::Converted { label, to, .. } => {
                to.collect_labels(out);
                out.extend(label.iter().copied());
            }
            Kind::Propagated { hops, inner } => {
                inner.collect_labels(out);
                out.extend(hops.iter().map(|hop| hop.label));
            }
            Kind::Panic { .. } => out.push(PANIC),
            Kind::Origin { .. } | Kind::Foreign { .. } => {}
        }
    }

    /// Where the outermost link was created, if it was recorded.
    pub fn location(&self) -> Option<&'static Location<'static>> {
        self.outer_trace().and_then(|trace| trace.location)
    }

    /// The stack captured when the outermost link was created, if any.
    pub fn stack(&self) -> Option<&Stack> {
        self.outer_trace().and_then(|trace| trace.stack.as_ref())
    }

    fn outer_trace(&self) -> Option<&Trace> {
        let node = self.node.as_ref()?;
        match &node.kind {
            Kind::Propagated { hops, .. } => hops.last().map(|hop| &hop.trace),
            _ => Some(&node.trace),
        }
    }

    /// The terminal node that identity checks resolve to.
    pub(crate) fn identity(&self) -> Option<&Arc<Node<C>>> {
        let mut node = self.node.as_ref()?;
        loop {
            match &node.kind {
                Kind::Converted { to, .. } => node = to.node.as_ref()?,
                Kind::Propagated { inner, .. } => node = inner.node.as_ref()?,
                _ => return Some(node),
            }
        }
    }

    /// The outer node with propagation hops stripped. Propagation never
    /// nests, so at most one layer is removed.
    pub(crate) fn anchor(&self) -> Option<&Arc<Node<C>>> {
        let node = self.node.as_ref()?;
        match &node.kind {
            Kind::Propagated { inner, .. } => inner.node.as_ref(),
            _ => Some(node),
        }
    }

    /// The next link in the identity chain.
    pub(crate) fn next_link(&self) -> Option<&Error<C>> {
        match &self.node.as_ref()?.kind {
            Kind::Converted { to, .. } => Some(to),
            Kind::Propagated { inner, .. } => Some(inner),
            _ => None,
        }
    }
}

// =============================================================================
// Trait implementations
// =============================================================================

impl<C: Cause> Clone for Error<C> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
        }
    }
}

impl<C: Cause> Default for Error<C> {
    fn default() -> Self {
        Self::none()
    }
}

impl<C: Cause> PartialEq for Error<C> {
    /// Compares the links themselves, looking through propagation.
    fn eq(&self, other: &Self) -> bool {
        match (self.anchor(), other.anchor()) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<C: Cause> Eq for Error<C> {}

impl<C: Cause> Optional for Error<C> {
    fn none() -> Self {
        Error::none()
    }

    fn is_none(&self) -> bool {
        self.node.is_none()
    }
}

impl<C: Cause> StdError for Error<C> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.node.as_ref()?.kind {
            Kind::Converted { to, .. } => Some(to),
            Kind::Propagated { inner, .. } => Some(inner),
            Kind::Foreign { error, .. } => error.source(),
            Kind::Origin { .. } | Kind::Panic { .. } => None,
        }
    }
}

// Foreign conversions carry no stack: there is no context to ask.

impl<C: Cause> From<std::io::Error> for Error<C> {
    fn from(err: std::io::Error) -> Self {
        Self::foreign(&Context::background(), err)
    }
}

impl<C: Cause> From<anyhow::Error> for Error<C> {
    fn from(err: anyhow::Error) -> Self {
        Self::from_anyhow(&Context::background(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cause;

    cause! {
        enum Storage {
            Ok,
            NotFound = 1 => "record not found",
            Corrupt = 2 => "record corrupt",
        }
    }

    fn ctx() -> Context {
        Context::background()
    }

    #[test]
    fn test_none_is_stable() {
        let a: Error = Error::none();
        let b: Error = Error::default();
        assert!(a.is_none());
        assert!(!a.is_some());
        assert_eq!(a, b);
        assert_eq!(a.message(), "");
        assert!(a.labels().is_empty());
        assert_eq!(a.kind(), "");
    }

    #[test]
    fn test_new_keeps_text_verbatim() {
        let err: Error = Error::new(&ctx(), "100% {done}");
        assert!(err.is_some());
        assert_eq!(err.message(), "100% {done}");
        assert_eq!(err.kind(), "");
    }

    #[test]
    fn test_new_errors_are_distinct() {
        let a: Error = Error::new(&ctx(), "whoops");
        let b: Error = Error::new(&ctx(), "whoops");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_from_cause() {
        let err = Error::from_cause(&ctx(), Storage::NotFound);
        assert_eq!(err.kind(), Storage::NotFound);
        assert!(err.is_kind(Storage::NotFound));
        assert!(!err.is_kind(Storage::Corrupt));
        assert!(!err.is_kind(Storage::Ok));
        assert_eq!(err.message(), "record not found");

        match err.kind() {
            Storage::NotFound => {}
            other => panic!("unexpected cause {:?}", other),
        }
    }

    #[test]
    fn test_string_cause_round_trip() {
        const ERR_ONE: &str = "one";
        let err = Error::from_cause(&ctx(), ERR_ONE);
        assert_eq!(err.kind(), ERR_ONE);
        assert_eq!(err.message(), "one");
    }

    #[test]
    fn test_with_cause_custom_message() {
        let err = Error::with_cause(&ctx(), Storage::Corrupt, "checksum mismatch in block 7");
        assert_eq!(err.kind(), Storage::Corrupt);
        assert_eq!(err.message(), "checksum mismatch in block 7");
    }

    #[test]
    fn test_numeric_cause_fallback_message() {
        let err = Error::from_cause(&ctx(), 42u32);
        assert_eq!(err.message(), "u32(42)");
        assert_eq!(err.kind(), 42);
    }

    #[test]
    #[should_panic(expected = "zero cause")]
    fn test_zero_cause_panics() {
        let _ = Error::from_cause(&ctx(), Storage::Ok);
    }

    #[test]
    #[should_panic(expected = "zero cause")]
    fn test_zero_integer_cause_panics() {
        let _ = Error::with_cause(&ctx(), 0u8, "never");
    }

    #[test]
    fn test_foreign() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
        let err: Error = Error::foreign(&ctx(), io);
        assert!(err.is_foreign());
        assert_eq!(err.message(), "config.toml missing");
        assert_eq!(err.kind(), "");
    }

    #[test]
    fn test_from_io_error() {
        fn open() -> std::result::Result<(), Error<Storage>> {
            let read: std::result::Result<(), std::io::Error> =
                Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
            read?;
            Ok(())
        }
        let err = open().unwrap_err();
        assert!(err.is_foreign());
        assert_eq!(err.kind(), Storage::Ok);
        assert!(err.stack().is_none());
    }

    #[test]
    fn test_from_anyhow() {
        let err: Error = anyhow::anyhow!("upstream timed out").into();
        assert_eq!(err.message(), "upstream timed out");
    }

    #[test]
    fn test_optional_contract() {
        let none = <Error as Optional>::none();
        assert!(Optional::is_none(&none));
        let some: Error = Error::new(&ctx(), "x");
        assert!(Optional::is_some(&some));
    }

    #[test]
    fn test_no_stack_without_diagnostics() {
        let err: Error = Error::new(&ctx(), "quiet");
        assert!(err.stack().is_none());
        assert!(err.location().is_none());
    }

    #[cfg(not(feature = "release"))]
    #[test]
    fn test_stack_with_diagnostics() {
        let ctx = Context::background().with_stack_trace();
        let line = line!() + 1;
        let err: Error = Error::new(&ctx, "loud");
        assert!(err.stack().is_some());
        let location = err.location().expect("location recorded");
        assert_eq!(location.file(), file!());
        assert_eq!(location.line(), line);
    }

    #[test]
    fn test_source_of_origin_is_none() {
        let err: Error = Error::new(&ctx(), "x");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
        assert_send_sync::<Error<Storage>>();
    }

    #[test]
    fn test_none_does_not_allocate() {
        assert_eq!(
            std::mem::size_of::<Error>(),
            std::mem::size_of::<usize>(),
            "Error should be a single nullable pointer"
        );
    }
}

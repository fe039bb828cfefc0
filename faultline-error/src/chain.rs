//! Causal chain operations: wrap, propagate, convert and lookups
//!
//! A chain is a singly linked list from the most recent link to the original
//! error. Two kinds of edges leave a link:
//!
//! - the **identity** edge (`unwrapped()`), followed by `is`, `cause`,
//!   `kind` and `downcast_ref`;
//! - the **provenance** edge (`provenance()`), left behind by `wrap` and
//!   `convert` and followed only by `root_cause` and the `Full` rendering.
//!
//! Links only ever point at values that already exist, so chains are acyclic.

use std::error::Error as StdError;
use std::sync::Arc;

use crate::cause::Cause;
use crate::error::{Error, Hop, Kind};
use crate::stack::Trace;
use crate::Context;

// =============================================================================
// Building links
// =============================================================================

/// Present `to` as the public error while keeping `from` for diagnostics.
///
/// The result prints as `to` and has `to`'s identity: `is(result, to)` holds
/// and `is(result, from)` does not. An empty `to` returns `from` unchanged;
/// an empty `from` returns `to` unchanged.
#[track_caller]
pub fn wrap<C: Cause>(ctx: &Context, from: Error<C>, to: Error<C>) -> Error<C> {
    if to.is_none() {
        return from;
    }
    if from.is_none() {
        return to;
    }
    Error::from_kind(
        Kind::Converted {
            label: None,
            from,
            to,
        },
        Trace::capture(ctx),
    )
}

/// Record that `err` passed through `label` without changing its identity.
///
/// Propagating an already propagated error appends to its hop history rather
/// than nesting, so a chain grows by one entry per hop, not one link. An
/// empty `err` stays empty.
#[track_caller]
pub fn propagate<C: Cause>(ctx: &Context, label: &'static str, err: Error<C>) -> Error<C> {
    if err.is_none() {
        return err;
    }
    let hop = Hop {
        label,
        trace: Trace::capture(ctx),
    };
    if let Some(Kind::Propagated { hops, inner }) = err.node.as_deref().map(|node| &node.kind) {
        let mut hops = hops.clone();
        hops.push(hop);
        let inner = inner.clone();
        return Error::from_kind(Kind::Propagated { hops, inner }, Trace::default());
    }
    Error::from_kind(
        Kind::Propagated {
            hops: vec![hop],
            inner: err,
        },
        Trace::default(),
    )
}

/// `wrap` plus a tracking label, for module boundaries.
///
/// With an empty `to` this is `propagate(label, from)`; with an empty `from`
/// it is `propagate(label, to)`.
#[track_caller]
pub fn convert<C: Cause>(
    ctx: &Context,
    label: &'static str,
    from: Error<C>,
    to: Error<C>,
) -> Error<C> {
    if to.is_none() {
        return propagate(ctx, label, from);
    }
    if from.is_none() {
        return propagate(ctx, label, to);
    }
    Error::from_kind(
        Kind::Converted {
            label: Some(label),
            from,
            to,
        },
        Trace::capture(ctx),
    )
}

// =============================================================================
// Lookups
// =============================================================================

/// True if `target` is reached by unwrapping `err`.
///
/// Walks the identity chain of `err` looking for `target`'s link. Propagation
/// hops are transparent on both sides, so a propagated error matches the
/// original and vice versa. A wrap result matches the error it presents, but
/// not the other way round. Two empty values match each other and nothing
/// else.
pub fn is<C: Cause>(err: &Error<C>, target: &Error<C>) -> bool {
    let Some(anchor) = target.anchor() else {
        return err.is_none();
    };
    err.chain()
        .filter_map(|link| link.node.as_ref())
        .any(|node| Arc::ptr_eq(node, anchor))
}

/// The next link in the identity chain, or `Error::none()` at the end.
pub fn unwrap<C: Cause>(err: &Error<C>) -> Error<C> {
    err.next_link().cloned().unwrap_or_default()
}

/// The identity-respecting cause: the terminal link reached through
/// identity edges. After a `wrap` or `convert` this is the replacement, not
/// the superseded original.
pub fn cause<C: Cause>(err: &Error<C>) -> Error<C> {
    Error {
        node: err.identity().cloned(),
    }
}

/// The true origin: follows provenance edges through every `wrap` and
/// `convert` back to the first error.
pub fn root_cause<C: Cause>(err: &Error<C>) -> Error<C> {
    let mut current = err;
    loop {
        match current.node.as_deref().map(|node| &node.kind) {
            Some(Kind::Converted { from, .. }) => current = from,
            Some(Kind::Propagated { inner, .. }) => current = inner,
            _ => return current.clone(),
        }
    }
}

/// Iterator over the identity chain, outermost link first.
pub struct Chain<'a, C: Cause> {
    next: Option<&'a Error<C>>,
}

impl<'a, C: Cause> Iterator for Chain<'a, C> {
    type Item = &'a Error<C>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.next_link();
        Some(current)
    }
}

// =============================================================================
// Method forms
// =============================================================================

impl<C: Cause> Error<C> {
    /// Method form of [`wrap`]: present `self` in place of `from`.
    #[track_caller]
    pub fn wrapping(self, ctx: &Context, from: Error<C>) -> Error<C> {
        wrap(ctx, from, self)
    }

    /// Method form of [`propagate`].
    #[track_caller]
    pub fn propagate(self, ctx: &Context, label: &'static str) -> Error<C> {
        propagate(ctx, label, self)
    }

    /// Method form of [`convert`]: present `self` in place of `from`.
    #[track_caller]
    pub fn converting(self, ctx: &Context, label: &'static str, from: Error<C>) -> Error<C> {
        convert(ctx, label, from, self)
    }

    /// Method form of [`is`].
    pub fn is(&self, target: &Error<C>) -> bool {
        is(self, target)
    }

    /// Method form of [`unwrap`].
    pub fn unwrapped(&self) -> Error<C> {
        unwrap(self)
    }

    /// Method form of [`cause`].
    pub fn cause(&self) -> Error<C> {
        cause(self)
    }

    /// Method form of [`root_cause`].
    pub fn root_cause(&self) -> Error<C> {
        root_cause(self)
    }

    /// The error this one was most recently wrapped or converted from.
    ///
    /// Diagnostic only; never consulted by identity checks. Empty if no
    /// `wrap` or `convert` appears in the identity chain.
    pub fn provenance(&self) -> Error<C> {
        self.chain()
            .find_map(|link| match link.node.as_deref().map(|node| &node.kind) {
                Some(Kind::Converted { from, .. }) => Some(from.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Walk the identity chain, outermost link first.
    pub fn chain(&self) -> Chain<'_, C> {
        Chain {
            next: self.node.as_ref().map(|_| self),
        }
    }

    /// Find a foreign error of type `E` in the identity chain.
    ///
    /// Each foreign link is searched through its own `source()` chain.
    /// Provenance is not searched.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.chain().find_map(|link| match link.node.as_deref().map(|node| &node.kind) {
            Some(Kind::Foreign { error, .. }) => error
                .downcast_ref::<E>()
                .or_else(|| error.chain().find_map(|source| source.downcast_ref::<E>())),
            _ => None,
        })
    }
}

// =============================================================================
// Result extensions
// =============================================================================

/// Chain operations on `std::result::Result<T, Error<C>>`, for use with `?`.
///
/// ```rust
/// use faultline_error::{Context, Error, ResultExt};
///
/// fn read(ctx: &Context) -> Result<u32, Error> {
///     Err(Error::new(ctx, "disk offline"))
/// }
///
/// fn load(ctx: &Context) -> Result<u32, Error> {
///     let value = read(ctx).propagate(ctx, "load")?;
///     Ok(value)
/// }
///
/// let err = load(&Context::background()).unwrap_err();
/// assert_eq!(err.labels(), vec!["load"]);
/// ```
pub trait ResultExt<T, C: Cause> {
    /// Propagate the error, if any, through `label`.
    fn propagate(self, ctx: &Context, label: &'static str) -> Result<T, Error<C>>;

    /// Convert the error, if any, into the one built by `to`.
    fn convert<F>(self, ctx: &Context, label: &'static str, to: F) -> Result<T, Error<C>>
    where
        F: FnOnce(&Error<C>) -> Error<C>;

    /// Wrap the error, if any, in the one built by `to`.
    fn wrap_with<F>(self, ctx: &Context, to: F) -> Result<T, Error<C>>
    where
        F: FnOnce(&Error<C>) -> Error<C>;
}

impl<T, C: Cause> ResultExt<T, C> for Result<T, Error<C>> {
    #[track_caller]
    fn propagate(self, ctx: &Context, label: &'static str) -> Result<T, Error<C>> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(propagate(ctx, label, err)),
        }
    }

    #[track_caller]
    fn convert<F>(self, ctx: &Context, label: &'static str, to: F) -> Result<T, Error<C>>
    where
        F: FnOnce(&Error<C>) -> Error<C>,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let to = to(&err);
                Err(convert(ctx, label, err, to))
            }
        }
    }

    #[track_caller]
    fn wrap_with<F>(self, ctx: &Context, to: F) -> Result<T, Error<C>>
    where
        F: FnOnce(&Error<C>) -> Error<C>,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let to = to(&err);
                Err(wrap(ctx, err, to))
            }
        }
    }
}

/// Turn any `Result<T, E: std::error::Error>` into one carrying an [`Error`].
pub trait IntoError<T> {
    /// Wrap the error, if any, as a foreign terminal link.
    fn into_error<C: Cause>(self, ctx: &Context) -> Result<T, Error<C>>;
}

impl<T, E> IntoError<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    #[track_caller]
    fn into_error<C: Cause>(self, ctx: &Context) -> Result<T, Error<C>> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Error::foreign(ctx, err)),
        }
    }
}

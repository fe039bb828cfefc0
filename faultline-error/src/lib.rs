//! # faultline-error
//!
//! Typed error values with explicit causal chains.
//!
//! ## Design Philosophy
//!
//! - **No error is free**: `Error::none()` is a null pointer; success paths
//!   never allocate
//! - **Cause**: a typed discriminant to `match` on instead of comparing text
//! - **Identity**: `wrap` and `convert` present a new public error and keep the
//!   old one as provenance; `propagate` records a hop and keeps the identity
//! - **Diagnostics on request**: stacks and call sites are captured only when
//!   the [`Context`] asks for them, and never under the `release` feature
//! - **Verbosity by specifier**: `{}`, `{:?}`, `{:#}` and `{:#?}` go from the
//!   bare message to the full history with stacks
//!
//! ## Usage
//!
//! ```rust
//! use faultline_error::{cause, convert, err, Context, Error, ResultExt};
//!
//! cause! {
//!     pub enum Store {
//!         Ok,
//!         Unavailable = 1 => "store unavailable",
//!     }
//! }
//!
//! fn connect(ctx: &Context) -> Result<(), Error<Store>> {
//!     Err(err!(ctx, "dial 10.0.0.7: connection refused"))
//! }
//!
//! fn open(ctx: &Context) -> Result<(), Error<Store>> {
//!     connect(ctx).convert(ctx, "store::open", |_| Error::from_cause(ctx, Store::Unavailable))
//! }
//!
//! let ctx = Context::background();
//! let err = open(&ctx).unwrap_err();
//! assert_eq!(err.kind(), Store::Unavailable);
//! assert_eq!(
//!     format!("{:#}", err),
//!     "[store::open] store unavailable -> dial 10.0.0.7: connection refused"
//! );
//! ```
//!
//! ## Principles
//!
//! - Pass a `Context` down from the process or request boundary
//! - Convert at module boundaries, propagate inside them
//! - Match on `kind()`, not on message text
//! - Catch panics only at boundaries, with [`catch`]

mod cause;
mod chain;
mod context;
mod error;
mod format;
mod macros;
mod panic;
mod report;
mod stack;

pub use cause::Cause;
pub use chain::{
    cause, convert, is, propagate, root_cause, unwrap, wrap, Chain, IntoError, ResultExt,
};
pub use context::{Context, STACK_TRACE_ENV};
pub use error::{Error, PANIC};
pub use format::{Render, Verbosity};
pub use panic::{catch, recover};
pub use report::{Report, ReportLink};
#[cfg(feature = "tracing")]
pub use report::ReportExt;
pub use stack::Stack;

pub use faultline_result::Optional;

/// Result type alias using faultline Error
pub type Result<T, C = &'static str> = std::result::Result<T, Error<C>>;

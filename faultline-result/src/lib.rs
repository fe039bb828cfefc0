//! # faultline-result
//!
//! A value-or-error container for call chains built on `faultline-error`.
//!
//! ## Design Philosophy
//!
//! - **Optional**: the error slot only needs to know whether it is empty
//! - **Zero value**: `value()` on a failed result returns `T::default()`
//!   rather than panicking; nothing else asks `T` for a default
//! - **Escape hatch**: `value_or_panic()` for initialization code where a
//!   failure is unrecoverable
//! - **Chaining**: `then()` threads a value through fallible steps and
//!   short-circuits on the first error
//!
//! ## Usage
//!
//! ```rust
//! use faultline_result::{Optional, Result};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Failure(Option<&'static str>);
//!
//! impl Optional for Failure {
//!     fn none() -> Self { Failure(None) }
//!     fn is_none(&self) -> bool { self.0.is_none() }
//! }
//!
//! fn parse(input: &str) -> Result<u32, Failure> {
//!     match input.parse() {
//!         Ok(v) => Result::ok(v),
//!         Err(_) => Result::err(Failure(Some("not a number"))),
//!     }
//! }
//!
//! let doubled = parse("21").then(|v| Result::ok(v * 2));
//! assert_eq!(doubled.value_or(0), 42);
//! assert!(!parse("x").is_ok());
//! ```

mod result;
mod then;

pub use result::Result;
pub use then::then;

/// An error slot that can be empty.
///
/// The empty value means "no error". `Result::is_ok()` is defined purely in
/// terms of `is_none()` on the stored error.
pub trait Optional {
    /// The empty ("no error") value.
    fn none() -> Self;

    /// True if this is the empty value.
    fn is_none(&self) -> bool;

    /// True if this holds an error.
    fn is_some(&self) -> bool {
        !self.is_none()
    }
}

impl<E> Optional for Option<E> {
    fn none() -> Self {
        None
    }

    fn is_none(&self) -> bool {
        Option::is_none(self)
    }
}

//! Construction macros

/// Create an [`Error`](crate::Error), formatting only when arguments are given.
///
/// The message follows `format!` rules, inline captures included. A literal
/// with nothing to substitute is stored as the `&'static str` itself without
/// running the formatter, so `%` is never interpreted.
///
/// ```rust
/// use faultline_error::{err, Context, Error};
///
/// let ctx = Context::background();
/// let a: Error = err!(&ctx, "100% done");
/// assert_eq!(a.message(), "100% done");
///
/// let b: Error = err!(&ctx, "whoops: {}", "bad");
/// assert_eq!(b.message(), "whoops: bad");
///
/// let port = 8080;
/// let c: Error = err!(&ctx, "port {port} in use");
/// assert_eq!(c.message(), "port 8080 in use");
/// ```
///
/// A cause discriminant can be attached with `kind = ...`:
///
/// ```rust
/// use faultline_error::{cause, err, Context, Error};
///
/// cause! {
///     enum Io {
///         Ok,
///         Timeout = 1 => "timed out",
///     }
/// }
///
/// let ctx = Context::background();
/// let e: Error<Io> = err!(&ctx, kind = Io::Timeout, "read {} bytes", 0);
/// assert_eq!(e.kind(), Io::Timeout);
/// assert_eq!(e.message(), "read 0 bytes");
/// ```
#[macro_export]
macro_rules! err {
    ($ctx:expr, kind = $cause:expr, $msg:literal $(,)?) => {
        $crate::Error::with_cause($ctx, $cause, $crate::__message!($msg))
    };
    ($ctx:expr, kind = $cause:expr, $fmt:literal, $($arg:tt)+) => {
        $crate::Error::with_cause($ctx, $cause, ::std::format!($fmt, $($arg)+))
    };
    ($ctx:expr, $msg:literal $(,)?) => {
        $crate::Error::new($ctx, $crate::__message!($msg))
    };
    ($ctx:expr, $fmt:literal, $($arg:tt)+) => {
        $crate::Error::new($ctx, ::std::format!($fmt, $($arg)+))
    };
}

/// Message text for a lone literal: borrowed when it has no placeholders.
#[doc(hidden)]
#[macro_export]
macro_rules! __message {
    ($msg:literal) => {
        match ::std::format_args!($msg).as_str() {
            ::core::option::Option::Some(text) => ::std::borrow::Cow::Borrowed(text),
            ::core::option::Option::None => ::std::borrow::Cow::Owned(::std::format!($msg)),
        }
    };
}

//! Monadic chaining over Result

use crate::{Optional, Result};

/// Apply `f` to the value of an ok result and return its result.
///
/// An error result short-circuits: `f` is never invoked and the existing error
/// moves, untouched, into the error slot of `Result<S, E>`. Neither `T` nor
/// `S` needs a zero value.
///
/// ```rust
/// use faultline_result::{then, Result};
///
/// let res: Result<i32, Option<&str>> = Result::ok(1);
/// let res = then(res, |v| Result::ok(v as f64 + 0.5));
/// assert_eq!(res.value(), 1.5);
/// ```
pub fn then<T, S, E, F>(result: Result<T, E>, f: F) -> Result<S, E>
where
    E: Optional,
    F: FnOnce(T) -> Result<S, E>,
{
    match result.split() {
        (Some(value), _) => f(value),
        (None, err) => Result::err(err),
    }
}

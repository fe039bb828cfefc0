//! The Result container

use std::fmt;

use crate::Optional;

/// Result of an operation: a value, or an error.
///
/// `is_ok()` is decided by the error slot alone. A failed result holds no
/// value; `value()` and `into_parts()` report `T::default()` in its place,
/// which is the only reason they need `T: Default`. Every other method works
/// for any `T`, so file handles and connections can be carried too.
///
/// A result built with `err(E::none())` counts as ok but holds no value.
///
/// # Example
///
/// ```rust
/// use faultline_result::Result;
///
/// let res: Result<u32, Option<String>> = Result::err(Some("disk full".into()));
/// assert!(!res.is_ok());
/// assert_eq!(res.value_or(7), 7);
/// ```
#[must_use = "this `Result` may hold an error, which should be handled"]
#[derive(Clone, PartialEq, Eq)]
pub struct Result<T, E: Optional> {
    value: Option<T>,
    err: E,
}

impl<T, E: Optional> Result<T, E> {
    /// Successful result.
    pub fn ok(value: T) -> Self {
        Self {
            value: Some(value),
            err: E::none(),
        }
    }

    /// Failed result.
    pub fn err(err: E) -> Self {
        Self { value: None, err }
    }

    /// True if the stored error is empty.
    pub fn is_ok(&self) -> bool {
        self.err.is_none()
    }

    /// True if the stored error is not empty.
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// The stored error. Empty for an ok result.
    pub fn error(&self) -> &E {
        &self.err
    }

    /// Consume the result and return the stored error.
    pub fn into_error(self) -> E {
        self.err
    }

    /// The stored value, or the zero value of `T` when there is none.
    ///
    /// Never panics. Check `is_ok()` first when the distinction matters.
    pub fn value(self) -> T
    where
        T: Default,
    {
        self.value.unwrap_or_default()
    }

    /// Borrow the stored value, if there is one.
    pub fn value_ref(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// The stored value if there is one, `default` otherwise.
    pub fn value_or(self, default: T) -> T {
        self.value.unwrap_or(default)
    }

    /// The stored value if there is one, otherwise the output of `f` applied
    /// to the error.
    pub fn value_or_else<F>(self, f: F) -> T
    where
        F: FnOnce(E) -> T,
    {
        match self.value {
            Some(value) => value,
            None => f(self.err),
        }
    }

    /// The stored value if ok, otherwise panic with the error's full rendering.
    ///
    /// Reserve this for initialization code where a failure is unrecoverable.
    /// Elsewhere use `value_or()` or `into_std()` with `?`.
    ///
    /// # Panics
    ///
    /// Panics if there is no value. The panic message is the `{:#?}`
    /// rendering of the error.
    #[track_caller]
    pub fn value_or_panic(self) -> T
    where
        E: fmt::Debug,
    {
        match self.value {
            Some(value) => value,
            None => panic!("{:#?}", self.err),
        }
    }

    /// Decompose into the plain `(value, error)` pair.
    pub fn into_parts(self) -> (T, E)
    where
        T: Default,
    {
        (self.value.unwrap_or_default(), self.err)
    }

    /// Convert into a `std::result::Result` so `?` can be used.
    ///
    /// A result with no value becomes `Err`, even when its error is empty.
    pub fn into_std(self) -> std::result::Result<T, E> {
        match self.value {
            Some(value) => Ok(value),
            None => Err(self.err),
        }
    }

    /// Chain a fallible step. `f` runs only when there is a value; an error
    /// is carried over untouched into the new result type.
    pub fn then<S, F>(self, f: F) -> Result<S, E>
    where
        F: FnOnce(T) -> Result<S, E>,
    {
        crate::then(self, f)
    }

    /// Map the value of an ok result.
    pub fn map<S, F>(self, f: F) -> Result<S, E>
    where
        F: FnOnce(T) -> S,
    {
        match self.value {
            Some(value) => Result::ok(f(value)),
            None => Result::err(self.err),
        }
    }

    pub(crate) fn split(self) -> (Option<T>, E) {
        (self.value, self.err)
    }
}

impl<T: Default, E: Optional> Default for Result<T, E> {
    fn default() -> Self {
        Self::ok(T::default())
    }
}

impl<T: fmt::Debug, E: Optional + fmt::Debug> fmt::Debug for Result<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => f.debug_tuple("Ok").field(value).finish(),
            None => f.debug_tuple("Err").field(&self.err).finish(),
        }
    }
}

impl<T, E: Optional> From<std::result::Result<T, E>> for Result<T, E> {
    fn from(res: std::result::Result<T, E>) -> Self {
        match res {
            Ok(value) => Self::ok(value),
            Err(err) => Self::err(err),
        }
    }
}

impl<T, E: Optional> From<Result<T, E>> for std::result::Result<T, E> {
    fn from(res: Result<T, E>) -> Self {
        res.into_std()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Failure(Option<String>);

    impl Optional for Failure {
        fn none() -> Self {
            Failure(None)
        }

        fn is_none(&self) -> bool {
            self.0.is_none()
        }
    }

    impl Failure {
        fn new(msg: &str) -> Self {
            Failure(Some(msg.to_string()))
        }
    }

    #[test]
    fn test_ok() {
        let res: Result<i32, Failure> = Result::ok(5);
        assert!(res.is_ok());
        assert!(!res.is_err());
        assert!(res.error().is_none());
        assert_eq!(res.value(), 5);
    }

    #[test]
    fn test_err_holds_zero_value() {
        let res: Result<i32, Failure> = Result::err(Failure::new("boom"));
        assert!(!res.is_ok());
        assert!(res.value_ref().is_none());
        assert_eq!(res.value(), 0);
    }

    #[test]
    fn test_err_with_empty_error_is_ok() {
        let res: Result<i32, Failure> = Result::err(Failure::none());
        assert!(res.is_ok());
        assert_eq!(res.clone().value(), 0);
        assert!(res.into_std().is_err());
    }

    /// Owns a resource; no sensible zero value.
    #[derive(Debug, PartialEq)]
    struct Conn {
        peer: String,
    }

    fn dial(peer: &str) -> Result<Conn, Failure> {
        if peer.is_empty() {
            Result::err(Failure::new("no peer"))
        } else {
            Result::ok(Conn {
                peer: peer.to_string(),
            })
        }
    }

    #[test]
    fn test_value_without_default() {
        let conn = dial("db:5432");
        assert_eq!(conn.value_ref().map(|c| c.peer.as_str()), Some("db:5432"));
        let peer = conn.then(|c| Result::ok(c.peer)).value_or_panic();
        assert_eq!(peer, "db:5432");

        let failed = dial("");
        assert!(failed.is_err());
        assert!(failed.value_ref().is_none());
        let err = failed.into_std().unwrap_err();
        assert_eq!(err, Failure::new("no peer"));

        let fallback = dial("").value_or(Conn {
            peer: "replica".to_string(),
        });
        assert_eq!(fallback.peer, "replica");

        let mapped = dial("").map(|c| c.peer.len());
        assert_eq!(mapped.error(), &Failure::new("no peer"));
    }

    #[test]
    fn test_value_or() {
        let ok: Result<String, Failure> = Result::ok("value".to_string());
        assert_eq!(ok.value_or("default".to_string()), "value");

        let err: Result<String, Failure> = Result::err(Failure::new("boom"));
        assert_eq!(err.value_or("default".to_string()), "default");
    }

    #[test]
    fn test_value_or_else_sees_error() {
        let err: Result<String, Failure> = Result::err(Failure::new("boom"));
        let recovered =
            err.value_or_else(|e| format!("recovered from {}", e.0.unwrap_or_default()));
        assert_eq!(recovered, "recovered from boom");
    }

    #[test]
    fn test_value_or_panic_ok() {
        let res: Result<u8, Failure> = Result::ok(9);
        assert_eq!(res.value_or_panic(), 9);
    }

    #[test]
    #[should_panic(expected = "config missing")]
    fn test_value_or_panic_err() {
        let res: Result<u8, Failure> = Result::err(Failure::new("config missing"));
        let _ = res.value_or_panic();
    }

    #[test]
    fn test_into_parts() {
        let (value, err) = Result::<i32, Failure>::ok(3).into_parts();
        assert_eq!(value, 3);
        assert!(err.is_none());

        let (value, err) = Result::<i32, Failure>::err(Failure::new("bad")).into_parts();
        assert_eq!(value, 0);
        assert_eq!(err, Failure::new("bad"));
    }

    #[test]
    fn test_std_round_trip() {
        fn step(res: Result<u32, Failure>) -> std::result::Result<u32, Failure> {
            let v = res.into_std()?;
            Ok(v + 1)
        }

        assert_eq!(step(Result::ok(1)), Ok(2));
        assert_eq!(step(Result::err(Failure::new("x"))), Err(Failure::new("x")));

        let back: Result<u32, Failure> = Err(Failure::new("y")).into();
        assert!(back.is_err());
    }

    #[test]
    fn test_map() {
        let res: Result<u32, Failure> = Result::ok(4);
        assert_eq!(res.map(|v| v.to_string()).value(), "4");

        let res: Result<u32, Failure> = Result::err(Failure::new("bad"));
        let mapped = res.map(|v| v.to_string());
        assert!(mapped.is_err());
        assert_eq!(mapped.error(), &Failure::new("bad"));
    }

    #[test]
    fn test_debug() {
        let res: Result<u32, Failure> = Result::ok(4);
        assert_eq!(format!("{:?}", res), "Ok(4)");

        let res: Result<u32, Failure> = Result::err(Failure::new("bad"));
        assert_eq!(format!("{:?}", res), "Err(Failure(Some(\"bad\")))");
    }

    #[test]
    fn test_option_is_optional() {
        let res: Result<u32, Option<&str>> = Result::err(Some("bad"));
        assert!(res.is_err());
        let res: Result<u32, Option<&str>> = Result::ok(1);
        assert!(res.is_ok());
    }
}

//! Cause discriminants for switch-style error handling

use std::borrow::Cow;
use std::fmt;

/// A closed discriminant identifying the category of an error.
///
/// The zero value [`Cause::NONE`] means "no error". Building an error from it
/// is a programming error and panics, which catches enumerations whose
/// variants were never given a non-zero value.
///
/// Implemented for `&'static str` (zero value `""`) and the integer
/// primitives (zero value `0`). Use the [`cause!`](crate::cause) macro for
/// enumerations.
pub trait Cause: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// The "no error" discriminant.
    const NONE: Self;

    /// Canonical string form, used as the message of errors built from
    /// this cause alone. `None` selects the `TypeName(value)` fallback.
    fn as_str(&self) -> Option<&'static str> {
        None
    }

    /// True for the "no error" discriminant.
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl Cause for &'static str {
    const NONE: Self = "";

    fn as_str(&self) -> Option<&'static str> {
        Some(*self)
    }
}

macro_rules! impl_integer_cause {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Cause for $ty {
                const NONE: Self = 0;
            }
        )*
    };
}

impl_integer_cause!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Message text for an error built from `cause` alone.
pub(crate) fn describe<C: Cause>(cause: &C) -> Cow<'static, str> {
    match cause.as_str() {
        Some(text) => Cow::Borrowed(text),
        None => Cow::Owned(format!("{}({:?})", short_type_name::<C>(), cause)),
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Declare a `#[repr(u32)]` cause enumeration.
///
/// The first variant is the zero ("no error") value. Every other variant gets
/// an explicit non-zero discriminant and its canonical message.
///
/// ```rust
/// use faultline_error::{cause, Cause};
///
/// cause! {
///     /// Storage layer failures.
///     pub enum StorageCause {
///         Ok,
///         NotFound = 1 => "record not found",
///         Corrupt = 2 => "record corrupt",
///     }
/// }
///
/// assert!(StorageCause::Ok.is_none());
/// assert_eq!(StorageCause::NotFound.as_str(), Some("record not found"));
/// assert_eq!(StorageCause::Corrupt.code(), 2);
/// ```
#[macro_export]
macro_rules! cause {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(#[$none_meta:meta])*
            $none:ident,
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:literal => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[repr(u32)]
        $vis enum $name {
            $(#[$none_meta])*
            #[default]
            $none = 0,
            $(
                $(#[$variant_meta])*
                $variant = $value,
            )+
        }

        impl $name {
            /// Numeric discriminant.
            pub const fn code(self) -> u32 {
                self as u32
            }
        }

        impl $crate::Cause for $name {
            const NONE: Self = $name::$none;

            fn as_str(&self) -> ::core::option::Option<&'static str> {
                match self {
                    $name::$none => ::core::option::Option::None,
                    $( $name::$variant => ::core::option::Option::Some($text), )+
                }
            }
        }
    };
}

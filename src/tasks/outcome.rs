//! # Result inference for task callables.
//!
//! A task wraps a callable `FnMut() -> R`. The return type `R` decides what the task produces:
//!
//! | `R`                         | task output | may defer? |
//! |-----------------------------|-------------|------------|
//! | `()`                        | `()`        | no         |
//! | `Option<T>`                 | `T`         | yes        |
//! | `Option<Option<T>>`         | `T`         | yes        |
//! | `Result<R2, E>`             | as `R2`     | as `R2`    |
//! | [`Outcome<T>`]              | `T`         | yes        |
//!
//! Nested options collapse to the innermost payload: `None` at any level means "not ready yet".
//! `Err(e)` turns into [`TaskError::Failed`].
//!
//! Payload types are marked with [`Payload`]. Covered out of the box: scalars, `String`,
//! `&'static str`, `Cow<'static, _>`, paths and OS strings, `std::net` addresses, time types,
//! std collections and smart pointers, arrays and tuples up to 12 elements. Types defined in
//! your crate opt in with [`impl_payload!`](crate::impl_payload).
//!
//! Types from other crates cannot implement [`Payload`] outside of this crate. Return them
//! through [`Outcome`] instead of `Option`:
//!
//! ```rust
//! use std::ops::Range;
//! use taskrunner::{make_task, Outcome, Task, TaskContext};
//!
//! let mut warm = false;
//! let (mut task, mut fut) = make_task(move || {
//!     if std::mem::replace(&mut warm, true) {
//!         Outcome::Ready(0..4_u32)
//!     } else {
//!         Outcome::Pending
//!     }
//! });
//! let _ = task.run(&TaskContext::detached());
//! let _ = task.run(&TaskContext::detached());
//! assert_eq!(fut.try_take(), Some(Ok::<Range<u32>, _>(0..4)));
//! ```
//!
//! ```rust
//! use taskrunner::{IntoOutcome, Outcome};
//!
//! assert!(matches!(Some(Some(3_u8)).into_outcome(), Outcome::Ready(3)));
//! assert!(matches!(Some(None::<u8>).into_outcome(), Outcome::Pending));
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::ffi::OsString;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use crate::error::TaskError;

/// Result of a single invocation of a task's callable.
#[derive(Debug)]
pub enum Outcome<T> {
    /// A value is available; the task is done.
    Ready(T),
    /// Not ready yet; run again on a later turn.
    Pending,
    /// The computation failed; the task is done.
    Failed(TaskError),
}

impl<T> Outcome<T> {
    /// True for [`Outcome::Pending`].
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }
}

/// Innermost non-optional payload of a callable's return type.
///
/// `into_inner` returns `None` when any optional layer is empty.
pub trait Payload {
    /// The payload after all `Option` layers are removed.
    type Inner;

    /// Peels all optional layers.
    fn into_inner(self) -> Option<Self::Inner>;
}

impl<T: Payload> Payload for Option<T> {
    type Inner = T::Inner;

    fn into_inner(self) -> Option<Self::Inner> {
        self.and_then(Payload::into_inner)
    }
}

/// Marks types as task payloads (values a task can resolve its future with).
///
/// Only usable for types defined in the calling crate; foreign types go through [`Outcome`].
///
/// ```rust
/// use taskrunner::{impl_payload, make_task, TaskContext, Task};
///
/// struct Reading { celsius: f32 }
/// impl_payload!(Reading);
///
/// let (mut task, mut fut) = make_task(|| Some(Reading { celsius: 41.5 }));
/// let _ = task.run(&TaskContext::detached());
/// assert_eq!(fut.try_take().unwrap().unwrap().celsius, 41.5);
/// ```
#[macro_export]
macro_rules! impl_payload {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Payload for $ty {
                type Inner = $ty;

                #[inline]
                fn into_inner(self) -> ::core::option::Option<Self::Inner> {
                    ::core::option::Option::Some(self)
                }
            }
        )+
    };
}

impl_payload!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
    String, &'static str, Duration, Instant, SystemTime, PathBuf, OsString, IpAddr, Ipv4Addr,
    Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6,
);

macro_rules! impl_generic_payload {
    ($($ty:ident < $($p:ident),+ >),+ $(,)?) => {
        $(
            impl<$($p),+> Payload for $ty<$($p),+> {
                type Inner = Self;

                #[inline]
                fn into_inner(self) -> Option<Self> {
                    Some(self)
                }
            }
        )+
    };
}

impl_generic_payload!(
    Vec<T>, VecDeque<T>, Box<T>, Arc<T>, Rc<T>, HashMap<K, V, S>, HashSet<T, S>,
    BTreeMap<K, V>, BTreeSet<T>, Result<T, E>,
);

impl<T, const N: usize> Payload for [T; N] {
    type Inner = Self;

    fn into_inner(self) -> Option<Self> {
        Some(self)
    }
}

impl<B: ?Sized + ToOwned + 'static> Payload for Cow<'static, B> {
    type Inner = Self;

    fn into_inner(self) -> Option<Self> {
        Some(self)
    }
}

macro_rules! impl_tuple_payload {
    ($(($($p:ident),+)),+ $(,)?) => {
        $(
            impl<$($p),+> Payload for ($($p,)+) {
                type Inner = Self;

                #[inline]
                fn into_inner(self) -> Option<Self> {
                    Some(self)
                }
            }
        )+
    };
}

impl_tuple_payload!(
    (A),
    (A, B),
    (A, B, C),
    (A, B, C, D),
    (A, B, C, D, E),
    (A, B, C, D, E, G),
    (A, B, C, D, E, G, H),
    (A, B, C, D, E, G, H, I),
    (A, B, C, D, E, G, H, I, J),
    (A, B, C, D, E, G, H, I, J, K),
    (A, B, C, D, E, G, H, I, J, K, L),
    (A, B, C, D, E, G, H, I, J, K, L, M),
);

/// Converts a callable's return value into an [`Outcome`].
pub trait IntoOutcome {
    /// Value type delivered through the task's future.
    type Output;

    /// Classifies one invocation result.
    fn into_outcome(self) -> Outcome<Self::Output>;
}

/// Return types that can report "not ready".
///
/// Required by the bounded-retry constructors: a callable returning `()` always completes,
/// so exhausting its retries could not be told apart from finishing.
pub trait Deferrable: IntoOutcome {}

impl IntoOutcome for () {
    type Output = ();

    fn into_outcome(self) -> Outcome<()> {
        Outcome::Ready(())
    }
}

impl<T: Payload> IntoOutcome for Option<T> {
    type Output = T::Inner;

    fn into_outcome(self) -> Outcome<Self::Output> {
        match self.into_inner() {
            Some(v) => Outcome::Ready(v),
            None => Outcome::Pending,
        }
    }
}

impl<T: Payload> Deferrable for Option<T> {}

impl<R: IntoOutcome, E: Display> IntoOutcome for Result<R, E> {
    type Output = R::Output;

    fn into_outcome(self) -> Outcome<Self::Output> {
        match self {
            Ok(r) => r.into_outcome(),
            Err(e) => Outcome::Failed(TaskError::Failed {
                error: e.to_string(),
            }),
        }
    }
}

impl<R: Deferrable, E: Display> Deferrable for Result<R, E> {}

impl<T> IntoOutcome for Outcome<T> {
    type Output = T;

    fn into_outcome(self) -> Outcome<T> {
        self
    }
}

impl<T> Deferrable for Outcome<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_is_always_ready() {
        assert!(matches!(().into_outcome(), Outcome::Ready(())));
    }

    #[test]
    fn test_option_none_is_pending() {
        assert!(None::<u32>.into_outcome().is_pending());
    }

    #[test]
    fn test_nested_option_flattens() {
        let ready: Outcome<String> = Some(Some(Some("gpu0".to_string()))).into_outcome();
        assert!(matches!(ready, Outcome::Ready(ref s) if s == "gpu0"));

        let pending: Outcome<String> = Some(Some(None::<String>)).into_outcome();
        assert!(pending.is_pending());
    }

    #[test]
    fn test_result_error_becomes_failure() {
        let out = Err::<Option<u8>, _>("disk gone").into_outcome();
        match out {
            Outcome::Failed(TaskError::Failed { error }) => assert_eq!(error, "disk gone"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_result_ok_delegates() {
        let out = Ok::<_, String>(Some(vec![1, 2])).into_outcome();
        assert!(matches!(out, Outcome::Ready(ref v) if v == &[1, 2]));

        let out = Ok::<(), String>(()).into_outcome();
        assert!(matches!(out, Outcome::Ready(())));
    }

    #[test]
    fn test_result_payload_is_not_a_failure() {
        // `Result` nested inside the option is a value, not a computation failure.
        let out: Outcome<Result<u8, String>> = Some(Err::<u8, _>("no".to_string())).into_outcome();
        assert!(matches!(out, Outcome::Ready(Err(_))));
    }

    #[test]
    fn test_std_payloads_beyond_scalars() {
        let out = Some(PathBuf::from("/tmp")).into_outcome();
        assert!(matches!(out, Outcome::Ready(ref p) if p == &PathBuf::from("/tmp")));

        let out = Some([1_u8; 4]).into_outcome();
        assert!(matches!(out, Outcome::Ready([1, 1, 1, 1])));

        let out = Some(Some((1_u8, 'a', "b", 2.5_f32, true))).into_outcome();
        assert!(matches!(out, Outcome::Ready((1, 'a', "b", _, true))));

        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let out = Some(addr).into_outcome();
        assert!(matches!(out, Outcome::Ready(a) if a.port() == 8080));

        let out = Some(Cow::Borrowed("static")).into_outcome();
        assert!(matches!(out, Outcome::Ready(ref c) if c == "static"));

        let out = Some(OsString::from("x")).into_outcome();
        assert!(!out.is_pending());
    }

    #[test]
    fn test_foreign_type_through_outcome() {
        // `Range` is not a payload; `Outcome` carries any type.
        let ready: Outcome<std::ops::Range<u8>> = Outcome::Ready(2..5).into_outcome();
        assert!(matches!(ready, Outcome::Ready(ref r) if r.len() == 3));

        let pending: Outcome<std::ops::Range<u8>> = Outcome::Pending.into_outcome();
        assert!(pending.is_pending());
    }
}

//! Core type definitions for the diagnosis engine.
//!
//! Provides zero-cost newtypes so cycle numbers and charge counts cannot be
//! mixed up with the other integer signals of a snapshot.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Macro to generate newtype wrappers with common implementations
macro_rules! obc_newtype {
    (
        $(#[$meta:meta])*
        $name:ident($inner:ty) => $prefix:literal
        $(, custom_methods: { $($custom:tt)* })?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[derive(Serialize, Deserialize)]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            /// Creates a new instance
            #[inline]
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            /// Raw value
            #[inline]
            pub const fn value(self) -> $inner {
                self.0
            }

            $($($custom)*)?
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl Deref for $name {
            type Target = $inner;

            #[inline]
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<$inner> for $name {
            #[inline]
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $inner {
            #[inline]
            fn from(value: $name) -> Self {
                value.0
            }
        }

        // Enable direct comparisons with raw values
        impl PartialEq<$inner> for $name {
            #[inline]
            fn eq(&self, other: &$inner) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for $inner {
            #[inline]
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }

        impl PartialOrd<$inner> for $name {
            #[inline]
            fn partial_cmp(&self, other: &$inner) -> Option<std::cmp::Ordering> {
                self.0.partial_cmp(other)
            }
        }

        impl PartialOrd<$name> for $inner {
            #[inline]
            fn partial_cmp(&self, other: &$name) -> Option<std::cmp::Ordering> {
                self.partial_cmp(&other.0)
            }
        }
    };
}

obc_newtype!(
    /// Measurement cycle number, delivered in increasing order by the data source.
    ///
    /// Signed as logged by the controller; negative values are kept so the
    /// watchdog sees regressions at face value.
    Cycle(i32) => "CYC",
    custom_methods: {
        /// Signed distance from `previous` to `self`.
        ///
        /// Negative or zero when the source stalled or went backwards.
        #[inline]
        pub fn gap_since(self, previous: Cycle) -> i64 {
            i64::from(self.0) - i64::from(previous.0)
        }
    }
);

obc_newtype!(
    /// Number of charge cycles reported by the battery management system.
    ChargeCount(u32) => "CHG"
);

impl Cycle {
    /// The first cycle number
    pub const INITIAL: Self = Self::new(0);
}

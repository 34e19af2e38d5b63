//! Strongly typed, zero-cost identifier wrappers.
//!
//! Point ids are dense and 1-based (the acceptance order of the sampler), so
//! unlike a `Vec` index they are never used to address storage directly.
//! `0` is reserved as the "no valid point" sentinel.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(0);

            /// `true` for every id except the `INVALID` sentinel.
            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(n: $inner) -> $name {
                $name(n)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Identity of a sampled point.  Stable across both snapshots so that
    /// `(src, dst)` keys line up between matrices.
    pub struct PointId(u32);
}

impl PointId {
    /// Id for the point accepted at 0-based position `ordinal`.
    ///
    /// Ids start at 1; `ordinal` values beyond `u32::MAX - 1` saturate.
    #[inline]
    pub fn from_ordinal(ordinal: usize) -> Self {
        PointId(u32::try_from(ordinal).map_or(u32::MAX, |n| n.saturating_add(1)))
    }
}

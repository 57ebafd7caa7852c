//! Dense typed indices into an [`Instance`](super::Instance).

use std::fmt;

/// Day of the week, `0..DAYS_PER_WEEK`.
pub type Day = u8;

/// Number of teaching days in a week.
pub const DAYS_PER_WEEK: usize = 5;

macro_rules! dense_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub usize);

        impl $name {
            /// Returns the position of this id in the owning instance list.
            #[inline]
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                $name(index)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

dense_id!(
    /// Index of a [`TimeSlot`](super::TimeSlot).
    SlotId,
    "slot"
);
dense_id!(
    /// Index of a [`Teacher`](super::Teacher).
    TeacherId,
    "teacher"
);
dense_id!(
    /// Index of a [`ClassGroup`](super::ClassGroup).
    ClassId,
    "class"
);
dense_id!(
    /// Index of a [`Course`](super::Course).
    CourseId,
    "course"
);
dense_id!(
    /// Index of an [`Event`](super::Event).
    EventId,
    "event"
);

//! Surrogate identifiers.
//!
//! Entities are referenced by stable numeric ids; display names are
//! looked up separately and may change without breaking references.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! surrogate_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Wraps a raw id.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// The raw id.
            #[inline]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

surrogate_id!(
    /// Identifier of an [`Instructor`](super::Instructor).
    InstructorId,
    "I"
);
surrogate_id!(
    /// Identifier of a [`Student`](super::Student).
    StudentId,
    "S"
);
surrogate_id!(
    /// Identifier of a [`Vehicle`](super::Vehicle).
    VehicleId,
    "V"
);
surrogate_id!(
    /// Identifier of a persisted [`ScheduledSession`](super::ScheduledSession).
    SessionId,
    "#"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefix() {
        assert_eq!(InstructorId::new(3).to_string(), "I3");
        assert_eq!(StudentId::new(7).to_string(), "S7");
        assert_eq!(VehicleId::new(1).to_string(), "V1");
        assert_eq!(SessionId::new(12).to_string(), "#12");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&StudentId::new(42)).unwrap();
        assert_eq!(json, "42");
        let back: StudentId = serde_json::from_str("42").unwrap();
        assert_eq!(back.get(), 42);
    }
}

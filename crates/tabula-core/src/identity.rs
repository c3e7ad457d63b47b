//! Identity types for values, actions and effects
//!
//! Identities are random v4 UUIDs: assigned once at construction and never
//! reused, even across saved and reloaded games.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! identity {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Allocate a fresh identity
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the raw UUID
            pub fn raw(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

identity!(
    /// Stable identity of a [`Value`](crate::Value) across all of its snapshots
    ValueId,
    "value"
);

identity!(
    /// Identity of a recorded [`Action`](crate::Action)
    ActionId,
    "action"
);

identity!(
    /// Identity of an [`Effect`](crate::Effect) definition
    EffectId,
    "effect"
);

//! Strongly-typed ID wrappers for all entity types
//!
//! Each repository hands out sequential integer ids. The newtypes keep ids of
//! different entities from being mixed up, and display with a short prefix
//! (`txn-12`) that is optional when parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw id
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Get the underlying integer
            pub const fn value(&self) -> u64 {
                self.0
            }

            /// The id that follows this one
            pub const fn next(&self) -> Self {
                Self(self.0 + 1)
            }

            /// Parse an ID from a string, with or without its prefix
            pub fn parse(s: &str) -> Result<Self, ParseIntError> {
                s.parse()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(TransactionId, "txn-");
define_id!(NetWorthEntryId, "nw-");
define_id!(GoalId, "goal-");
define_id!(AllocationId, "alloc-");
define_id!(BudgetTargetId, "tgt-");

//! Identifiers handed to the pipeline by the host framework

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the task an invocation is executing on behalf of.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

/// Identifier of the workspace that owns uploaded files and usage records.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(pub u64);

macro_rules! impl_id {
    ($ty:ident) => {
        impl $ty {
            /// Get the raw u64 value
            pub fn raw(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $ty {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($ty), self.0)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_id!(TaskId);
impl_id!(WorkspaceId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_raw_number() {
        assert_eq!(WorkspaceId(7).to_string(), "7");
        assert_eq!(format!("{:?}", TaskId(42)), "TaskId(42)");
    }

    #[test]
    fn test_serializes_transparently() {
        let json = serde_json::to_string(&TaskId(42)).unwrap();
        assert_eq!(json, "42");
        let parsed: WorkspaceId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, WorkspaceId::from(7));
    }
}

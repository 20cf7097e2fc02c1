//! Reel Core - Foundational types for the Reel video pipeline
//!
//! This crate provides the types every other Reel crate depends on:
//! - `TaskId`, `WorkspaceId` - Identifiers handed in by the host framework
//! - `ContentHash` - SHA-256 digest of delivered assets
//! - Error types and Result alias

mod error;
mod hash;
mod id;

pub use error::{ReelError, Result};
pub use hash::ContentHash;
pub use id::{TaskId, WorkspaceId};

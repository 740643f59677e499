//! Data models
//!
//! Shared between civic-server and its clients (via API).
//! Wire names are camelCase to match the persisted browser blobs.
//! All IDs are short opaque strings (see [`crate::util::short_id`]).

pub mod classification;
pub mod issue;
pub mod user;

// Re-exports
pub use classification::*;
pub use issue::*;
pub use user::*;

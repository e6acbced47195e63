//! dbu-content: static game-content tables.
//!
//! Typed kin, profession, skill and rules tables plus the bracket
//! lookups character derivation needs. Content is parsed from JSON,
//! validated once, and then treated as immutable data that callers pass
//! explicitly into every derivation call.
//!
//! Reading content files from disk is left to the caller; this crate only
//! parses strings and `serde_json::Value`s, and bundles the corebook
//! tables at compile time.

pub mod error;
pub mod load;
pub mod tables;
pub mod types;

pub use error::ContentError;
pub use load::{corebook, corebook_source, from_json, from_value, validate};
pub use tables::GameContent;
pub use types::*;

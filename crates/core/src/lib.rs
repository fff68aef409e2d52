//! `outpost-core`: identifiers and domain primitives shared by the access crates.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{IdentityId, LocationId};
pub use value_object::ValueObject;

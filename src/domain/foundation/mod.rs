//! Foundation module - Shared domain primitives.
//!
//! Contains value objects and error types that form the vocabulary
//! shared by every other domain module.

mod errors;
mod timestamp;

pub use errors::ValidationError;
pub use timestamp::Timestamp;

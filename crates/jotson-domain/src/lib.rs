//! jotson domain layer - business reference value objects
//!
//! This crate holds the pure domain vocabulary that the jotson serialization
//! engine operates on: references to business objects and their typed
//! identities. It has no I/O and no knowledge of the writer; the engine crate
//! attaches serialization strategies to these types from the outside.
//!
//! Value objects here are immutable after construction and compare by
//! identity attributes only (a reference is its id; the title is display
//! metadata).

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod value_objects;

pub use value_objects::{NumericReference, Reference, ReferenceId, UuidReference};

/// Domain Result type
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-specific errors
///
/// All domain errors are value types with no external dependencies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DomainError {
    /// A reference was constructed with an empty title
    #[error("reference title must not be empty")]
    EmptyTitle,
}

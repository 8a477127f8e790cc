//! Domain value objects
//!
//! Immutable objects that represent concepts in the domain with no
//! conceptual identity of their own beyond their attributes.

mod reference;

pub use reference::{NumericReference, Reference, ReferenceId, UuidReference};

//! Business object references
//!
//! A reference is a lightweight handle to some business entity: a primary
//! key plus a human-readable title. Two references to the same entity are
//! equal regardless of their titles; the title exists for display and
//! serialization only.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DomainError, DomainResult};

/// The primary key carried by a [`Reference`].
///
/// Keys are either numeric (sequence-assigned entities) or UUIDs
/// (distributed entities). The untagged serde representation keeps the
/// wire form a plain scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceId {
    /// Sequence-assigned numeric key
    Numeric(i64),
    /// Distributed UUID key
    Uuid(Uuid),
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceId::Numeric(n) => write!(f, "{n}"),
            ReferenceId::Uuid(u) => write!(f, "{u}"),
        }
    }
}

/// A reference to a business object in the system.
///
/// Object-safe so an open set of concrete reference types can share one
/// serialization strategy: any implementor exposes its key and title, and
/// the engine emits them uniformly.
pub trait Reference: fmt::Debug + Send + Sync + 'static {
    /// Primary key of the referenced entity.
    fn id(&self) -> ReferenceId;

    /// Human-readable title of the referenced entity.
    fn title(&self) -> &str;
}

/// The simplest [`Reference`]: a numeric primary key.
///
/// When no title is supplied, the decimal form of the key is used. Equality
/// and hashing consider the key only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericReference {
    id: i64,
    title: String,
}

impl NumericReference {
    /// Create a reference whose title is the decimal form of the key.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            title: id.to_string(),
        }
    }

    /// Create a reference with an explicit title.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTitle`] if `title` is empty.
    pub fn titled(id: i64, title: impl Into<String>) -> DomainResult<Self> {
        let title = title.into();
        if title.is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        Ok(Self { id, title })
    }

    /// The numeric key.
    pub fn numeric_id(&self) -> i64 {
        self.id
    }
}

impl Reference for NumericReference {
    fn id(&self) -> ReferenceId {
        ReferenceId::Numeric(self.id)
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl PartialEq for NumericReference {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NumericReference {}

impl Hash for NumericReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for NumericReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{id:{}, title:{}}}", self.id, self.title)
    }
}

/// A [`Reference`] keyed by UUID.
///
/// Equality and hashing consider the key only, like [`NumericReference`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UuidReference {
    id: Uuid,
    title: String,
}

impl UuidReference {
    /// Create a reference with a freshly generated key.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTitle`] if `title` is empty.
    pub fn new(title: impl Into<String>) -> DomainResult<Self> {
        Self::titled(Uuid::new_v4(), title)
    }

    /// Create a reference with an existing key.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyTitle`] if `title` is empty.
    pub fn titled(id: Uuid, title: impl Into<String>) -> DomainResult<Self> {
        let title = title.into();
        if title.is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        Ok(Self { id, title })
    }

    /// The UUID key.
    pub fn uuid(&self) -> Uuid {
        self.id
    }
}

impl Reference for UuidReference {
    fn id(&self) -> ReferenceId {
        ReferenceId::Uuid(self.id)
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl PartialEq for UuidReference {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UuidReference {}

impl Hash for UuidReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for UuidReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{id:{}, title:{}}}", self.id, self.title)
    }
}

//! Error types for jotson operations

use std::any::TypeId;

use crate::writer::FrameState;

/// Result type alias for jotson operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for jotson operations
///
/// Every variant surfaces synchronously at the call that triggered it.
/// A writer session that has produced any of these is poisoned: the output
/// sink holds a truncated document and the session must be discarded.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A structural method was invoked in a state that forbids it
    #[error("{operation} is not permitted while the writer is in the {state:?} state")]
    Protocol {
        /// The operation that was attempted
        operation: &'static str,
        /// The frame state that rejected it
        state: FrameState,
    },

    /// No serialization strategy applies to a value's runtime type
    #[error("no serialization strategy applies to {type_id:?}")]
    UnresolvedType {
        /// Type identity the resolution chain was exhausted for
        type_id: TypeId,
    },

    /// A resolved strategy failed while emitting a value
    #[error("serialization strategy failed: {message}")]
    Strategy {
        /// What the strategy was doing when it failed
        message: String,
        /// Underlying cause, when one exists
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The output sink raised an error; propagated verbatim, never retried
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a protocol violation error
    pub fn protocol(operation: &'static str, state: FrameState) -> Self {
        Self::Protocol { operation, state }
    }

    /// Create an unresolved type error
    pub fn unresolved(type_id: TypeId) -> Self {
        Self::UnresolvedType { type_id }
    }

    /// Create a strategy failure with a message only
    pub fn strategy(message: impl Into<String>) -> Self {
        Self::Strategy {
            message: message.into(),
            source: None,
        }
    }

    /// Create a strategy failure wrapping an underlying cause
    pub fn strategy_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Strategy {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// True for protocol violations
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }
}

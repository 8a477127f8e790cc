//! Streaming JSON writers
//!
//! A writer session turns a sequence of structural calls into JSON text on
//! an output sink, enforcing legal call order with an explicit state
//! machine. One session emits exactly one top-level value; sessions are
//! single-threaded by design and must not be shared across threads.

mod compact;
mod field_names;
mod frame;
mod indent;
mod pretty;

use std::any::Any;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{JsonContext, Result};

pub use compact::CompactJsonWriter;
pub use field_names::{BareFieldNames, FieldNameEncoder, QuotedFieldNames};
pub use frame::FrameState;
pub use indent::IndentCache;
pub use pretty::PrettyJsonWriter;

pub(crate) use field_names::quote;
pub(crate) use frame::FrameStack;

/// Spaces per nesting level when no configuration is supplied.
pub const DEFAULT_INDENT_FACTOR: usize = 2;

/// Formatting options for a writer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Spaces per nesting level in pretty output.
    pub indent_factor: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent_factor: DEFAULT_INDENT_FACTOR,
        }
    }
}

/// The structural operations a caller or a serialization strategy may
/// invoke on a writer session.
///
/// All operations fail with [`Error::Protocol`](crate::Error::Protocol)
/// when invoked in a state that cannot produce valid JSON; any error
/// poisons the session and leaves the sink truncated.
pub trait JsonWriter {
    /// Open an array at the current position.
    fn begin_array(&mut self) -> Result<()>;

    /// Close the innermost array.
    fn end_array(&mut self) -> Result<()>;

    /// Open an object at the current position.
    fn begin_object(&mut self) -> Result<()>;

    /// Close the innermost object.
    fn end_object(&mut self) -> Result<()>;

    /// Write one value: the top-level value, or the next array element, or
    /// the pending value of a two-phase property. `None` emits `null`;
    /// `Some` dispatches through the context's serializer resolution.
    fn write_value(&mut self, value: Option<&dyn Any>) -> Result<()>;

    /// Write one object property, name and value together.
    fn write_property(&mut self, name: &str, value: Option<&dyn Any>) -> Result<()>;

    /// Write a property name alone; exactly one structural or scalar write
    /// must follow before any other object-level operation.
    fn write_complex_property(&mut self, name: &str) -> Result<()>;

    /// Append an already-rendered token to the sink, bypassing the state
    /// machine. This is the strategy-facing surface: scalar strategies
    /// emit their token at the position a structural call prepared.
    fn write_raw(&mut self, token: &str) -> Result<()>;

    /// The resolution context this session serializes through.
    fn context(&self) -> &Arc<JsonContext>;
}

/// Typed conveniences over the object-safe [`JsonWriter`] surface.
pub trait JsonWriterExt: JsonWriter {
    /// Write a typed value.
    fn value<T: Any>(&mut self, value: &T) -> Result<()> {
        self.write_value(Some(value))
    }

    /// Write a `null` value.
    fn null_value(&mut self) -> Result<()> {
        self.write_value(None)
    }

    /// Write a typed property.
    fn property<T: Any>(&mut self, name: &str, value: &T) -> Result<()> {
        self.write_property(name, Some(value))
    }

    /// Write a property whose value is `null`.
    fn null_property(&mut self, name: &str) -> Result<()> {
        self.write_property(name, None)
    }
}

impl<W: JsonWriter + ?Sized> JsonWriterExt for W {}

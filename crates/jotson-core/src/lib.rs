//! # jotson
//!
//! Protocol-enforcing streaming JSON emission. A writer session converts
//! structural calls (begin/end array or object, write scalar, write
//! property) into well-formed JSON text, validating legal call order with
//! an explicit state machine; a shared serializer registry decides, for an
//! arbitrary runtime value, which serialization strategy applies.
//!
//! ## Sharing model
//!
//! A [`JsonContext`] is built once per serialization domain and shared
//! read-mostly across threads; its resolution cache tolerates concurrent
//! first use. A writer session is single-threaded mutable state: confine
//! one session to one thread, or serialize access externally. Any error
//! poisons the session and leaves the sink truncated; callers needing
//! atomicity write into a buffer and commit on [`finish`].
//!
//! ## Example
//!
//! ```
//! use jotson_rs::{JsonContext, JsonWriter, JsonWriterExt};
//!
//! # fn main() -> jotson_rs::Result<()> {
//! let ctx = JsonContext::standard();
//! let mut w = ctx.pretty_writer(Vec::new());
//! w.begin_object()?;
//! w.property("answer", &42i32)?;
//! w.end_object()?;
//! let out = String::from_utf8(w.finish()?).unwrap();
//! assert_eq!(out, "{\n  \"answer\": 42\n}");
//! # Ok(())
//! # }
//! ```
//!
//! [`finish`]: PrettyJsonWriter::finish

#![warn(rust_2018_idioms)]

pub mod context;
pub mod error;
pub mod registry;
pub mod writer;

pub use context::JsonContext;
pub use error::{Error, Result};
pub use registry::{JsonStrategy, ReferenceStrategy, SerializerRegistry, TypedStrategy, strategy_fn};
pub use writer::{
    BareFieldNames, CompactJsonWriter, DEFAULT_INDENT_FACTOR, FieldNameEncoder, FrameState,
    IndentCache, JsonWriter, JsonWriterExt, PrettyJsonWriter, QuotedFieldNames, WriterConfig,
};

// Domain layer re-exports
pub use jotson_domain::{NumericReference, Reference, ReferenceId, UuidReference};

/// Re-export of commonly used types
pub mod prelude {
    pub use super::{
        Error, JsonContext, JsonStrategy, JsonWriter, JsonWriterExt, NumericReference, Reference,
        ReferenceId, Result, SerializerRegistry, UuidReference, WriterConfig,
    };
}

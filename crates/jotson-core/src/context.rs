//! Serialization contexts
//!
//! A context bundles the serializer registry with the field-name policy
//! and hands out writer sessions. Contexts are constructed once per
//! serialization domain and shared read-mostly behind `Arc`; writer
//! sessions are cheap and per-use.

use std::io::Write;
use std::sync::Arc;

use jotson_domain::Reference;
use once_cell::sync::Lazy;

use crate::registry::{ReferenceStrategy, SerializerRegistry, register_standard};
use crate::writer::{
    CompactJsonWriter, FieldNameEncoder, PrettyJsonWriter, QuotedFieldNames, WriterConfig,
};

/// Registry plus field-name policy plus writer factories.
pub struct JsonContext {
    registry: SerializerRegistry,
    field_names: Arc<dyn FieldNameEncoder>,
    references: Arc<ReferenceStrategy>,
}

impl JsonContext {
    /// A context with the standard strategy set pre-registered: integer
    /// and float tokens, booleans, chars, strings, `serde_json::Value`
    /// trees, RFC 3339 timestamps, UUIDs, and the inherited reference
    /// marker covering [`NumericReference`](jotson_domain::NumericReference)
    /// and [`UuidReference`](jotson_domain::UuidReference).
    pub fn standard() -> Arc<Self> {
        Self::standard_with_field_names(Arc::new(QuotedFieldNames))
    }

    /// A standard context with a custom field-name policy.
    pub fn standard_with_field_names(field_names: Arc<dyn FieldNameEncoder>) -> Arc<Self> {
        let ctx = Self::bare(field_names);
        register_standard(&ctx.registry, &ctx.references);
        Arc::new(ctx)
    }

    /// A context with no registrations at all. Every strategy, marker,
    /// and reference view is the caller's to supply.
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::bare(Arc::new(QuotedFieldNames)))
    }

    fn bare(field_names: Arc<dyn FieldNameEncoder>) -> Self {
        Self {
            registry: SerializerRegistry::new(),
            field_names,
            references: Arc::new(ReferenceStrategy::new()),
        }
    }

    /// The process-wide shared default context.
    pub fn global() -> &'static Arc<JsonContext> {
        static GLOBAL: Lazy<Arc<JsonContext>> = Lazy::new(JsonContext::standard);
        &GLOBAL
    }

    /// The serializer registry of this context.
    pub fn registry(&self) -> &SerializerRegistry {
        &self.registry
    }

    /// The field-name policy writers of this context use.
    pub fn field_names(&self) -> &Arc<dyn FieldNameEncoder> {
        &self.field_names
    }

    /// Route a concrete reference type through the shared reference
    /// strategy: registers the upcast view, the ancestor edge to
    /// `dyn Reference`, and (idempotently) the inherited marker itself.
    pub fn register_reference<T: Reference>(&self) {
        let marker: Arc<dyn crate::registry::JsonStrategy> = self.references.clone();
        self.registry.annotate::<dyn Reference>(marker, true);
        self.references.add_view::<T>();
        self.registry
            .link_ancestors::<T>(&[std::any::TypeId::of::<dyn Reference>()]);
    }

    /// Start a pretty-printing writer session on `out`.
    pub fn pretty_writer<W: Write>(self: &Arc<Self>, out: W) -> PrettyJsonWriter<W> {
        PrettyJsonWriter::new(Arc::clone(self), out)
    }

    /// Start a pretty-printing session with explicit formatting options.
    pub fn pretty_writer_with<W: Write>(
        self: &Arc<Self>,
        config: WriterConfig,
        out: W,
    ) -> PrettyJsonWriter<W> {
        PrettyJsonWriter::with_config(Arc::clone(self), config, out)
    }

    /// Start a compact writer session on `out`.
    pub fn compact_writer<W: Write>(self: &Arc<Self>, out: W) -> CompactJsonWriter<W> {
        CompactJsonWriter::new(Arc::clone(self), out)
    }
}

impl std::fmt::Debug for JsonContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonContext")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

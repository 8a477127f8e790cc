//! The standard strategy set
//!
//! Scalar strategies render their token and append it raw; the
//! `serde_json::Value` strategy drives the writer structurally, resolving
//! each nested element back through the registry. References serialize
//! through one shared trait-level strategy selected by the inherited
//! marker on `dyn Reference`.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jotson_domain::{NumericReference, Reference, ReferenceId, UuidReference};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::registry::{JsonStrategy, SerializerRegistry};
use crate::writer::{JsonWriter, quote};
use crate::{Error, Result};

/// Populate `registry` with the standard strategies and wire the shared
/// reference strategy as the inherited marker for `dyn Reference`.
pub(crate) fn register_standard(
    registry: &SerializerRegistry,
    references: &Arc<ReferenceStrategy>,
) {
    macro_rules! display_token {
        ($($t:ty),* $(,)?) => {
            $(registry.register_fn::<$t, _>(|v, w| w.write_raw(&v.to_string()));)*
        };
    }
    display_token!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

    macro_rules! float_token {
        ($($t:ty),* $(,)?) => {
            $(registry.register_fn::<$t, _>(|v, w| {
                // JSON has no token for NaN or infinities.
                if v.is_finite() {
                    w.write_raw(&v.to_string())
                } else {
                    w.write_raw("null")
                }
            });)*
        };
    }
    float_token!(f32, f64);

    registry.register_fn::<bool, _>(|v, w| w.write_raw(if *v { "true" } else { "false" }));
    registry.register_fn::<char, _>(|v, w| w.write_raw(&quote(&v.to_string())));
    registry.register_fn::<String, _>(|v, w| w.write_raw(&quote(v)));
    registry.register_fn::<&'static str, _>(|v, w| w.write_raw(&quote(v)));

    registry.register::<serde_json::Value>(Arc::new(JsonValueStrategy));
    registry.register_fn::<DateTime<Utc>, _>(|v, w| w.write_raw(&quote(&v.to_rfc3339())));
    registry.register_fn::<Uuid, _>(|v, w| w.write_raw(&quote(&v.to_string())));

    let marker: Arc<dyn JsonStrategy> = references.clone();
    registry.annotate::<dyn Reference>(marker, true);
    references.add_view::<NumericReference>();
    registry.link_ancestors::<NumericReference>(&[TypeId::of::<dyn Reference>()]);
    references.add_view::<UuidReference>();
    registry.link_ancestors::<UuidReference>(&[TypeId::of::<dyn Reference>()]);
}

/// Emits pre-built `serde_json::Value` trees through the structural
/// surface; every nested element resolves back through the registry.
struct JsonValueStrategy;

impl JsonStrategy for JsonValueStrategy {
    fn serialize(&self, value: &dyn Any, writer: &mut dyn JsonWriter) -> Result<()> {
        let value = value
            .downcast_ref::<serde_json::Value>()
            .ok_or_else(|| Error::strategy("value is not a serde_json::Value"))?;
        emit_json(value, writer)
    }
}

fn emit_json(value: &serde_json::Value, writer: &mut dyn JsonWriter) -> Result<()> {
    use serde_json::Value;

    match value {
        Value::Null => writer.write_raw("null"),
        Value::Bool(b) => writer.write_raw(if *b { "true" } else { "false" }),
        Value::Number(n) => writer.write_raw(&n.to_string()),
        Value::String(s) => writer.write_raw(&quote(s)),
        Value::Array(items) => {
            writer.begin_array()?;
            for item in items {
                writer.write_value(Some(item))?;
            }
            writer.end_array()
        }
        Value::Object(members) => {
            writer.begin_object()?;
            for (name, member) in members {
                writer.write_property(name, Some(member))?;
            }
            writer.end_object()
        }
    }
}

/// Monomorphized upcast from an erased value to the reference view.
type ReferenceView = for<'a> fn(&'a dyn Any) -> Option<&'a dyn Reference>;

fn view_as<T: Reference>(value: &dyn Any) -> Option<&dyn Reference> {
    value.downcast_ref::<T>().map(|v| v as &dyn Reference)
}

/// Shared strategy for every [`Reference`] implementor.
///
/// Emits `{"id": …, "title": …}` for any registered reference kind. The
/// view table holds one upcast per concrete type, captured statically when
/// the type is registered; resolution still returns this one strategy for
/// the whole family via the inherited marker on `dyn Reference`.
pub struct ReferenceStrategy {
    views: RwLock<HashMap<TypeId, ReferenceView>>,
}

impl ReferenceStrategy {
    /// Create a strategy with an empty view table.
    pub fn new() -> Self {
        Self {
            views: RwLock::new(HashMap::new()),
        }
    }

    /// Register the upcast for a concrete reference type.
    pub fn add_view<T: Reference>(&self) {
        self.views.write().insert(TypeId::of::<T>(), view_as::<T>);
    }

    fn view<'a>(&self, value: &'a dyn Any) -> Option<&'a dyn Reference> {
        let views = self.views.read();
        let upcast = views.get(&value.type_id())?;
        upcast(value)
    }
}

impl Default for ReferenceStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonStrategy for ReferenceStrategy {
    fn serialize(&self, value: &dyn Any, writer: &mut dyn JsonWriter) -> Result<()> {
        let reference = self
            .view(value)
            .ok_or_else(|| Error::strategy("no reference view registered for this type"))?;
        writer.begin_object()?;
        match reference.id() {
            ReferenceId::Numeric(id) => writer.write_property("id", Some(&id))?,
            ReferenceId::Uuid(id) => writer.write_property("id", Some(&id))?,
        }
        let title = reference.title().to_owned();
        writer.write_property("title", Some(&title))?;
        writer.end_object()
    }
}

//! Serializer resolution
//!
//! Maps a value's runtime type to the strategy that serializes it.
//! Lookup order, first match wins: exact explicit registration, marker on
//! the type itself, breadth-first walk of declared ancestors (inherited
//! markers only), registered fallback. Each concrete type is resolved once
//! and cached for the lifetime of the registry.

mod builtin;
mod strategy;

use std::any::TypeId;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::writer::JsonWriter;
use crate::{Error, Result};

pub use builtin::ReferenceStrategy;
pub use strategy::{JsonStrategy, TypedStrategy, strategy_fn};

pub(crate) use builtin::register_standard;

struct MarkerRecord {
    strategy: Arc<dyn JsonStrategy>,
    inherited: bool,
}

/// Registry mapping type identities to serialization strategies.
///
/// Registration tables are read-mostly: a context is populated once per
/// serialization domain and then shared across many writer sessions. The
/// resolution cache tolerates concurrent first-resolution of the same type;
/// lookup is a pure function of the tables, so racing inserts store the
/// same `Arc` and are harmless.
pub struct SerializerRegistry {
    explicit: RwLock<HashMap<TypeId, Arc<dyn JsonStrategy>>>,
    markers: RwLock<HashMap<TypeId, MarkerRecord>>,
    ancestry: RwLock<HashMap<TypeId, Vec<TypeId>>>,
    fallback: RwLock<Option<Arc<dyn JsonStrategy>>>,
    cache: DashMap<TypeId, Arc<dyn JsonStrategy>>,
}

impl SerializerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            explicit: RwLock::new(HashMap::new()),
            markers: RwLock::new(HashMap::new()),
            ancestry: RwLock::new(HashMap::new()),
            fallback: RwLock::new(None),
            cache: DashMap::new(),
        }
    }

    /// Register an explicit strategy for the concrete type `T`.
    ///
    /// Explicit registrations take precedence over every marker.
    pub fn register<T: 'static>(&self, strategy: Arc<dyn JsonStrategy>) {
        debug!(ty = std::any::type_name::<T>(), "registered strategy");
        self.explicit.write().insert(TypeId::of::<T>(), strategy);
    }

    /// Register a typed closure as the explicit strategy for `T`.
    pub fn register_fn<T, F>(&self, f: F)
    where
        T: 'static,
        F: Fn(&T, &mut dyn JsonWriter) -> Result<()> + Send + Sync + 'static,
    {
        self.register::<T>(strategy_fn(f));
    }

    /// Attach a marker to a type: "serialize values of this type with this
    /// strategy". `T` may be a concrete type or a trait object type such
    /// as `dyn Reference`. With `inherited` set, the marker also applies
    /// to every type that declares `T` among its ancestors.
    pub fn annotate<T: ?Sized + 'static>(&self, strategy: Arc<dyn JsonStrategy>, inherited: bool) {
        debug!(
            ty = std::any::type_name::<T>(),
            inherited, "registered marker"
        );
        self.markers
            .write()
            .insert(TypeId::of::<T>(), MarkerRecord { strategy, inherited });
    }

    /// Declare the ancestors of `T`, most specific first. The resolution
    /// walk visits them breadth-first, then their own declared ancestors.
    /// `T` may itself be a trait object type, so hierarchies deeper than
    /// one level can be declared edge by edge.
    pub fn link_ancestors<T: ?Sized + 'static>(&self, ancestors: &[TypeId]) {
        self.ancestry
            .write()
            .insert(TypeId::of::<T>(), ancestors.to_vec());
    }

    /// Register the strategy used when the whole lookup chain comes up
    /// empty.
    pub fn set_fallback(&self, strategy: Arc<dyn JsonStrategy>) {
        *self.fallback.write() = Some(strategy);
    }

    /// Resolve the strategy for a type identity.
    ///
    /// The first successful resolution of each type is cached; later calls
    /// return the same `Arc`.
    ///
    /// # Errors
    ///
    /// [`Error::UnresolvedType`] when no registration, marker, ancestor
    /// marker, or fallback applies.
    pub fn resolve(&self, type_id: TypeId) -> Result<Arc<dyn JsonStrategy>> {
        if let Some(hit) = self.cache.get(&type_id) {
            return Ok(Arc::clone(hit.value()));
        }
        let resolved = self.lookup(type_id)?;
        // Racing first resolutions insert clones of the same Arc.
        self.cache.insert(type_id, Arc::clone(&resolved));
        Ok(resolved)
    }

    /// Resolve the strategy for `T`.
    pub fn resolve_for<T: ?Sized + 'static>(&self) -> Result<Arc<dyn JsonStrategy>> {
        self.resolve(TypeId::of::<T>())
    }

    fn lookup(&self, type_id: TypeId) -> Result<Arc<dyn JsonStrategy>> {
        if let Some(strategy) = self.explicit.read().get(&type_id) {
            trace!(?type_id, "resolved via explicit registration");
            return Ok(Arc::clone(strategy));
        }

        let markers = self.markers.read();
        if let Some(record) = markers.get(&type_id) {
            trace!(?type_id, "resolved via direct marker");
            return Ok(Arc::clone(&record.strategy));
        }

        let ancestry = self.ancestry.read();
        let mut queue: VecDeque<TypeId> = ancestry
            .get(&type_id)
            .map(|parents| parents.iter().copied().collect())
            .unwrap_or_default();
        let mut seen: HashSet<TypeId> = HashSet::new();
        while let Some(ancestor) = queue.pop_front() {
            if !seen.insert(ancestor) {
                continue;
            }
            if let Some(record) = markers.get(&ancestor) {
                if record.inherited {
                    trace!(?type_id, ?ancestor, "resolved via inherited marker");
                    return Ok(Arc::clone(&record.strategy));
                }
            }
            if let Some(parents) = ancestry.get(&ancestor) {
                queue.extend(parents.iter().copied());
            }
        }
        drop(markers);
        drop(ancestry);

        if let Some(fallback) = self.fallback.read().as_ref() {
            trace!(?type_id, "resolved via fallback");
            return Ok(Arc::clone(fallback));
        }

        trace!(?type_id, "resolution chain exhausted");
        Err(Error::unresolved(type_id))
    }
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("explicit", &self.explicit.read().len())
            .field("markers", &self.markers.read().len())
            .field("cached", &self.cache.len())
            .finish()
    }
}

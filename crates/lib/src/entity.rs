//! Immutable state nodes.
//!
//! An [`Entity`] is the value container stored at one path identifier. It
//! holds a property map, the generation at which it was last registered and a
//! weak back-reference to the [`Store`] that owns it.
//!
//! Entities are never changed in place. Every write produces a new entity
//! and, when the entity is bound to a store, registers it there so that the
//! node and all of its ancestors are restamped with a fresh generation. Old
//! handles stay valid as snapshots.
//!
//! An entity that is not bound to a store is a *detached template*: it can
//! carry values, but navigating to other nodes fails with
//! [`StoreError::Detached`].

use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use serde_json::Map;

use crate::{
    Result,
    constants::{DEFAULT_KEY, POJO_KEY},
    path::{self, Part},
    store::{Store, StoreError, WeakStore},
    value::{Data, Value},
};

/// Property map of an entity, in insertion order.
pub type Values = IndexMap<String, Value>;

/// Requested changes to an entity.
///
/// Fields left as `None` keep the entity's current value. A mutation that
/// carries a `store` is a store-initiated restamp and is never registered
/// back into the store.
#[derive(Debug, Default, Clone)]
pub struct Mutation {
    pub generation: Option<u64>,
    pub store: Option<WeakStore>,
    pub values: Option<Arc<Values>>,
}

struct EntityInternal {
    id: String,
    store: Option<WeakStore>,
    generation: u64,
    values: Arc<Values>,
}

/// An immutable node of a [`Store`].
///
/// Cloning an `Entity` clones the handle; `==` is identity of the underlying
/// node, so two handles are equal exactly when no write happened between
/// them.
#[derive(Clone)]
pub struct Entity {
    inner: Arc<EntityInternal>,
}

impl Entity {
    fn build(id: String, store: Option<WeakStore>, generation: u64, values: Arc<Values>) -> Self {
        Entity {
            inner: Arc::new(EntityInternal {
                id,
                store,
                generation,
                values,
            }),
        }
    }

    /// Creates a detached template with no values.
    pub fn create(id: impl Into<String>) -> Result<Entity> {
        Self::create_with(id, std::iter::empty::<(String, Value)>())
    }

    /// Creates a detached template carrying `values`.
    ///
    /// The root id is reserved for the store's own root and is rejected, as
    /// are identifiers with empty segments.
    pub fn create_with<I, K, V>(id: impl Into<String>, values: I) -> Result<Entity>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let id = id.into();
        if id.is_empty() {
            return Err(StoreError::invalid_argument("a state requires a non-empty id").into());
        }
        path::validate_id(&id)?;
        let values = values
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Ok(Self::build(id, None, 0, Arc::new(values)))
    }

    /// Builds an unvalidated, unbound node; used for ancestors the store fills in.
    pub(crate) fn blank(id: &str) -> Entity {
        Self::build(id.to_owned(), None, 0, Arc::default())
    }

    /// Builds a root node bound to `store`.
    pub(crate) fn root(store: WeakStore, generation: u64, values: Arc<Values>) -> Entity {
        Self::build(String::new(), Some(store), generation, values)
    }

    /// The path identifier of this node.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The store generation at which this node was last registered.
    pub fn generation(&self) -> u64 {
        self.inner.generation
    }

    /// The property map.
    pub fn values(&self) -> &Arc<Values> {
        &self.inner.values
    }

    /// The owning store, if it is still alive.
    pub fn store(&self) -> Option<Store> {
        self.inner.store.as_ref().and_then(WeakStore::upgrade)
    }

    pub(crate) fn weak_store(&self) -> Option<&WeakStore> {
        self.inner.store.as_ref()
    }

    /// Whether this node is bound to a store (alive or not).
    pub fn is_bound(&self) -> bool {
        self.inner.store.is_some()
    }

    pub fn is_root(&self) -> bool {
        self.inner.id.is_empty()
    }

    /// Reads a property.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.values.get(key)
    }

    /// Reads the node's direct value, stored under the empty key.
    pub fn value(&self) -> Option<&Value> {
        self.get(DEFAULT_KEY)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.values.contains_key(key)
    }

    /// Whether the node has any properties at all.
    pub fn has_values(&self) -> bool {
        !self.inner.values.is_empty()
    }

    /// A plain, caller-owned copy of the node's data.
    ///
    /// Collection elements that carried structured data keep it verbatim in a
    /// `pojo` property; when present, that is what is returned. Otherwise this
    /// is a shallow copy of the property map.
    pub fn get_pojo(&self) -> Map<String, Data> {
        if let Some(Data::Object(pojo)) = self.get(POJO_KEY).map(Value::to_data) {
            return pojo;
        }
        self.to_map()
    }

    fn to_map(&self) -> Map<String, Data> {
        self.inner
            .values
            .iter()
            .map(|(key, value)| (key.clone(), value.to_data()))
            .collect()
    }

    /// The property map rendered as a JSON object.
    pub fn to_data(&self) -> Data {
        Data::Object(self.to_map())
    }

    /// Applies a [`Mutation`].
    ///
    /// Returns this very entity when nothing would change. Otherwise a new
    /// entity is built; if it is bound to a store and the mutation did not
    /// name a store itself, it is registered there, which restamps it and
    /// its ancestors with a new generation.
    pub fn with(&self, mutation: Mutation) -> Result<Entity> {
        let register = mutation.store.is_none();
        let generation = mutation.generation.unwrap_or(self.inner.generation);
        let store = mutation.store.or_else(|| self.inner.store.clone());
        let values = mutation
            .values
            .unwrap_or_else(|| Arc::clone(&self.inner.values));

        let same_store = match (&store, &self.inner.store) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        };
        if generation == self.inner.generation
            && same_store
            && Arc::ptr_eq(&values, &self.inner.values)
        {
            return Ok(self.clone());
        }

        let next = Self::build(self.inner.id.clone(), store, generation, values);
        if !register {
            return Ok(next);
        }
        match &next.inner.store {
            Some(weak) => {
                let store = weak.upgrade().ok_or_else(|| StoreError::Detached {
                    id: next.inner.id.clone(),
                })?;
                store.set_state(next)
            }
            None => Ok(next),
        }
    }

    /// Applies a batch of property changes.
    ///
    /// `None` removes the key. Values are compared by identity (scalars by
    /// value), so rewriting a key with the same content is not a change. If
    /// nothing changes the same entity is returned.
    pub fn with_values<I, K>(&self, changes: I) -> Result<Entity>
    where
        I: IntoIterator<Item = (K, Option<Value>)>,
        K: Into<String>,
    {
        let mut next: Option<Values> = None;
        for (key, change) in changes {
            let key = key.into();
            let differs = {
                let current = next.as_ref().unwrap_or(self.inner.values.as_ref());
                match (current.get(&key), &change) {
                    (Some(old), Some(new)) => !old.is_same(new),
                    (None, None) => false,
                    _ => true,
                }
            };
            if !differs {
                continue;
            }
            let values = next.get_or_insert_with(|| self.inner.values.as_ref().clone());
            match change {
                Some(value) => {
                    values.insert(key, value);
                }
                None => {
                    values.shift_remove(&key);
                }
            }
        }

        match next {
            Some(values) => self.with(Mutation {
                values: Some(Arc::new(values)),
                ..Mutation::default()
            }),
            None => Ok(self.clone()),
        }
    }

    /// Sets or removes a single property.
    pub fn with_value(&self, key: impl Into<String>, value: Option<Value>) -> Result<Entity> {
        self.with_values([(key.into(), value)])
    }

    /// Sets a property.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Result<Entity> {
        self.with_value(key, Some(value.into()))
    }

    /// Sets the node's direct value.
    pub fn set_value(&self, value: impl Into<Value>) -> Result<Entity> {
        self.set(DEFAULT_KEY, value)
    }

    /// Sets several properties under a single generation.
    pub fn set_values<I, K, V>(&self, pairs: I) -> Result<Entity>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.with_values(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), Some(value.into()))),
        )
    }

    /// Removes a property.
    pub fn unset(&self, key: impl Into<String>) -> Result<Entity> {
        self.with_value(key, None)
    }

    fn live_store(&self) -> Result<Store> {
        self.store().ok_or_else(|| {
            StoreError::Detached {
                id: self.inner.id.clone(),
            }
            .into()
        })
    }

    /// Resolves `part` against this node.
    fn resolve(&self, part: Part) -> String {
        if part.is_self() {
            self.inner.id.clone()
        } else {
            path::child_id(&self.inner.id, &part.as_segment())
        }
    }

    /// Returns the child at `part`, creating it if needed.
    ///
    /// The empty name and `"*"` resolve to this node's current registration.
    pub fn select(&self, part: impl Into<Part>) -> Result<Entity> {
        let store = self.live_store()?;
        store.select(&self.resolve(part.into()))
    }

    /// Returns the child at `part` if it exists.
    pub fn find(&self, part: impl Into<Part>) -> Result<Option<Entity>> {
        let store = self.live_store()?;
        Ok(store.find(&self.resolve(part.into())))
    }

    /// Removes the child at `part` together with its subtree.
    pub fn remove(&self, part: impl Into<Part>) -> Result<bool> {
        let store = self.live_store()?;
        Ok(store.remove(&self.resolve(part.into())))
    }

    /// Whether the node at `part` exists and holds values or children.
    pub fn any(&self, part: impl Into<Part>) -> Result<bool> {
        let store = self.live_store()?;
        let id = self.resolve(part.into());
        Ok(match store.find(&id) {
            Some(node) => node.has_values() || store.has_children(&id),
            None => false,
        })
    }

    /// Whether the node at `part` exists.
    pub fn exists(&self, part: impl Into<Part>) -> Result<bool> {
        Ok(self.find(part)?.is_some())
    }

    /// Appends an indexed child after the largest existing index.
    pub fn add(&self) -> Result<Entity> {
        let store = self.live_store()?;
        let next = store
            .get_index_keys(&self.inner.id)
            .iter()
            .filter_map(|key| path::parse_index(key))
            .max()
            .map_or(0, |max| max + 1);
        store.select(&path::child_id(&self.inner.id, &next.to_string()))
    }

    /// Reads `key` from this node or the nearest ancestor that has it.
    ///
    /// Ancestors are looked up in the owning store, so their latest
    /// registration is consulted.
    pub fn get_inherited(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.get(key) {
            return Some(value.clone());
        }
        let store = self.store()?;
        let mut id = path::parent_id(&self.inner.id);
        while let Some(current) = id {
            if let Some(value) = store.find(current).and_then(|node| node.get(key).cloned()) {
                return Some(value);
            }
            id = path::parent_id(current);
        }
        None
    }

    /// Whether a consumer that last saw `generation` should refresh.
    ///
    /// With no generation the answer is always yes; otherwise it is yes when
    /// `generation` is not newer than this node's.
    pub fn should_update(&self, generation: Option<u64>) -> bool {
        generation.is_none_or(|seen| seen <= self.inner.generation)
    }

    /// The last segment of this node's id.
    pub fn key(&self) -> &str {
        path::leaf_id(self.inner.id.as_str()).unwrap_or_default()
    }

    pub fn parent_id(&self) -> Option<&str> {
        path::parent_id(&self.inner.id)
    }

    /// Keys of the direct children, in registration order.
    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.live_store()?.get_keys(&self.inner.id))
    }

    /// Index keys of the direct children, ordered numerically.
    pub fn index_keys(&self) -> Result<Vec<String>> {
        Ok(self.live_store()?.get_index_keys(&self.inner.id))
    }

    /// Arity keys among this node's siblings, itself included.
    ///
    /// The root has no siblings.
    pub fn arities(&self) -> Result<Vec<String>> {
        let store = self.live_store()?;
        Ok(match self.parent_id() {
            Some(parent) => store.get_arities(parent),
            None => Vec::new(),
        })
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Entity) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Entity {}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.inner.id)
            .field("generation", &self.inner.generation)
            .field("bound", &self.inner.store.is_some())
            .field("values", &self.inner.values)
            .finish()
    }
}

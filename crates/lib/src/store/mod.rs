//! The node store.
//!
//! A [`Store`] owns a flat, insertion-ordered map from path identifier to
//! [`Entity`], plus the monotonic generation counter that stamps every
//! registration. The map is always ancestor-closed: registering `a.b.c`
//! makes sure `a` and `a.b` exist, creating them empty if needed.
//!
//! Registering a node restamps it *and every ancestor up to the root* with a
//! freshly bumped generation, so a consumer holding any node on the path can
//! detect the change with [`Entity::should_update`].

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use handle_trait::Handle;
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
    Result,
    constants::{ARITY_MARKER, ROOT_ID},
    entity::{Entity, Mutation, Values},
    path, reconcile,
    value::{Data, Value},
};

mod errors;
pub use errors::StoreError;

mod props;
pub use props::Props;

struct StoreState {
    generation: u64,
    root: Entity,
    /// Every non-root node, in registration order
    states: IndexMap<String, Entity>,
}

impl StoreState {
    fn find(&self, id: &str) -> Option<&Entity> {
        if id.is_empty() {
            Some(&self.root)
        } else {
            self.states.get(id)
        }
    }

    fn patch(&mut self, entity: Entity) {
        if entity.is_root() {
            self.root = entity;
        } else {
            self.states.insert(entity.id().to_owned(), entity);
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}

/// Private internal state for Store.
pub(crate) struct StoreInternal {
    id: String,
    state: Mutex<StoreState>,
}

impl fmt::Debug for StoreInternal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("StoreInternal")
            .field("id", &self.id)
            .field("generation", &state.generation)
            .field("states", &format!("<{} states>", state.states.len()))
            .finish()
    }
}

/// In-memory hierarchical state store.
///
/// Store is a cheap-to-clone handle around `Arc<StoreInternal>`. Entities
/// keep a [`WeakStore`] back to it, so a store is dropped once the last
/// strong handle goes away even if entities outlive it.
///
/// ## Example
///
/// ```
/// # use electrum_store::Store;
/// let store = Store::create("app");
/// let title = store.select("page.title")?.set_value("Hello")?;
///
/// assert_eq!(title.value().unwrap(), "Hello");
/// assert_eq!(store.generation(), 2);
/// assert!(store.find("page").is_some());
/// # Ok::<(), electrum_store::Error>(())
/// ```
#[derive(Clone, Debug, Handle)]
pub struct Store {
    inner: Arc<StoreInternal>,
}

/// Weak reference to a Store.
///
/// This is the back-reference every bound [`Entity`] carries. It does not
/// keep the Store alive.
#[derive(Clone, Debug, Handle)]
pub struct WeakStore {
    inner: Weak<StoreInternal>,
}

impl Store {
    /// Creates an empty store labelled `id`.
    pub fn create(id: impl Into<String>) -> Store {
        Self::create_with(id, std::iter::empty::<(String, Value)>())
    }

    /// Creates a store whose root starts out with `root_values`.
    pub fn create_with<I, K, V>(id: impl Into<String>, root_values: I) -> Store
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let id = id.into();
        let values: Values = root_values
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        let inner = Arc::new_cyclic(|weak| StoreInternal {
            id,
            state: Mutex::new(StoreState {
                generation: 0,
                root: Entity::root(
                    WeakStore {
                        inner: weak.clone(),
                    },
                    0,
                    Arc::new(values),
                ),
                states: IndexMap::new(),
            }),
        });
        Store { inner }
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The label given at creation.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The current generation.
    pub fn generation(&self) -> u64 {
        self.state().generation
    }

    /// The current root node.
    pub fn root(&self) -> Entity {
        self.state().root.clone()
    }

    /// Number of registered nodes, not counting the root.
    pub fn state_count(&self) -> usize {
        self.state().states.len()
    }

    /// Snapshot of every node, root first, then in registration order.
    pub fn entities(&self) -> Vec<Entity> {
        let state = self.state();
        std::iter::once(state.root.clone())
            .chain(state.states.values().cloned())
            .collect()
    }

    /// Returns the node at `id` if it is registered.
    pub fn find(&self, id: &str) -> Option<Entity> {
        self.state().find(id).cloned()
    }

    /// Returns the node at `id`, creating and registering it when missing.
    pub fn select(&self, id: &str) -> Result<Entity> {
        if let Some(entity) = self.find(id) {
            return Ok(entity);
        }
        self.set_state(Entity::create(id)?)
    }

    /// Registers a fresh, empty node at `id`.
    pub fn set_state_id(&self, id: &str) -> Result<Entity> {
        self.set_state(Entity::create(id)?)
    }

    /// Registers `entity`.
    ///
    /// Registering the node that is already stored is a no-op. Otherwise the
    /// generation is bumped and the entity, plus every ancestor up to the
    /// root, is restamped with it and bound to this store. Missing ancestors
    /// are created empty. Returns the stored node.
    pub fn set_state(&self, entity: Entity) -> Result<Entity> {
        let id = entity.id().to_owned();
        if id.is_empty() && !entity.weak_store().is_some_and(|weak| weak.points_to(self)) {
            return Err(StoreError::invalid_argument(
                "the root state can only be replaced through the store that owns it",
            )
            .into());
        }
        path::validate_id(&id)?;

        let weak = self.downgrade();
        let mut state = self.state();
        if state.find(&id).is_some_and(|current| *current == entity) {
            return Ok(entity);
        }

        let generation = state.next_generation();
        let restamp = |node: &Entity| {
            node.with(Mutation {
                generation: Some(generation),
                store: Some(weak.clone()),
                values: None,
            })
        };

        let mut ancestors = Vec::new();
        let mut parent = path::parent_id(&id);
        while let Some(ancestor) = parent {
            ancestors.push(ancestor);
            parent = path::parent_id(ancestor);
        }
        for ancestor in ancestors.into_iter().rev() {
            let node = match state.find(ancestor) {
                Some(existing) => restamp(existing)?,
                None => restamp(&Entity::blank(ancestor))?,
            };
            state.patch(node);
        }

        let stored = restamp(&entity)?;
        state.patch(stored.clone());
        trace!(store = %self.inner.id, id = %id, generation, "Registered state");
        Ok(stored)
    }

    /// Removes the node at `id` and its whole subtree.
    ///
    /// Removing the root clears the store. Returns `false`, without touching
    /// the generation, when nothing is registered at `id`.
    pub fn remove(&self, id: &str) -> bool {
        if id.is_empty() {
            return self.clear();
        }
        let mut state = self.state();
        if !state.states.contains_key(id) {
            return false;
        }
        let generation = state.next_generation();
        let before = state.states.len();
        state
            .states
            .retain(|key, _| key != id && !path::is_descendant_of(key, id));
        debug!(
            store = %self.inner.id,
            id,
            generation,
            removed = before - state.states.len(),
            "Removed state subtree"
        );
        true
    }

    /// Drops every node and replaces the root with an empty one.
    pub fn clear(&self) -> bool {
        let weak = self.downgrade();
        let mut state = self.state();
        let generation = state.next_generation();
        state.states.clear();
        state.root = Entity::root(weak, generation, Arc::default());
        debug!(store = %self.inner.id, generation, "Cleared store");
        true
    }

    /// Restamps every node, the root included, with one new generation.
    ///
    /// Values are left untouched; this only forces every consumer to treat
    /// its view as stale.
    pub fn mutate_all(&self) -> Result<()> {
        let weak = self.downgrade();
        let mut state = self.state();
        let generation = state.next_generation();
        let mutation = Mutation {
            generation: Some(generation),
            store: Some(weak),
            values: None,
        };
        let root = state.root.with(mutation.clone())?;
        state.root = root;
        for entity in state.states.values_mut() {
            *entity = entity.with(mutation.clone())?;
        }
        debug!(store = %self.inner.id, generation, count = state.states.len(), "Restamped all states");
        Ok(())
    }

    /// Ids of the direct children of `start`.
    ///
    /// With no starting point the only id is the root's.
    pub fn get_ids(&self, start: Option<&str>) -> Vec<String> {
        let Some(start) = start else {
            return vec![ROOT_ID.to_owned()];
        };
        self.state()
            .states
            .keys()
            .filter(|id| path::child_leaf(id, start).is_some())
            .cloned()
            .collect()
    }

    /// Leaf keys of the direct children of `start`, in registration order.
    pub fn get_keys(&self, start: &str) -> Vec<String> {
        self.state()
            .states
            .keys()
            .filter_map(|id| path::child_leaf(id, start))
            .map(str::to_owned)
            .collect()
    }

    /// Index keys of the direct children of `start`, ordered numerically.
    ///
    /// Each key keeps its own notation (`1`, `[1]` or `_1`).
    pub fn get_index_keys(&self, start: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .get_keys(start)
            .into_iter()
            .filter(|key| path::is_index(key))
            .collect();
        keys.sort_by(|a, b| path::compare_index_keys(a, b));
        keys
    }

    /// Ids of the indexed direct children of `start`, ordered numerically.
    pub fn get_index_ids(&self, start: &str) -> Vec<String> {
        self.get_index_keys(start)
            .iter()
            .map(|key| path::child_id(start, key))
            .collect()
    }

    /// Arity keys of the direct children of `start`.
    ///
    /// These are the leaves containing the `$` marker, ordered by length then
    /// lexicographically, so `a$2` comes before `a$10`.
    pub fn get_arities(&self, start: &str) -> Vec<String> {
        let mut arities: Vec<String> = self
            .get_keys(start)
            .into_iter()
            .filter(|key| key.contains(ARITY_MARKER))
            .collect();
        arities.sort_by(|a, b| path::compare_arity_keys(a, b));
        arities
    }

    /// Whether any node is registered directly below `id`.
    pub fn has_children(&self, id: &str) -> bool {
        self.state()
            .states
            .keys()
            .any(|key| path::child_leaf(key, id).is_some())
    }

    /// Merges plain data into the tree at `id`. See [`reconcile::apply`].
    pub fn apply(&self, id: &str, data: &Data) -> Result<()> {
        reconcile::apply(self, id, data)
    }

    /// Same as [`Store::apply`].
    pub fn merge(&self, id: &str, data: &Data) -> Result<()> {
        reconcile::merge(self, id, data)
    }

    /// Reconciles a collection at `id`. See [`reconcile::apply_collection`].
    pub fn apply_collection(&self, id: &str, data: Option<&Data>, default_key: &str) -> Result<()> {
        reconcile::apply_collection(self, id, data, default_key)
    }

    /// Reconciles a change set at `id`. See [`reconcile::apply_changes`].
    pub fn apply_changes(&self, id: &str, data: Option<&Data>, default_key: &str) -> Result<()> {
        reconcile::apply_changes(self, id, data, default_key)
    }

    /// Downgrade to a weak reference.
    pub fn downgrade(&self) -> WeakStore {
        WeakStore {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl WeakStore {
    /// Upgrade to a strong reference.
    ///
    /// Returns `None` if the Store has already been dropped.
    pub fn upgrade(&self) -> Option<Store> {
        self.inner.upgrade().map(|inner| Store { inner })
    }

    /// Whether both references point at the same store.
    pub fn ptr_eq(&self, other: &WeakStore) -> bool {
        Weak::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether this reference points at `store`.
    pub fn points_to(&self, store: &Store) -> bool {
        std::ptr::eq(self.inner.as_ptr(), Arc::as_ptr(&store.inner))
    }
}

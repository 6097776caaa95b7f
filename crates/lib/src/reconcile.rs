//! Reconciliation of plain data into a [`Store`].
//!
//! These functions walk nested [`Data`] and turn it into entity writes and
//! removals. They only use the public surface of the store (`select`,
//! `remove` and entity writes), so every write goes through the normal
//! registration path and bumps generations as usual. Writing a value that is
//! already stored is not a change.
//!
//! Three families exist:
//!
//! - [`apply`] / [`merge`]: objects become nodes, scalars become properties
//!   and arrays become indexed children.
//! - [`apply_collection`]: like `apply`, but an absent or empty value removes
//!   the subtree and scalars land under a configurable default key.
//! - [`apply_changes`]: incremental updates where arrays are offset-indexed
//!   element lists and an element without a `value` deletes its node.
//!
//! None of them is transactional: an error aborts the walk and leaves the
//! writes made so far in place.

use serde_json::Map;
use tracing::debug;

use crate::{
    Result,
    constants::{
        APPLY_DIRECTIVE, APPLY_PROPS, ARRAY_KEY, ID_KEY, OFFSET_KEY, POJO_KEY, SEPARATOR,
        VALUE_KEY,
    },
    path,
    store::{Store, StoreError},
    value::{Data, Value},
};

const COLLECTION_SHAPE: &str = "expects an array of offset-indexed items";

fn is_container(data: &Data) -> bool {
    matches!(data, Data::Object(_) | Data::Array(_))
}

/// Merges `data` into the tree at `id`.
///
/// - Object: scalar and null properties are set on the node at `id`, in one
///   write; object and array properties recurse into `id.<key>`.
/// - Array: element `i` recurses into `id.<i>`; a scalar element becomes the
///   direct value of that child.
/// - Scalar or null: set as the direct value of `id`.
pub fn apply(store: &Store, id: &str, data: &Data) -> Result<()> {
    debug!(store = store.id(), id, "Applying data");
    apply_value(store, id, data)
}

/// Same as [`apply`].
pub fn merge(store: &Store, id: &str, data: &Data) -> Result<()> {
    apply(store, id, data)
}

fn apply_value(store: &Store, id: &str, data: &Data) -> Result<()> {
    match data {
        Data::Object(map) => {
            let scalars: Vec<(&String, Value)> = map
                .iter()
                .filter(|(_, value)| !is_container(value))
                .map(|(key, value)| (key, Value::from(value)))
                .collect();
            if !scalars.is_empty() {
                store.select(id)?.set_values(scalars)?;
            }
            for (key, value) in map.iter().filter(|(_, value)| is_container(value)) {
                apply_value(store, &path::child_id(id, key), value)?;
            }
            Ok(())
        }
        Data::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                apply_value(store, &path::child_id(id, &index.to_string()), item)?;
            }
            Ok(())
        }
        scalar => {
            store.select(id)?.set_value(scalar)?;
            Ok(())
        }
    }
}

/// How the shared collection walkers treat their input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// [`apply_collection`]: elements without a value are kept.
    Collection,
    /// [`apply_changes`]: elements without a value are deleted.
    Changes,
}

impl Mode {
    fn recurse(self, store: &Store, id: &str, data: Option<&Data>, default_key: &str) -> Result<()> {
        match self {
            Mode::Collection => collection_value(store, id, data, default_key),
            Mode::Changes => changes_value(store, id, data, default_key),
        }
    }
}

/// Reconciles a collection into the tree at `id`.
///
/// - `None`, `{}` or `[]`: removes the node at `id` and its subtree.
/// - Array: offset-indexed elements, as in [`apply_changes`], except that an
///   element without a `value` still creates its node.
/// - Object: the entry named `default_key` is set on the node itself; every
///   other entry recurses into a child.
/// - Scalar: set on the node under `default_key`.
pub fn apply_collection(
    store: &Store,
    id: &str,
    data: Option<&Data>,
    default_key: &str,
) -> Result<()> {
    debug!(store = store.id(), id, "Applying collection");
    collection_value(store, id, data, default_key)
}

fn collection_value(store: &Store, id: &str, data: Option<&Data>, default_key: &str) -> Result<()> {
    match data {
        None => remove(store, id),
        Some(Data::Array(items)) if items.is_empty() => remove(store, id),
        Some(Data::Object(map)) if map.is_empty() => remove(store, id),
        Some(Data::Array(items)) => apply_items(store, id, items, default_key, Mode::Collection),
        Some(Data::Object(map)) => apply_entries(store, id, map, default_key, Mode::Collection),
        Some(scalar) => set_default(store, id, scalar, default_key),
    }
}

/// Reconciles a change set into the tree at `id`.
///
/// - `None`: removes the node at `id` and its subtree.
/// - Array: a list of elements `{offset, id?, value?}`. The whole array is
///   checked first; every element must be an object whose `offset` is a
///   non-negative integer or a non-empty string, otherwise nothing is applied
///   and [`StoreError::InvalidCollectionShape`] is returned. An element
///   without `value` removes `id.<offset>`. Otherwise `offset` and `id` are
///   stored on `id.<offset>`, together with `value` for a scalar payload or a
///   verbatim `pojo` for a structured one, and the payload is applied to that
///   node recursively.
/// - Object with `"$apply": "props"`: every other entry is set as a flat
///   property of the node at `id`, except `array`, which is applied to the
///   same node as a change set.
/// - Other objects: the entry named `default_key` is set on the node itself;
///   every other entry recurses into a child.
/// - Scalar: set on the node under `default_key`.
pub fn apply_changes(
    store: &Store,
    id: &str,
    data: Option<&Data>,
    default_key: &str,
) -> Result<()> {
    debug!(store = store.id(), id, "Applying changes");
    changes_value(store, id, data, default_key)
}

fn changes_value(store: &Store, id: &str, data: Option<&Data>, default_key: &str) -> Result<()> {
    match data {
        None => remove(store, id),
        Some(Data::Array(items)) => apply_items(store, id, items, default_key, Mode::Changes),
        Some(Data::Object(map))
            if map.get(APPLY_DIRECTIVE).and_then(Data::as_str) == Some(APPLY_PROPS) =>
        {
            apply_props(store, id, map, default_key)
        }
        Some(Data::Object(map)) => apply_entries(store, id, map, default_key, Mode::Changes),
        Some(scalar) => set_default(store, id, scalar, default_key),
    }
}

fn remove(store: &Store, id: &str) -> Result<()> {
    store.remove(id);
    Ok(())
}

fn set_default(store: &Store, id: &str, scalar: &Data, default_key: &str) -> Result<()> {
    store.select(id)?.set(default_key, scalar)?;
    Ok(())
}

fn apply_entries(
    store: &Store,
    id: &str,
    map: &Map<String, Data>,
    default_key: &str,
    mode: Mode,
) -> Result<()> {
    for (key, value) in map {
        if key == default_key {
            store.select(id)?.set(key.as_str(), value)?;
        } else {
            mode.recurse(store, &path::child_id(id, key), Some(value), default_key)?;
        }
    }
    Ok(())
}

fn apply_props(store: &Store, id: &str, map: &Map<String, Data>, default_key: &str) -> Result<()> {
    let mut props = Vec::new();
    for (key, value) in map {
        match key.as_str() {
            APPLY_DIRECTIVE => {}
            ARRAY_KEY => changes_value(store, id, Some(value), default_key)?,
            _ => props.push((key.as_str(), Value::from(value))),
        }
    }
    if !props.is_empty() {
        store.select(id)?.set_values(props)?;
    }
    Ok(())
}

/// Reads the offset of a collection element, as a path segment.
fn element_offset<'a>(id: &str, item: &'a Data) -> Result<(String, &'a Map<String, Data>)> {
    let shape_error = |reason: &str| StoreError::InvalidCollectionShape {
        id: id.to_owned(),
        reason: format!("{COLLECTION_SHAPE}: {reason}"),
    };
    let Data::Object(element) = item else {
        return Err(shape_error("element is not an object").into());
    };
    let offset = match element.get(OFFSET_KEY) {
        Some(Data::Number(number)) => number
            .as_u64()
            .map(|offset| offset.to_string())
            .ok_or_else(|| shape_error("offset is not a non-negative integer"))?,
        Some(Data::String(offset)) if !offset.is_empty() && !offset.contains(SEPARATOR) => {
            offset.clone()
        }
        Some(_) => return Err(shape_error("offset is not a number or a plain string").into()),
        None => return Err(shape_error("element has no offset").into()),
    };
    Ok((offset, element))
}

fn apply_items(
    store: &Store,
    id: &str,
    items: &[Data],
    default_key: &str,
    mode: Mode,
) -> Result<()> {
    let elements = items
        .iter()
        .map(|item| element_offset(id, item))
        .collect::<Result<Vec<_>>>()?;

    for (offset, element) in elements {
        let child = path::child_id(id, &offset);
        let payload = element.get(VALUE_KEY);
        if payload.is_none() && mode == Mode::Changes {
            store.remove(&child);
            continue;
        }

        let (value, pojo) = match payload {
            Some(data) if is_container(data) => (None, Some(Value::from(data))),
            Some(data) => (Some(Value::from(data)), None),
            None => (None, None),
        };
        store.select(&child)?.with_values([
            (OFFSET_KEY, element.get(OFFSET_KEY).map(Value::from)),
            (ID_KEY, element.get(ID_KEY).map(Value::from)),
            (VALUE_KEY, value),
            (POJO_KEY, pojo),
        ])?;

        if payload.is_some() {
            mode.recurse(store, &child, payload, default_key)?;
        }
    }
    Ok(())
}

//! Stored values and the freezing strategies that produce them.
//!
//! Callers hand the store plain [`Data`] (a [`serde_json::Value`]). Before it
//! is stored, data is converted into a [`Value`], which seals containers into
//! shared, immutable shells:
//!
//! - [`freeze`] seals every container reachable from the data.
//! - [`freeze_top`] seals only the outermost shell. Arrays are transparent,
//!   meaning each element is itself `freeze_top`ed, while object or array
//!   properties of an object stay [`Value::Mutable`] so their owner can keep
//!   changing them in place.
//!
//! Every conversion from [`Data`] into [`Value`] through [`From`] uses
//! [`freeze_top`].
//!
//! # Identity
//!
//! Sealed containers are reference counted. [`Value::is_same`] compares them
//! by allocation, and scalars by value, which is how the store detects that a
//! write would not change anything.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indexmap::IndexMap;
use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};
use serde_json::Number;

/// Plain, caller-owned data.
pub type Data = serde_json::Value;

/// A sealed object shell.
pub type Object = IndexMap<String, Value>;

/// Values stored on an [`Entity`](crate::Entity).
///
/// Scalars and the sealed [`Value::Array`] / [`Value::Object`] shells are
/// frozen. [`Value::Mutable`] wraps data that is still owned and editable by
/// the caller.
///
/// `==` between two values compares their content. Use [`Value::is_same`] for
/// identity.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    /// Sealed array shell
    Array(Arc<Vec<Value>>),
    /// Sealed object shell, in insertion order
    Object(Arc<Object>),
    /// Container left editable by [`freeze_top`]
    Mutable(MutableData),
}

/// Shared handle to data that [`freeze_top`] left editable.
///
/// Clones share the same underlying data.
#[derive(Clone, Default)]
pub struct MutableData {
    inner: Arc<Mutex<Data>>,
}

impl MutableData {
    pub fn new(data: Data) -> Self {
        Self {
            inner: Arc::new(Mutex::new(data)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Data> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the current content.
    pub fn get(&self) -> Data {
        self.lock().clone()
    }

    /// Edits the content in place.
    ///
    /// Every holder of this handle observes the change.
    pub fn update<R>(&self, f: impl FnOnce(&mut Data) -> R) -> R {
        f(&mut self.lock())
    }

    /// Whether both handles point at the same data.
    pub fn ptr_eq(&self, other: &MutableData) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for MutableData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MutableData").field(&*self.lock()).finish()
    }
}

impl Value {
    /// Returns true if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for arrays, objects and mutable handles
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_) | Value::Mutable(_))
    }

    /// Returns true unless this value is a [`Value::Mutable`] handle.
    ///
    /// Frozen-ness is about the shell only: a sealed object may still hold
    /// mutable properties.
    pub fn is_frozen(&self) -> bool {
        !matches!(self, Value::Mutable(_))
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Mutable(_) => "mutable",
        }
    }

    /// Identity comparison.
    ///
    /// Scalars compare by value, containers by allocation.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Mutable(a), Value::Mutable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to a signed integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Attempts to convert to an unsigned integer
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    /// Attempts to convert to a float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Attempts to convert to a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to view as a sealed array
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Attempts to view as a sealed object
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Attempts to view as a mutable handle
    pub fn as_mutable(&self) -> Option<&MutableData> {
        match self {
            Value::Mutable(data) => Some(data),
            _ => None,
        }
    }

    /// Element `index` of a sealed array.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.as_array()?.get(index)
    }

    /// Property `key` of a sealed object.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    /// Converts back into plain data.
    ///
    /// Mutable handles contribute a copy of their current content.
    pub fn to_data(&self) -> Data {
        match self {
            Value::Null => Data::Null,
            Value::Bool(b) => Data::Bool(*b),
            Value::Number(n) => Data::Number(n.clone()),
            Value::Text(s) => Data::String(s.clone()),
            Value::Array(items) => Data::Array(items.iter().map(Value::to_data).collect()),
            Value::Object(map) => Data::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_data()))
                    .collect(),
            ),
            Value::Mutable(data) => data.get(),
        }
    }
}

fn scalar(data: Data) -> Value {
    match data {
        Data::Null => Value::Null,
        Data::Bool(b) => Value::Bool(b),
        Data::Number(n) => Value::Number(n),
        Data::String(s) => Value::Text(s),
        container => Value::Mutable(MutableData::new(container)),
    }
}

/// Seals `data` and everything reachable from it.
pub fn freeze(data: Data) -> Value {
    match data {
        Data::Array(items) => Value::Array(Arc::new(items.into_iter().map(freeze).collect())),
        Data::Object(map) => Value::Object(Arc::new(
            map.into_iter()
                .map(|(key, value)| (key, freeze(value)))
                .collect(),
        )),
        other => scalar(other),
    }
}

/// Seals the outer shell of `data`.
///
/// Arrays are transparent: every element is `freeze_top`ed in turn. Object
/// properties that are themselves objects or arrays become
/// [`Value::Mutable`] handles.
pub fn freeze_top(data: Data) -> Value {
    match data {
        Data::Array(items) => {
            Value::Array(Arc::new(items.into_iter().map(freeze_top).collect()))
        }
        Data::Object(map) => Value::Object(Arc::new(
            map.into_iter()
                .map(|(key, value)| (key, scalar(value)))
                .collect(),
        )),
        other => scalar(other),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Mutable(_), _) | (_, Value::Mutable(_)) => self.to_data() == other.to_data(),
            _ => self.is_same(other),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(object) => {
                let mut map = serializer.serialize_map(Some(object.len()))?;
                for (key, value) in object.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Mutable(data) => data.lock().serialize(serializer),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            other => write!(f, "{}", other.to_data()),
        }
    }
}

// Conversions from plain data go through the top-level freeze
impl From<Data> for Value {
    fn from(data: Data) -> Self {
        freeze_top(data)
    }
}

impl From<&Data> for Value {
    fn from(data: &Data) -> Self {
        freeze_top(data.clone())
    }
}

impl From<MutableData> for Value {
    fn from(data: MutableData) -> Self {
        Value::Mutable(data)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(value.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no JSON form and become [`Value::Null`].
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

// PartialEq implementations for comparing Value with other types
impl PartialEq<Data> for Value {
    fn eq(&self, other: &Data) -> bool {
        self.to_data() == *other
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_i64() == Some(i64::from(*other))
    }
}

impl PartialEq<u64> for Value {
    fn eq(&self, other: &u64) -> bool {
        self.as_u64() == Some(*other)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == Some(*other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

// Reverse implementations for symmetry
impl PartialEq<Value> for Data {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for i64 {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for bool {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

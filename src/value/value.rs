use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};

use bytes::Bytes;
use ordered_float::NotNan;

use super::{AsyncThunk, KeyString, LazySequence, Thunk};

/// The mapping type: ordered keys, no duplicates.
pub type ObjectMap = BTreeMap<KeyString, Value>;

/// One node of a data tree.
///
/// `Null` doubles as the absent value; the resolver's default missing
/// sentinel is `Null` for the same reason.
#[derive(Clone, Default)]
pub enum Value {
    /// String and binary scalars.
    Bytes(Bytes),
    Integer(i64),
    Float(NotNan<f64>),
    Boolean(bool),
    /// A mapping of keys to child values.
    Object(ObjectMap),
    /// An ordered sequence with indexed access.
    Array(Vec<Value>),
    /// A one-shot forward sequence without indexed access.
    Lazy(LazySequence),
    /// A deferred producer, invoked when traversal lands on it.
    Thunk(Thunk),
    /// A deferred producer whose result must be awaited.
    AsyncThunk(AsyncThunk),
    #[default]
    Null,
}

impl Value {
    /// The name of this value's variant, useful in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Bytes(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Object(_) => "object",
            Value::Array(_) => "array",
            Value::Lazy(_) => "lazy sequence",
            Value::Thunk(_) => "thunk",
            Value::AsyncThunk(_) => "async thunk",
            Value::Null => "null",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectMap> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The contained string, if this is a UTF-8 `Bytes` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            // Deferred and lazy values have no structural identity.
            (Value::Lazy(a), Value::Lazy(b)) => a.ptr_eq(b),
            (Value::Thunk(a), Value::Thunk(b)) => a.ptr_eq(b),
            (Value::AsyncThunk(a), Value::AsyncThunk(b)) => a.ptr_eq(b),
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bytes(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(float) => write!(f, "{float}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Object(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Lazy(lazy) => lazy.fmt(f),
            Value::Thunk(thunk) => thunk.fmt(f),
            Value::AsyncThunk(thunk) => thunk.fmt(f),
            Value::Null => f.write_str("null"),
        }
    }
}

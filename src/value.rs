//! Dynamic, borrowed view of field values.
//!
//! [`Value`] is what [`Reflect::field`](crate::Reflect::field) hands back and
//! what validators receive. Nested objects stay borrowed as
//! `&dyn Reflect`, so reading a field never clones a subtree.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};

use crate::reflect::Reflect;

/// A borrowed value read from a field.
///
/// Collections unwrap into [`Value::List`] and maps into [`Value::Map`];
/// nested structs are [`Value::Object`] so the engine can keep walking them.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    /// Absent value (`None`).
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer; smaller integer types widen into it.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Arbitrary precision decimal.
    Decimal(Decimal),
    /// Text.
    Text(Cow<'a, str>),
    /// Instant in time, normalized to UTC.
    DateTime(DateTime<Utc>),
    /// Calendar date without a time.
    Date(NaiveDate),
    /// Ordered sequence.
    List(Vec<Value<'a>>),
    /// Key/value pairs.
    Map(Vec<(Value<'a>, Value<'a>)>),
    /// Nested object that can be walked.
    Object(&'a dyn Reflect),
}

impl<'a> Value<'a> {
    /// Wraps an object for walking.
    pub fn object(object: &'a dyn Reflect) -> Self {
        Value::Object(object)
    }

    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns a short name for the kind of value, used in messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::DateTime(_) => "datetime",
            Value::Date(_) => "date",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    /// Returns the text, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value truncated to an `i64`, if it is numeric.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Value::Decimal(d) => i64::try_from(d.trunc()).ok(),
            _ => None,
        }
    }

    /// Returns the value as a `Decimal`, if it is numeric.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Integer(n) => Some(Decimal::from(*n)),
            Value::Float(f) => Decimal::try_from(*f).ok(),
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the object, if this is an object.
    pub fn as_object(&self) -> Option<&'a dyn Reflect> {
        match self {
            Value::Object(o) => Some(*o),
            _ => None,
        }
    }

    /// Number of characters, elements or entries for sized values.
    pub fn size(&self) -> Option<usize> {
        match self {
            Value::Text(s) => Some(s.chars().count()),
            Value::List(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Owned JSON snapshot of this value, used to record offending values.
    ///
    /// Objects are not expanded: they snapshot as `{"$type": "<name>"}`, so a
    /// cyclic object graph can still be recorded.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Integer(n) => json!(n),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Decimal(d) => JsonValue::String(d.to_string()),
            Value::Text(s) => JsonValue::String(s.to_string()),
            Value::DateTime(dt) => JsonValue::String(dt.to_rfc3339()),
            Value::Date(d) => JsonValue::String(d.to_string()),
            Value::List(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => JsonValue::Array(
                entries
                    .iter()
                    .map(|(k, v)| JsonValue::Array(vec![k.to_json(), v.to_json()]))
                    .collect(),
            ),
            Value::Object(o) => json!({ "$type": o.type_descriptor().name() }),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Object(o) => write!(f, "<{}>", o.type_descriptor()),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(Cow::Borrowed(s))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::Text(Cow::Owned(s))
    }
}

impl From<i64> for Value<'_> {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value<'_> {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Conversion of a field into a borrowed [`Value`].
///
/// Implemented for primitives, strings, dates, decimals and the standard
/// containers. Structs get it from the [`reflect!`](crate::reflect) macro.
pub trait ToValue {
    /// Borrows `self` as a dynamic value.
    fn to_value(&self) -> Value<'_>;
}

macro_rules! integer_to_value {
    ($($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value<'_> {
                    Value::Integer(i64::from(*self))
                }
            }
        )*
    };
}

integer_to_value!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! wide_integer_to_value {
    ($($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value<'_> {
                    match i64::try_from(*self) {
                        Ok(n) => Value::Integer(n),
                        Err(_) => Value::Decimal(Decimal::from(*self)),
                    }
                }
            }
        )*
    };
}

wide_integer_to_value!(u64, usize, isize);

impl ToValue for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value<'_> {
        Value::Float(f64::from(*self))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value<'_> {
        Value::Float(*self)
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value<'_> {
        Value::Text(Cow::Owned(self.to_string()))
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(self))
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(self.as_str()))
    }
}

impl ToValue for Decimal {
    fn to_value(&self) -> Value<'_> {
        Value::Decimal(*self)
    }
}

impl ToValue for DateTime<Utc> {
    fn to_value(&self) -> Value<'_> {
        Value::DateTime(*self)
    }
}

impl ToValue for DateTime<FixedOffset> {
    fn to_value(&self) -> Value<'_> {
        Value::DateTime(self.with_timezone(&Utc))
    }
}

impl ToValue for NaiveDateTime {
    fn to_value(&self) -> Value<'_> {
        Value::DateTime(self.and_utc())
    }
}

impl ToValue for NaiveDate {
    fn to_value(&self) -> Value<'_> {
        Value::Date(*self)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value<'_> {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value<'_> {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for VecDeque<T> {
    fn to_value(&self) -> Value<'_> {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue, S> ToValue for HashSet<T, S> {
    fn to_value(&self) -> Value<'_> {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for BTreeSet<T> {
    fn to_value(&self) -> Value<'_> {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue, S> ToValue for IndexSet<T, S> {
    fn to_value(&self) -> Value<'_> {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<K: ToValue, V: ToValue, S> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value<'_> {
        Value::Map(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect())
    }
}

impl<K: ToValue, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value<'_> {
        Value::Map(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect())
    }
}

impl<K: ToValue, V: ToValue, S> ToValue for IndexMap<K, V, S> {
    fn to_value(&self) -> Value<'_> {
        Value::Map(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect())
    }
}

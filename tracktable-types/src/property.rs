//! Heterogeneous named properties attached to trajectories and their
//! points.

use crate::timestamp;
use hifitime::Epoch;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tag identifying the variant held by a [`PropertyValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PropertyKind {
    Null,
    Integer,
    Real,
    String,
    Timestamp,
}

/// A value in a property map: a closed sum over null, 64-bit integers,
/// doubles, UTF-8 strings, and microsecond instants.
///
/// Equality follows SQL NULL semantics: `Null` never equals anything,
/// including another `Null`. All other variants compare structurally.
///
/// ```
/// use tracktable_types::PropertyValue;
///
/// assert_ne!(PropertyValue::Null, PropertyValue::Null);
/// assert_eq!(PropertyValue::Integer(7), PropertyValue::Integer(7));
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PropertyValue {
    Null,
    Integer(i64),
    Real(f64),
    String(String),
    Timestamp(Epoch),
}

impl PropertyValue {
    /// The variant's tag. A value's tag never changes; replacing the
    /// value is the only mutation.
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Null => PropertyKind::Null,
            PropertyValue::Integer(_) => PropertyKind::Integer,
            PropertyValue::Real(_) => PropertyKind::Real,
            PropertyValue::String(_) => PropertyKind::String,
            PropertyValue::Timestamp(_) => PropertyKind::Timestamp,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// The integer payload, or `None` on any other variant.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// The floating-point payload, or `None` on any other variant.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            PropertyValue::Real(value) => Some(*value),
            _ => None,
        }
    }

    /// The string payload, or `None` on any other variant.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// The timestamp payload, or `None` on any other variant.
    pub fn as_timestamp(&self) -> Option<Epoch> {
        match self {
            PropertyValue::Timestamp(value) => Some(*value),
            _ => None,
        }
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // NULL equals nothing, itself included.
            (PropertyValue::Null, _) | (_, PropertyValue::Null) => false,
            (PropertyValue::Integer(a), PropertyValue::Integer(b)) => a == b,
            (PropertyValue::Real(a), PropertyValue::Real(b)) => a == b,
            (PropertyValue::String(a), PropertyValue::String(b)) => a == b,
            (PropertyValue::Timestamp(a), PropertyValue::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "null"),
            PropertyValue::Integer(value) => write!(f, "{value}"),
            PropertyValue::Real(value) => write!(f, "{value}"),
            PropertyValue::String(value) => write!(f, "{value}"),
            PropertyValue::Timestamp(value) => write!(f, "{}", timestamp::format_iso8601(*value)),
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Real(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<Epoch> for PropertyValue {
    fn from(value: Epoch) -> Self {
        PropertyValue::Timestamp(value)
    }
}

/// An insertion-ordered `name -> value` map.
///
/// Lookup is by key; iteration visits entries in the order they were first
/// inserted. Re-inserting an existing key replaces the value in place and
/// keeps its position.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PropertyMap {
    entries: Vec<(String, PropertyValue)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        PropertyMap::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sets `name` to `value`, replacing an existing entry in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Removes `name`, returning its value when present.
    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Integer property `name`; `None` on a missing key or any other tag.
    pub fn integer_property(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(PropertyValue::as_integer)
    }

    /// Real property `name`; `None` on a missing key or any other tag.
    pub fn real_property(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(PropertyValue::as_real)
    }

    /// String property `name`; `None` on a missing key or any other tag.
    pub fn string_property(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_string)
    }

    /// Timestamp property `name`; `None` on a missing key or any other tag.
    pub fn timestamp_property(&self, name: &str) -> Option<Epoch> {
        self.get(name).and_then(PropertyValue::as_timestamp)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = PropertyMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

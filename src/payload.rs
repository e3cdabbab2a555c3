//! Form payload building with ordered, repeatable keys.
//!
//! Several Atomic endpoints take PHP-style bracketed form fields where the
//! same key appears more than once (`args[]`, `data[filter][status][]`,
//! `filters[0][column]`). A map-backed encoder would silently collapse those
//! to the last value, so payloads are kept as an explicit ordered list of
//! `(key, value)` pairs all the way to the wire.

use serde::{Serialize, Serializer};

/// An ordered form-encoded payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    pairs: Vec<(String, String)>,
}

impl FormPayload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain `key=value` field.
    pub fn field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Append a field only when the value is present.
    pub fn field_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.field(key, value),
            None => self,
        }
    }

    /// Append a bracketed field, `outer[key]=value`.
    pub fn nested(self, outer: &str, key: &str, value: impl ToString) -> Self {
        self.field(format!("{outer}[{key}]"), value)
    }

    /// Append a repeated array field, `key[]=value` once per value.
    pub fn array<V: ToString>(mut self, key: &str, values: impl IntoIterator<Item = V>) -> Self {
        for value in values {
            self.pairs.push((format!("{key}[]"), value.to_string()));
        }
        self
    }

    /// Append an indexed nested field, `outer[index][key]=value`.
    pub fn indexed(self, outer: &str, index: usize, key: &str, value: impl ToString) -> Self {
        self.field(format!("{outer}[{index}][{key}]"), value)
    }

    /// True when no fields have been added.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of fields, counting repeats.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// The fields in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl Serialize for FormPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Serialized as a sequence of pairs so urlencoding preserves repeats.
        self.pairs.serialize(serializer)
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for FormPayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        }
    }
}

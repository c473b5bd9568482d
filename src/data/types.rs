use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Represents a single value in the document tree.
///
/// Values are scalars (`Null`, `Bool`, `Number`, `String`), ordered sequences (`Array`)
/// or nested mappings (`Map`). On disk they are plain JSON with no variant tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum NestedValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<NestedValue>),
    Map(Mapping),
}

impl NestedValue {
    /// Human-readable name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            NestedValue::Null => "null",
            NestedValue::Bool(_) => "boolean",
            NestedValue::Number(_) => "number",
            NestedValue::String(_) => "string",
            NestedValue::Array(_) => "array",
            NestedValue::Map(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, NestedValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NestedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NestedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NestedValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NestedValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<NestedValue>> {
        match self {
            NestedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            NestedValue::Map(map) => Some(map),
            _ => None,
        }
    }


    /// Number of nested container levels, counting this value: scalars are 0,
    /// `[]` is 1 and `[[1]]` is 2.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((value, above)) = pending.pop() {
            match value {
                NestedValue::Array(items) => {
                    deepest = deepest.max(above + 1);
                    pending.extend(items.iter().map(|item| (item, above + 1)));
                }
                NestedValue::Map(map) => {
                    deepest = deepest.max(above + 1);
                    pending.extend(map.data.values().map(|item| (item, above + 1)));
                }
                _ => {}
            }
        }
        deepest
    }
}

impl From<serde_json::Value> for NestedValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => NestedValue::Null,
            serde_json::Value::Bool(b) => NestedValue::Bool(b),
            serde_json::Value::Number(n) => NestedValue::Number(n),
            serde_json::Value::String(s) => NestedValue::String(s),
            serde_json::Value::Array(items) => {
                NestedValue::Array(items.into_iter().map(NestedValue::from).collect())
            }
            serde_json::Value::Object(object) => NestedValue::Map(Mapping {
                data: object
                    .into_iter()
                    .map(|(k, v)| (k, NestedValue::from(v)))
                    .collect(),
            }),
        }
    }
}

impl From<NestedValue> for serde_json::Value {
    fn from(value: NestedValue) -> Self {
        match value {
            NestedValue::Null => serde_json::Value::Null,
            NestedValue::Bool(b) => serde_json::Value::Bool(b),
            NestedValue::Number(n) => serde_json::Value::Number(n),
            NestedValue::String(s) => serde_json::Value::String(s),
            NestedValue::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            NestedValue::Map(map) => serde_json::Value::Object(
                map.data
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<String> for NestedValue {
    fn from(s: String) -> Self {
        NestedValue::String(s)
    }
}

impl From<&str> for NestedValue {
    fn from(s: &str) -> Self {
        NestedValue::String(s.to_string())
    }
}

impl From<bool> for NestedValue {
    fn from(b: bool) -> Self {
        NestedValue::Bool(b)
    }
}

impl From<i64> for NestedValue {
    fn from(n: i64) -> Self {
        NestedValue::Number(n.into())
    }
}

impl From<i32> for NestedValue {
    fn from(n: i32) -> Self {
        NestedValue::Number(n.into())
    }
}

impl From<u64> for NestedValue {
    fn from(n: u64) -> Self {
        NestedValue::Number(n.into())
    }
}

/// Non-finite floats have no JSON representation and become `Null`.
impl From<f64> for NestedValue {
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n).map_or(NestedValue::Null, NestedValue::Number)
    }
}

impl From<Vec<NestedValue>> for NestedValue {
    fn from(items: Vec<NestedValue>) -> Self {
        NestedValue::Array(items)
    }
}

impl From<Mapping> for NestedValue {
    fn from(map: Mapping) -> Self {
        NestedValue::Map(map)
    }
}

/// A string-keyed node of the document tree.
///
/// Keys are kept sorted so that the persisted document is stable across writes.
/// The document root is always a `Mapping`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    data: BTreeMap<String, NestedValue>,
}

impl Mapping {
    /// Create a new empty Mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&NestedValue> {
        self.data.get(key)
    }

    /// Set a key-value pair, overwriting any existing value.
    pub fn set<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<NestedValue>,
    {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Remove a key, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<NestedValue> {
        self.data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &NestedValue)> {
        self.data.iter()
    }

    /// Get the underlying BTreeMap
    pub fn as_btreemap(&self) -> &BTreeMap<String, NestedValue> {
        &self.data
    }

    /// Get a mutable reference to the underlying BTreeMap
    pub fn as_btreemap_mut(&mut self) -> &mut BTreeMap<String, NestedValue> {
        &mut self.data
    }
}

impl<K: Into<String>, V: Into<NestedValue>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

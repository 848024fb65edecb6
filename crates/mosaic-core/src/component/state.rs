use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Old and new value of one changed state key
#[derive(Debug, Clone, PartialEq)]
pub struct StateChange {
    /// `None` when the key did not exist before
    pub old: Option<Value>,
    pub new: Value,
}

/// Changed keys of one state update, passed to `on_changes`
pub type Changes = BTreeMap<String, StateChange>;

/// A partial update for a component's state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    values: BTreeMap<String, Value>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Build a patch from a JSON object. Returns `None` for any other JSON value.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(map.into_iter().collect()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

impl FromIterator<(String, Value)> for StatePatch {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Structural equality where numbers compare by numeric value, so `0`
/// and `0.0` are the same.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                x.as_f64() == y.as_f64()
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| same_value(x, y)))
        }
        _ => a == b,
    }
}

/// A component's state record.
///
/// Only the component host mutates it, through [`diff`](Self::diff) followed
/// by [`apply`](Self::apply).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentState {
    values: BTreeMap<String, Value>,
}

impl ComponentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Decode a state value. Returns `None` if the key is absent or has another shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys of `patch` whose value differs from the current state, compared by value.
    pub fn diff(&self, patch: &StatePatch) -> Changes {
        patch
            .iter()
            .filter(|(key, new)| {
                !self
                    .values
                    .get(key.as_str())
                    .is_some_and(|old| same_value(old, new))
            })
            .map(|(key, new)| {
                (
                    key.clone(),
                    StateChange {
                        old: self.values.get(key.as_str()).cloned(),
                        new: new.clone(),
                    },
                )
            })
            .collect()
    }

    /// Merge every change in one step.
    pub(crate) fn apply(&mut self, changes: &Changes) {
        for (key, change) in changes {
            self.values.insert(key.clone(), change.new.clone());
        }
    }

    /// The whole state as a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<String, Value>>(),
        )
    }
}

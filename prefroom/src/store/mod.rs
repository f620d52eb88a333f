//! The key-value store capability generated accessors call into.

mod editor;
mod file;
mod memory;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::errors::StoreError;
use crate::value::Value;

pub use editor::Editor;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Shared handle to an opened store.
pub type SharedPreferences = Arc<dyn PreferenceStore>;

/// A named key-value store.
///
/// Implementations must be safe for concurrent readers and writers; a single
/// `apply` or `commit` is atomic with respect to readers.
pub trait PreferenceStore: Send + Sync {
    /// Identifier the store was opened with.
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> Option<Value>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All keys, sorted.
    fn keys(&self) -> Vec<String>;

    /// Apply an edit in memory now and persist it eventually.
    fn apply(&self, edit: PendingEdit);

    /// Apply an edit and persist it before returning.
    fn commit(&self, edit: PendingEdit) -> Result<(), StoreError>;

    /// Persist everything applied so far.
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Changes collected by an [`Editor`].
///
/// `clear` takes effect before `changes`, whatever order they were recorded in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingEdit {
    pub clear: bool,
    /// `None` removes the key.
    pub changes: Vec<(String, Option<Value>)>,
}

impl PendingEdit {
    pub fn is_empty(&self) -> bool {
        !self.clear && self.changes.is_empty()
    }

    pub fn apply_to(self, values: &mut BTreeMap<String, Value>) {
        if self.clear {
            values.clear();
        }
        for (key, change) in self.changes {
            match change {
                Some(value) => {
                    values.insert(key, value);
                }
                None => {
                    values.remove(&key);
                }
            }
        }
    }
}

impl dyn PreferenceStore {
    /// Start a batch of changes.
    pub fn edit(&self) -> Editor<'_> {
        Editor::new(self)
    }

    pub fn get_boolean(&self, key: &str, default: bool) -> bool {
        self.read(key, "boolean", default, |value| match value {
            Value::Boolean(v) => Some(v),
            _ => None,
        })
    }

    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.read(key, "int", default, |value| match value {
            Value::Int(v) => Some(v),
            _ => None,
        })
    }

    pub fn get_long(&self, key: &str, default: i64) -> i64 {
        self.read(key, "long", default, |value| match value {
            Value::Long(v) => Some(v),
            _ => None,
        })
    }

    pub fn get_float(&self, key: &str, default: f32) -> f32 {
        self.read(key, "float", default, |value| match value {
            Value::Float(v) => Some(v),
            _ => None,
        })
    }

    pub fn get_double(&self, key: &str, default: f64) -> f64 {
        self.read(key, "double", default, |value| match value {
            Value::Double(v) => Some(v),
            _ => None,
        })
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(Value::String(v)) => v,
            Some(other) => {
                self.mismatch(key, "string", &other);
                default.to_string()
            }
            None => default.to_string(),
        }
    }

    pub fn get_string_set(&self, key: &str, default: &[&str]) -> BTreeSet<String> {
        match self.get(key) {
            Some(Value::StringSet(v)) => v,
            Some(other) => {
                self.mismatch(key, "string_set", &other);
                default.iter().map(|s| s.to_string()).collect()
            }
            None => default.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Read a serialized object, falling back to `T::default()`.
    pub fn get_object<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.get(key) {
            Some(Value::Structured(json)) => serde_json::from_value(json).unwrap_or_else(|err| {
                log::warn!("{}: key '{key}' does not decode: {err}", self.name());
                T::default()
            }),
            Some(other) => {
                self.mismatch(key, "structured", &other);
                T::default()
            }
            None => T::default(),
        }
    }

    fn read<T>(&self, key: &str, expected: &str, default: T, extract: impl FnOnce(Value) -> Option<T>) -> T {
        let Some(value) = self.get(key) else {
            return default;
        };
        let found = value.type_name();
        extract(value).unwrap_or_else(|| {
            log::warn!("{}: key '{key}' holds {found}, expected {expected}", self.name());
            default
        })
    }

    fn mismatch(&self, key: &str, expected: &str, found: &Value) {
        log::warn!(
            "{}: key '{key}' holds {}, expected {expected}",
            self.name(),
            found.type_name()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SharedPreferences {
        Arc::new(MemoryStore::new("test"))
    }

    #[test]
    fn clear_runs_before_changes() {
        let mut values = BTreeMap::from([("old".to_string(), Value::Int(1))]);
        let edit = PendingEdit {
            clear: true,
            changes: vec![("new".to_string(), Some(Value::Int(2)))],
        };
        edit.apply_to(&mut values);
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("new"), Some(&Value::Int(2)));
    }

    #[test]
    fn absent_keys_return_defaults() {
        let store = store();
        assert!(store.get_boolean("b", true));
        assert_eq!(store.get_int("i", -1), -1);
        assert_eq!(store.get_long("l", 9), 9);
        assert_eq!(store.get_float("f", 1.5), 1.5);
        assert_eq!(store.get_double("d", 2.5), 2.5);
        assert_eq!(store.get_string("s", "x"), "x");
        assert_eq!(store.get_string_set("t", &["a"]), BTreeSet::from(["a".to_string()]));
        assert_eq!(store.get_object::<Vec<u8>>("o"), Vec::<u8>::new());
    }

    #[test]
    fn mismatched_type_returns_default() {
        let store = store();
        store.edit().put_string("age", "old").apply();
        assert_eq!(store.get_int("age", 3), 3);
        assert_eq!(store.get_string("age", ""), "old");
    }

    #[test]
    fn undecodable_object_returns_default() {
        let store = store();
        store.edit().put_int("pet", 1).apply();
        assert_eq!(store.get_object::<String>("pet"), String::new());
    }
}

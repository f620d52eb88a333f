use std::collections::BTreeSet;

use serde::Serialize;

use super::{PendingEdit, PreferenceStore};
use crate::errors::StoreError;
use crate::value::Value;

/// Builder for a batch of changes against one store.
///
/// Nothing is visible to readers until [`Editor::apply`] or [`Editor::commit`].
#[must_use = "changes are discarded unless applied or committed"]
pub struct Editor<'a> {
    store: &'a dyn PreferenceStore,
    edit: PendingEdit,
}

impl<'a> Editor<'a> {
    pub(crate) fn new(store: &'a dyn PreferenceStore) -> Self {
        Self {
            store,
            edit: PendingEdit::default(),
        }
    }

    fn put(mut self, key: &str, value: Value) -> Self {
        self.edit.changes.push((key.to_string(), Some(value)));
        self
    }

    pub fn put_boolean(self, key: &str, value: bool) -> Self {
        self.put(key, Value::Boolean(value))
    }

    pub fn put_int(self, key: &str, value: i32) -> Self {
        self.put(key, Value::Int(value))
    }

    pub fn put_long(self, key: &str, value: i64) -> Self {
        self.put(key, Value::Long(value))
    }

    pub fn put_float(self, key: &str, value: f32) -> Self {
        self.put(key, Value::Float(value))
    }

    pub fn put_double(self, key: &str, value: f64) -> Self {
        self.put(key, Value::Double(value))
    }

    pub fn put_string(self, key: &str, value: impl Into<String>) -> Self {
        self.put(key, Value::String(value.into()))
    }

    pub fn put_string_set<I, S>(self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        self.put(key, Value::StringSet(set))
    }

    /// Store a serialized object. A value that fails to serialize is skipped and logged.
    pub fn put_object<T: Serialize + ?Sized>(self, key: &str, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => self.put(key, Value::Structured(json)),
            Err(err) => {
                log::warn!("{}: key '{key}' skipped, serialization failed: {err}", self.store.name());
                self
            }
        }
    }

    pub fn remove(mut self, key: &str) -> Self {
        self.edit.changes.push((key.to_string(), None));
        self
    }

    /// Drop every key. Runs before the other changes of this editor.
    pub fn clear(mut self) -> Self {
        self.edit.clear = true;
        self
    }

    /// Apply in memory now; persistence happens in the background.
    pub fn apply(self) {
        if !self.edit.is_empty() {
            self.store.apply(self.edit);
        }
    }

    /// Apply and persist before returning.
    pub fn commit(self) -> Result<(), StoreError> {
        self.store.commit(self.edit)
    }
}

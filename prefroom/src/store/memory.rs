use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use super::{PendingEdit, PreferenceStore};
use crate::errors::StoreError;
use crate::value::Value;

/// In-process store. `apply` and `commit` are both immediate.
pub struct MemoryStore {
    name: String,
    values: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: RwLock::new(BTreeMap::new()),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn contains(&self, key: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn apply(&self, edit: PendingEdit) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        edit.apply_to(&mut values);
    }

    fn commit(&self, edit: PendingEdit) -> Result<(), StoreError> {
        self.apply(edit);
        Ok(())
    }
}

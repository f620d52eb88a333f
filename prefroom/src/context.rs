use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::errors::StoreError;
use crate::store::{FileStore, MemoryStore, SharedPreferences};

/// Access mode requested when opening a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Store owned by this process only.
    #[default]
    Private,
}

#[derive(Debug, Clone)]
enum Backend {
    Memory,
    Directory(PathBuf),
}

/// Capability handed to generated constructors: opens stores by identifier.
///
/// Opening the same identifier twice yields the same store.
pub struct Context {
    backend: Backend,
    stores: Mutex<HashMap<String, SharedPreferences>>,
}

impl Context {
    /// Stores live only as long as the process.
    pub fn in_memory() -> Self {
        Self::with_backend(Backend::Memory)
    }

    /// Each store is a JSON file named after its identifier inside `directory`.
    pub fn with_directory(directory: impl Into<PathBuf>) -> Self {
        Self::with_backend(Backend::Directory(directory.into()))
    }

    fn with_backend(backend: Backend) -> Self {
        Self {
            backend,
            stores: Mutex::new(HashMap::new()),
        }
    }

    /// Directory stores are persisted in, if any.
    pub fn directory(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Memory => None,
            Backend::Directory(dir) => Some(dir),
        }
    }

    /// Open (or reuse) the store called `name`.
    pub fn get_shared_preferences(&self, name: &str, mode: Mode) -> SharedPreferences {
        let mut stores = self.stores.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = stores.get(name) {
            return Arc::clone(store);
        }

        let store: SharedPreferences = match (mode, &self.backend) {
            (Mode::Private, Backend::Memory) => Arc::new(MemoryStore::new(name)),
            (Mode::Private, Backend::Directory(dir)) => Arc::new(FileStore::open(name, dir)),
        };
        log::debug!("opened store '{name}'");
        stores.insert(name.to_string(), Arc::clone(&store));
        store
    }

    /// Persist every open store now.
    pub fn flush(&self) -> Result<(), StoreError> {
        let stores: Vec<SharedPreferences> = self
            .stores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for store in stores {
            store.flush()?;
        }
        Ok(())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::in_memory()
    }
}

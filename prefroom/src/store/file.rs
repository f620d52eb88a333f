use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, JoinHandle};

use super::{PendingEdit, PreferenceStore};
use crate::errors::StoreError;
use crate::value::Value;

/// Store persisted as one JSON file.
///
/// Reads are served from memory. `apply` updates memory and hands a snapshot
/// to a background writer; `commit` and `flush` write before returning.
/// Dropping the store waits for pending background writes.
pub struct FileStore {
    name: String,
    values: RwLock<BTreeMap<String, Value>>,
    generation: AtomicU64,
    disk: Arc<DiskState>,
    writer: Mutex<Option<Sender<Snapshot>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

struct Snapshot {
    generation: u64,
    values: BTreeMap<String, Value>,
}

struct DiskState {
    path: PathBuf,
    /// Generation last written; held while writing so writes never interleave.
    written: Mutex<u64>,
}

impl DiskState {
    fn write(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        if snapshot.generation <= *written {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }
        let json = serde_json::to_string_pretty(&snapshot.values)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(|err| StoreError::io(&staging, err))?;
        fs::rename(&staging, &self.path).map_err(|err| StoreError::io(&self.path, err))?;

        *written = snapshot.generation;
        log::debug!("wrote {} (generation {})", self.path.display(), snapshot.generation);
        Ok(())
    }
}

impl FileStore {
    /// Open `<directory>/<name>.json`, starting empty when it is missing or unreadable.
    pub fn open(name: impl Into<String>, directory: &Path) -> Self {
        let name = name.into();
        let path = directory.join(format!("{}.json", file_stem(&name)));
        let values = load(&path);

        let disk = Arc::new(DiskState {
            path,
            written: Mutex::new(0),
        });
        let (sender, receiver) = mpsc::channel();
        let worker = spawn_writer(Arc::clone(&disk), receiver);

        Self {
            name,
            values: RwLock::new(values),
            generation: AtomicU64::new(0),
            disk,
            writer: Mutex::new(Some(sender)),
            worker: Mutex::new(worker),
        }
    }

    pub fn path(&self) -> &Path {
        &self.disk.path
    }

    /// Apply an edit in memory and capture the resulting state.
    fn apply_in_memory(&self, edit: PendingEdit) -> Snapshot {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        edit.apply_to(&mut values);
        Snapshot {
            generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
            values: values.clone(),
        }
    }

    fn snapshot(&self) -> Snapshot {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        Snapshot {
            generation: self.generation.load(Ordering::SeqCst),
            values: values.clone(),
        }
    }
}

impl PreferenceStore for FileStore {
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

    fn keys(&self) -> Vec<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn apply(&self, edit: PendingEdit) {
        let snapshot = self.apply_in_memory(edit);

        let writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let pending = match writer.as_ref() {
            Some(sender) => match sender.send(snapshot) {
                Ok(()) => return,
                Err(mpsc::SendError(snapshot)) => snapshot,
            },
            None => snapshot,
        };
        drop(writer);

        // Writer thread is gone; fall back to writing inline
        if let Err(err) = self.disk.write(&pending) {
            log::error!("{}: failed to persist: {err}", self.name);
        }
    }

    fn commit(&self, edit: PendingEdit) -> Result<(), StoreError> {
        let snapshot = self.apply_in_memory(edit);
        self.disk.write(&snapshot)
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.disk.write(&self.snapshot())
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        // Closing the channel lets the writer drain and exit
        self.writer.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(worker) = self.worker.lock().unwrap_or_else(PoisonError::into_inner).take()
            && worker.join().is_err()
        {
            log::error!("{}: background writer panicked", self.name);
        }
    }
}

fn spawn_writer(disk: Arc<DiskState>, receiver: Receiver<Snapshot>) -> Option<JoinHandle<()>> {
    let spawned = thread::Builder::new()
        .name("prefroom-writer".to_string())
        .spawn(move || {
            while let Ok(mut snapshot) = receiver.recv() {
                // Only the newest queued state needs to reach disk
                while let Ok(newer) = receiver.try_recv() {
                    snapshot = newer;
                }
                if let Err(err) = disk.write(&snapshot) {
                    log::error!("failed to persist {}: {err}", disk.path.display());
                }
            }
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(err) => {
            log::warn!("could not start background writer, writes will be inline: {err}");
            None
        }
    }
}

fn load(path: &Path) -> BTreeMap<String, Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return BTreeMap::new(),
        Err(err) => {
            log::warn!("{}: unreadable, starting empty: {err}", path.display());
            return BTreeMap::new();
        }
    };
    serde_json::from_str(&content).unwrap_or_else(|err| {
        log::warn!("{}: corrupt, starting empty: {err}", path.display());
        BTreeMap::new()
    })
}

/// Keep store names usable as file names.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') { c } else { '_' })
        .collect()
}

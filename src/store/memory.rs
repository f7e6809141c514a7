//! In-memory entry store for tests and previews

use crate::{Entry, EntryId, EntryStore, Error, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Keeps entries in a `Mutex<HashMap>` and records every committed write
pub struct MemoryEntryStore {
    entries: Mutex<HashMap<EntryId, Entry>>,
    writes: Mutex<Vec<(EntryId, f32)>>,
    unavailable: AtomicBool,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        MemoryEntryStore {
            entries: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn insert(&self, entry: Entry) {
        let mut g = self.entries.lock().unwrap();
        g.insert(entry.id.clone(), entry);
    }

    /// Simulate a store that rejects every write.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Writes committed so far, in the order they were applied.
    pub fn writes(&self) -> Vec<(EntryId, f32)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn get(&self, id: &EntryId) -> Option<Entry> {
        self.entries.lock().unwrap().get(id).cloned()
    }
}

impl Default for MemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for MemoryEntryStore {
    fn load(&self, id: &EntryId) -> Result<Entry> {
        self.entries
            .lock()
            .map_err(|e| Error::StoreError(format!("store lock poisoned: {}", e)))?
            .get(id)
            .cloned()
            .ok_or_else(|| Error::EntryNotFound(id.to_string()))
    }

    fn update_screen_position(&self, id: &EntryId, position: f32) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::StoreError("store is unavailable".into()));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| Error::StoreError(format!("store lock poisoned: {}", e)))?;
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| Error::EntryNotFound(id.to_string()))?;
        entry.screen_position = position;
        if let Ok(mut w) = self.writes.lock() {
            w.push((id.clone(), position));
        }
        Ok(())
    }
}

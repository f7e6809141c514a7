//! Entry store backed by a single JSON file.
//!
//! The file holds an array of entries. Every committed write rewrites the file
//! through a temporary sibling and a rename so a crash never leaves a
//! half-written store behind.

use crate::{Entry, EntryId, EntryStore, Error, Result};
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct JsonFileEntryStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<EntryId, Entry>>,
}

impl JsonFileEntryStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            let list: Vec<Entry> = if text.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&text)?
            };
            list.into_iter().map(|e| (e.id.clone(), e)).collect()
        } else {
            BTreeMap::new()
        };
        debug!("opened entry store {} ({} entries)", path.display(), entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add or replace an entry and persist the store.
    pub fn upsert(&self, entry: Entry) -> Result<()> {
        let mut entries = self.lock()?;
        entries.insert(entry.id.clone(), entry);
        self.write_all(&entries)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<EntryId, Entry>>> {
        self.entries
            .lock()
            .map_err(|e| Error::StoreError(format!("store lock poisoned: {}", e)))
    }

    fn write_all(&self, entries: &BTreeMap<EntryId, Entry>) -> Result<()> {
        let list: Vec<&Entry> = entries.values().collect();
        let json = serde_json::to_string_pretty(&list)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl EntryStore for JsonFileEntryStore {
    fn load(&self, id: &EntryId) -> Result<Entry> {
        self.lock()?
            .get(id)
            .cloned()
            .ok_or_else(|| Error::EntryNotFound(id.to_string()))
    }

    fn update_screen_position(&self, id: &EntryId, position: f32) -> Result<()> {
        let mut entries = self.lock()?;
        let previous = {
            let entry = entries
                .get_mut(id)
                .ok_or_else(|| Error::EntryNotFound(id.to_string()))?;
            std::mem::replace(&mut entry.screen_position, position)
        };
        if let Err(e) = self.write_all(&entries) {
            // keep the cache consistent with what is on disk
            if let Some(entry) = entries.get_mut(id) {
                entry.screen_position = previous;
            }
            return Err(Error::StoreError(format!(
                "failed to persist {}: {}",
                self.path.display(),
                e
            )));
        }
        Ok(())
    }
}

//! Durable entry storage
//!
//! The controller reads an entry once per presentation and writes its scroll
//! offset back through the persistence worker. It never creates or deletes
//! entries.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileEntryStore;
pub use memory::MemoryEntryStore;

use crate::{Entry, EntryId, Result};

/// Access to the durable record of each entry
pub trait EntryStore: Send + Sync {
    /// Fetch an entry by identifier.
    fn load(&self, id: &EntryId) -> Result<Entry>;

    /// Commit a new raw scroll offset (device pixels) for an existing entry.
    fn update_screen_position(&self, id: &EntryId, position: f32) -> Result<()>;
}

use super::files::{atomic_write, ensure_dir, read_file};
use super::slots::{self, Slot};
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Raw read/write of slot contents
pub trait SlotStorage {
    /// Stored contents of `slot`, `None` if nothing was ever saved
    fn read(&self, slot: Slot) -> Result<Option<String>>;

    fn write(&mut self, slot: Slot, contents: &str) -> Result<()>;
}

/// Load and decode a slot. `None` when the slot is empty.
pub fn load_slot<T: DeserializeOwned>(storage: &dyn SlotStorage, slot: Slot) -> Result<Option<T>> {
    match storage.read(slot)? {
        Some(raw) if !raw.trim().is_empty() => slots::decode(slot, &raw).map(Some),
        _ => {
            debug!(slot = slot.key(), "slot empty, using defaults");
            Ok(None)
        }
    }
}

/// Encode and write a slot
pub fn save_slot<T: Serialize>(storage: &mut dyn SlotStorage, slot: Slot, state: &T) -> Result<()> {
    let raw = slots::encode(slot, state)?;
    storage.write(slot, &raw)?;
    debug!(slot = slot.key(), bytes = raw.len(), "slot saved");
    Ok(())
}

/// One JSON file per slot inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, slot: Slot) -> PathBuf {
        self.dir.join(slot.file_name())
    }
}

impl SlotStorage for FileStorage {
    fn read(&self, slot: Slot) -> Result<Option<String>> {
        read_file(self.slot_path(slot))
    }

    fn write(&mut self, slot: Slot, contents: &str) -> Result<()> {
        ensure_dir(&self.dir)?;
        atomic_write(self.slot_path(slot), contents)
    }
}

/// Keeps slots in memory; used by tests and throwaway contexts
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<Slot, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot with raw contents, as if an earlier run had written them
    pub fn with_raw(mut self, slot: Slot, contents: impl Into<String>) -> Self {
        self.slots.insert(slot, contents.into());
        self
    }

    pub fn raw(&self, slot: Slot) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }
}

impl SlotStorage for MemoryStorage {
    fn read(&self, slot: Slot) -> Result<Option<String>> {
        Ok(self.slots.get(&slot).cloned())
    }

    fn write(&mut self, slot: Slot, contents: &str) -> Result<()> {
        self.slots.insert(slot, contents.to_string());
        Ok(())
    }
}

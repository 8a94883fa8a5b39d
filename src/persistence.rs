// File: src/persistence.rs
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{Error, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Slot holding the serialized word -> occurrence-count map.
pub const WORD_FREQUENCY_SLOT: &str = "word_frequency";
/// Slot holding the serialized word -> similarity-set map.
pub const SIMILAR_WORDS_SLOT: &str = "similar_words";

/// Named string-valued slots backed by one JSON file per slot inside a store
/// directory. Writes go through a temp file in the same directory and are
/// renamed over the slot, so a slot is always either the old or the new
/// payload, never a torn write.
pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    pub fn open(dir: &Path) -> Result<Self, Error> {
        fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slot))
    }

    /// Raw payload of a slot, or `None` when the slot has never been written.
    pub fn get(&self, slot: &str) -> Option<String> {
        fs::read_to_string(self.slot_path(slot)).ok()
    }

    pub fn set(&self, slot: &str, value: &str) -> Result<(), Error> {
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.persist(self.slot_path(slot))?;
        Ok(())
    }
}

/// Deserializes a slot, treating a missing slot or a malformed payload as the
/// empty value. Corrupt persisted state costs the learned data, never the
/// session.
pub fn load_slot<T>(store: &KvStore, slot: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match store.get(slot) {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("discarding malformed '{}' slot: {}", slot, e);
            T::default()
        }),
        None => T::default(),
    }
}

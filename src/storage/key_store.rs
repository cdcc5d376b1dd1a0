//! Persisted key record
//!
//! The record is two sibling files, `key.text` and `id.text`. `ensure` loads
//! the key, or generates one on first run, and writes whichever file is
//! missing. Existing non-empty files are never overwritten.

use std::fmt;

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::config::paths::SoliPaths;
use crate::crypto::Key;
use crate::error::{SoliError, SoliResult};

use super::file_io::{clear_blank_text, read_text_or_empty, write_text_new, WriteOutcome};

/// A loaded or freshly generated key with its text form and identifier
pub struct KeyRecord {
    pub key: Key,
    pub key_text: Zeroizing<String>,
    pub id: String,
}

// Never print the encoded key
impl fmt::Debug for KeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRecord").field("id", &self.id).finish()
    }
}

/// Loads the key record, creating it on first run
#[derive(Debug, Clone)]
pub struct KeyStore {
    paths: SoliPaths,
}

impl KeyStore {
    pub fn new(paths: SoliPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &SoliPaths {
        &self.paths
    }

    /// Load the key record, generating and persisting a key if none exists
    ///
    /// The id is always re-derived from the key; a stale `id.text` is left on
    /// disk untouched and reported as a warning.
    pub fn ensure(&self) -> SoliResult<KeyRecord> {
        let key_path = self.paths.key_file();
        let id_path = self.paths.id_file();

        let stored_key = Zeroizing::new(read_text_or_empty(&key_path)?);
        let stored_id = read_text_or_empty(&id_path)?;

        let (key, key_text) = if stored_key.trim().is_empty() {
            self.create_key()?
        } else {
            let key = Key::decode(&stored_key)?;
            debug!(path = %key_path.display(), "loaded key");
            (key, Zeroizing::new(stored_key.trim().to_string()))
        };

        let id = key.id();

        if stored_id.trim().is_empty() {
            self.persist_id(&id)?;
        } else if stored_id.trim() != id {
            warn!(
                path = %id_path.display(),
                stored = stored_id.trim(),
                derived = %id,
                "id file does not match key; using derived id"
            );
        }

        Ok(KeyRecord { key, key_text, id })
    }

    /// Generate a key and persist it, adopting a concurrent winner's key
    fn create_key(&self) -> SoliResult<(Key, Zeroizing<String>)> {
        self.paths.ensure_directories()?;
        // A blank key file holds nothing worth preserving
        clear_blank_text(self.paths.key_file())?;
        self.persist_new_key(Key::generate())
    }

    fn persist_new_key(&self, key: Key) -> SoliResult<(Key, Zeroizing<String>)> {
        let key_path = self.paths.key_file();
        let key_text = key.encode()?;

        match write_text_new(&key_path, &key_text)? {
            WriteOutcome::Created => {
                info!(path = %key_path.display(), id = %key.id(), "generated new key");
                Ok((key, key_text))
            }
            WriteOutcome::AlreadyExists => {
                // Another process created the key first; use theirs so the
                // id written next matches the key on disk
                let winner = Zeroizing::new(read_text_or_empty(&key_path)?);
                if winner.trim().is_empty() {
                    return Err(SoliError::Io(format!(
                        "Key file {} appeared but is empty",
                        key_path.display()
                    )));
                }
                let adopted = Key::decode(&winner)?;
                warn!(
                    path = %key_path.display(),
                    id = %adopted.id(),
                    "key created concurrently; adopting it"
                );
                Ok((adopted, Zeroizing::new(winner.trim().to_string())))
            }
        }
    }

    fn persist_id(&self, id: &str) -> SoliResult<()> {
        let id_path = self.paths.id_file();
        self.paths.ensure_directories()?;
        clear_blank_text(&id_path)?;

        match write_text_new(&id_path, id)? {
            WriteOutcome::Created => info!(path = %id_path.display(), "wrote id"),
            WriteOutcome::AlreadyExists => {
                let stored = read_text_or_empty(&id_path)?;
                if stored.trim() == id {
                    debug!(path = %id_path.display(), "id already present");
                } else {
                    warn!(
                        path = %id_path.display(),
                        stored = stored.trim(),
                        derived = %id,
                        "id file written concurrently does not match key"
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn store_in(temp_dir: &TempDir) -> KeyStore {
        KeyStore::new(SoliPaths::with_base_dir(temp_dir.path().join("soli")))
    }

    fn modified(path: &std::path::Path) -> SystemTime {
        fs::metadata(path).unwrap().modified().unwrap()
    }

    #[test]
    fn test_first_run_creates_both_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let record = store.ensure().unwrap();

        let key_on_disk = fs::read_to_string(store.paths().key_file()).unwrap();
        let id_on_disk = fs::read_to_string(store.paths().id_file()).unwrap();
        assert_eq!(key_on_disk, record.key_text.as_str());
        assert_eq!(id_on_disk, record.id);
        assert_eq!(record.key.id(), record.id);
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let first = store.ensure().unwrap();
        let second = store.ensure().unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.key_text.as_str(), second.key_text.as_str());
    }

    #[test]
    fn test_prepopulated_record_is_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.paths().base_dir()).unwrap();

        let key = Key::generate();
        let key_text = key.encode().unwrap();
        fs::write(store.paths().key_file(), key_text.as_str()).unwrap();
        fs::write(store.paths().id_file(), key.id()).unwrap();
        let key_mtime = modified(&store.paths().key_file());
        let id_mtime = modified(&store.paths().id_file());

        let record = store.ensure().unwrap();

        assert_eq!(record.id, key.id());
        assert_eq!(record.key_text.as_str(), key_text.as_str());
        assert_eq!(modified(&store.paths().key_file()), key_mtime);
        assert_eq!(modified(&store.paths().id_file()), id_mtime);
        assert_eq!(fs::read_dir(store.paths().base_dir()).unwrap().count(), 2);
    }

    #[test]
    fn test_stale_id_is_not_rewritten() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.paths().base_dir()).unwrap();

        let key = Key::generate();
        fs::write(store.paths().key_file(), key.encode().unwrap().as_str()).unwrap();
        fs::write(store.paths().id_file(), "age1stale").unwrap();

        let record = store.ensure().unwrap();

        assert_eq!(record.id, key.id());
        assert_eq!(
            fs::read_to_string(store.paths().id_file()).unwrap(),
            "age1stale"
        );
    }

    #[test]
    fn test_missing_id_is_written_from_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.paths().base_dir()).unwrap();

        let key = Key::generate();
        fs::write(store.paths().key_file(), key.encode().unwrap().as_str()).unwrap();

        store.ensure().unwrap();
        assert_eq!(fs::read_to_string(store.paths().id_file()).unwrap(), key.id());
    }

    #[test]
    fn test_trailing_newline_in_key_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.paths().base_dir()).unwrap();

        let key = Key::generate();
        fs::write(
            store.paths().key_file(),
            format!("{}\n", key.encode().unwrap().as_str()),
        )
        .unwrap();

        assert_eq!(store.ensure().unwrap().id, key.id());
    }

    #[test]
    fn test_empty_key_file_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.paths().base_dir()).unwrap();
        fs::write(store.paths().key_file(), "").unwrap();
        fs::write(store.paths().id_file(), "").unwrap();

        let record = store.ensure().unwrap();

        assert_eq!(
            fs::read_to_string(store.paths().key_file()).unwrap(),
            record.key_text.as_str()
        );
        assert_eq!(fs::read_to_string(store.paths().id_file()).unwrap(), record.id);
        assert_eq!(store.ensure().unwrap().id, record.id);
        assert_eq!(fs::read_dir(store.paths().base_dir()).unwrap().count(), 2);
    }

    #[test]
    fn test_losing_writer_adopts_winner_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.paths().base_dir()).unwrap();

        // The other process linked its key in first
        let winner = Key::generate();
        let winner_text = winner.encode().unwrap();
        fs::write(store.paths().key_file(), winner_text.as_str()).unwrap();

        let (adopted, adopted_text) = store.persist_new_key(Key::generate()).unwrap();
        assert_eq!(adopted.id(), winner.id());
        assert_eq!(adopted_text.as_str(), winner_text.as_str());
        assert_eq!(
            fs::read_to_string(store.paths().key_file()).unwrap(),
            winner_text.as_str()
        );

        store.persist_id(&adopted.id()).unwrap();
        assert_eq!(
            fs::read_to_string(store.paths().id_file()).unwrap(),
            winner.id()
        );
    }

    #[test]
    fn test_id_written_concurrently_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.paths().base_dir()).unwrap();
        fs::write(store.paths().id_file(), "age1other").unwrap();

        store.persist_id("age1mine").unwrap();
        assert_eq!(
            fs::read_to_string(store.paths().id_file()).unwrap(),
            "age1other"
        );
    }

    #[test]
    fn test_malformed_key_is_decode_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.paths().base_dir()).unwrap();
        fs::write(store.paths().key_file(), "garbage").unwrap();

        let err = store.ensure().unwrap_err();
        assert!(matches!(err, SoliError::Decode(_)));
        // nothing written alongside the bad key
        assert!(!store.paths().id_file().exists());
    }
}

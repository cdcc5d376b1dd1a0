//! Per-process key session
//!
//! Built once at startup from the key store and handed to each command.

use std::fmt;

use zeroize::Zeroizing;

use crate::config::paths::SoliPaths;
use crate::crypto::{Key, Keyring};
use crate::error::SoliResult;
use crate::storage::KeyStore;

/// The loaded key, its identifier and the keyring used for decryption
pub struct Session {
    paths: SoliPaths,
    key: Key,
    key_text: Zeroizing<String>,
    id: String,
    keyring: Keyring,
}

impl Session {
    /// Open a session from the environment-resolved key record
    pub fn open() -> SoliResult<Self> {
        Self::open_with(SoliPaths::new()?)
    }

    /// Open a session from an explicit key record location
    pub fn open_with(paths: SoliPaths) -> SoliResult<Self> {
        let record = KeyStore::new(paths.clone()).ensure()?;
        let keyring = Keyring::new(record.key.clone());

        Ok(Self {
            paths,
            key: record.key,
            key_text: record.key_text,
            id: record.id,
            keyring,
        })
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Encoded key as persisted in `key.text`
    pub fn key_text(&self) -> &str {
        &self.key_text
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn keyring(&self) -> &Keyring {
        &self.keyring
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_dir", self.paths.base_dir())
            .field("id", &self.id)
            .finish()
    }
}

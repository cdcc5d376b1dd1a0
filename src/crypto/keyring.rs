//! Keys a decrypt operation may try

use super::key::Key;

/// A collection of keys used to find the one a message was encrypted to
#[derive(Debug, Clone, Default)]
pub struct Keyring {
    keys: Vec<Key>,
}

impl Keyring {
    /// Create a keyring holding a single key
    pub fn new(key: Key) -> Self {
        Self { keys: vec![key] }
    }

    #[cfg(test)]
    pub(crate) fn add(&mut self, key: Key) {
        self.keys.push(key);
    }

    /// Identifiers of every key in the ring
    pub fn ids(&self) -> Vec<String> {
        self.keys.iter().map(Key::id).collect()
    }

    pub(crate) fn identities(&self) -> impl Iterator<Item = &dyn age::Identity> {
        self.keys
            .iter()
            .map(|key| key.identity() as &dyn age::Identity)
    }
}

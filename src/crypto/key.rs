//! The persisted keypair
//!
//! A `Key` wraps an age X25519 identity. Its textual encoding is the Bech32
//! `AGE-SECRET-KEY-1...` string and its identifier is the matching `age1...`
//! recipient string.

use std::fmt;
use std::str::FromStr;

use age::secrecy::ExposeSecret;
use age::x25519;
use bech32::{FromBase32, Variant};
use zeroize::Zeroizing;

use crate::error::{SoliError, SoliResult};

/// Human-readable part of an encoded secret key (Bech32 decodes to lowercase)
const SECRET_KEY_HRP: &str = "age-secret-key-";

/// Length of the raw X25519 secret scalar
pub const PRIVATE_KEY_LEN: usize = 32;

/// An asymmetric keypair with a derived public identifier
#[derive(Clone)]
pub struct Key {
    identity: x25519::Identity,
}

impl Key {
    /// Generate a fresh keypair from the OS RNG
    pub fn generate() -> Self {
        Self {
            identity: x25519::Identity::generate(),
        }
    }

    /// Decode a key from its text encoding
    ///
    /// Surrounding whitespace (e.g. a trailing newline added by an editor) is
    /// ignored.
    pub fn decode(text: &str) -> SoliResult<Self> {
        x25519::Identity::from_str(text.trim())
            .map(|identity| Self { identity })
            .map_err(|e| SoliError::Decode(format!("Invalid key text: {}", e)))
    }

    /// Encode the key as text
    pub fn encode(&self) -> SoliResult<Zeroizing<String>> {
        let secret = self.identity.to_string();
        let text = Zeroizing::new(secret.expose_secret().to_string());
        if text.is_empty() {
            return Err(SoliError::Encode("Key encoded to an empty string".into()));
        }
        Ok(text)
    }

    /// Public identifier, usable as an encryption recipient
    pub fn id(&self) -> String {
        self.identity.to_public().to_string()
    }

    /// Raw private key material
    ///
    /// age does not expose the scalar directly, so it is recovered from the
    /// Bech32 text encoding.
    pub fn private(&self) -> SoliResult<Zeroizing<Vec<u8>>> {
        let encoded = self.encode()?;
        let (hrp, data, variant) = bech32::decode(&encoded)
            .map_err(|e| SoliError::Encode(format!("Key text is not Bech32: {}", e)))?;

        if hrp != SECRET_KEY_HRP || !matches!(variant, Variant::Bech32) {
            return Err(SoliError::Encode(format!(
                "Unexpected key prefix `{}`",
                hrp
            )));
        }

        let bytes = Zeroizing::new(
            Vec::<u8>::from_base32(&data)
                .map_err(|e| SoliError::Encode(format!("Malformed key payload: {}", e)))?,
        );
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(SoliError::Encode(format!(
                "Expected {} private key bytes, found {}",
                PRIVATE_KEY_LEN,
                bytes.len()
            )));
        }
        Ok(bytes)
    }

    pub(crate) fn identity(&self) -> &x25519::Identity {
        &self.identity
    }
}

// Never print secret material
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key").field("id", &self.id()).finish()
    }
}

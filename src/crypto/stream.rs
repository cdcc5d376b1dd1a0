//! Streaming encrypt/decrypt over the age format
//!
//! Both directions copy incrementally; the payload is never held in memory as
//! a whole. Encrypted output is ASCII-armored, and decryption accepts armored
//! or binary input.

use std::io::{self, Read, Write};
use std::str::FromStr;

use age::armor::{ArmoredReader, ArmoredWriter, Format};
use age::x25519;

use crate::error::{SoliError, SoliResult};

use super::keyring::Keyring;

/// Encrypt everything read from `input` to `recipient_id`, writing to `output`
///
/// Returns the number of plaintext bytes consumed. `output` is flushed before
/// returning.
pub fn encrypt<R: Read, W: Write>(
    mut input: R,
    output: W,
    recipient_id: &str,
) -> SoliResult<u64> {
    let recipient = x25519::Recipient::from_str(recipient_id.trim()).map_err(|e| {
        SoliError::Encryption(format!("Invalid recipient `{}`: {}", recipient_id, e))
    })?;

    let encryptor =
        age::Encryptor::with_recipients(std::iter::once(&recipient as &dyn age::Recipient))
            .map_err(|e| SoliError::Encryption(e.to_string()))?;

    let armored = ArmoredWriter::wrap_output(output, Format::AsciiArmor)?;
    let mut writer = encryptor.wrap_output(armored)?;

    let copied = io::copy(&mut input, &mut writer)?;

    // Both layers must be finished or the output is truncated
    let armored = writer.finish()?;
    let mut output = armored.finish()?;
    output.flush()?;

    Ok(copied)
}

/// Decrypt everything read from `input` with a key from `keyring`
///
/// Returns the number of plaintext bytes written to `output`, which is
/// flushed before returning. Authentication failures in the payload surface
/// as `Decryption` errors.
pub fn decrypt<R: Read, W: Write>(input: R, mut output: W, keyring: &Keyring) -> SoliResult<u64> {
    let decryptor = age::Decryptor::new(ArmoredReader::new(input))
        .map_err(|e| SoliError::Decryption(e.to_string()))?;

    let mut reader = decryptor
        .decrypt(keyring.identities())
        .map_err(|e| SoliError::Decryption(e.to_string()))?;

    let copied =
        io::copy(&mut reader, &mut output).map_err(|e| SoliError::Decryption(e.to_string()))?;
    output.flush()?;

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Key;

    fn seal(plaintext: &[u8], key: &Key) -> Vec<u8> {
        let mut ciphertext = Vec::new();
        let n = encrypt(plaintext, &mut ciphertext, &key.id()).unwrap();
        assert_eq!(n, plaintext.len() as u64);
        ciphertext
    }

    #[test]
    fn test_encrypt_decrypt() {
        let key = Key::generate();
        let ciphertext = seal(b"attack at dawn", &key);

        let mut plaintext = Vec::new();
        let n = decrypt(&ciphertext[..], &mut plaintext, &Keyring::new(key)).unwrap();

        assert_eq!(plaintext, b"attack at dawn");
        assert_eq!(n, 14);
    }

    #[test]
    fn test_output_is_armored() {
        let key = Key::generate();
        let ciphertext = seal(b"hello", &key);
        let text = String::from_utf8(ciphertext).unwrap();

        assert!(text.starts_with("-----BEGIN AGE ENCRYPTED FILE-----"));
        assert!(text.trim_end().ends_with("-----END AGE ENCRYPTED FILE-----"));
    }

    #[test]
    fn test_empty_input() {
        let key = Key::generate();
        let ciphertext = seal(b"", &key);

        let mut plaintext = Vec::new();
        decrypt(&ciphertext[..], &mut plaintext, &Keyring::new(key)).unwrap();
        assert!(plaintext.is_empty());
    }

    #[test]
    fn test_multi_chunk_payload() {
        // age chunks at 64 KiB
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let key = Key::generate();
        let ciphertext = seal(&data, &key);

        let mut plaintext = Vec::new();
        decrypt(&ciphertext[..], &mut plaintext, &Keyring::new(key)).unwrap();
        assert_eq!(plaintext, data);
    }

    #[test]
    fn test_wrong_key_fails() {
        let ciphertext = seal(b"secret", &Key::generate());

        let mut plaintext = Vec::new();
        let err = decrypt(&ciphertext[..], &mut plaintext, &Keyring::new(Key::generate()))
            .unwrap_err();
        assert!(matches!(err, SoliError::Decryption(_)));
        assert!(plaintext.is_empty());
    }

    #[test]
    fn test_keyring_searches_all_keys() {
        let target = Key::generate();
        let ciphertext = seal(b"found it", &target);

        let mut keyring = Keyring::new(Key::generate());
        keyring.add(target);

        let mut plaintext = Vec::new();
        decrypt(&ciphertext[..], &mut plaintext, &keyring).unwrap();
        assert_eq!(plaintext, b"found it");
    }

    #[test]
    fn test_garbage_input_fails() {
        let mut plaintext = Vec::new();
        let err = decrypt(
            &b"definitely not an age file"[..],
            &mut plaintext,
            &Keyring::new(Key::generate()),
        )
        .unwrap_err();
        assert!(matches!(err, SoliError::Decryption(_)));
    }

    #[test]
    fn test_invalid_recipient() {
        let mut out = Vec::new();
        let err = encrypt(&b"x"[..], &mut out, "age1nope").unwrap_err();
        assert!(matches!(err, SoliError::Encryption(_)));
        assert!(out.is_empty());
    }
}

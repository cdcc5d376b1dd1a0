//! Encrypt and decrypt CLI commands
//!
//! Both commands stream standard input to standard output.

use std::io::{self, BufWriter};

use tracing::debug;

use crate::crypto::stream::{decrypt, encrypt};
use crate::error::SoliResult;
use crate::session::Session;

/// Encrypt stdin to the session key, writing armored ciphertext to stdout
pub fn handle_encrypt_command(session: &Session) -> SoliResult<()> {
    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());

    let bytes = encrypt(stdin, stdout, session.id())?;
    debug!(bytes, recipient = session.id(), "encrypted stdin");
    Ok(())
}

/// Decrypt stdin with the session keyring, writing plaintext to stdout
pub fn handle_decrypt_command(session: &Session) -> SoliResult<()> {
    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());

    let keyring = session.keyring();
    debug!(ids = ?keyring.ids(), "trying keyring");
    let bytes = decrypt(stdin, stdout, keyring)?;
    debug!(bytes, "decrypted stdin");
    Ok(())
}

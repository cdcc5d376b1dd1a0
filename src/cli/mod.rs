//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the key session.

pub mod key;
pub mod stream;

pub use key::{handle_key_command, KeyArgs};
pub use stream::{handle_decrypt_command, handle_encrypt_command};

/// Usage text printed for a missing or unknown command
pub const USAGE: &str = "usage: soli command
commands:
\tencrypt
\tdecrypt
\tkey";

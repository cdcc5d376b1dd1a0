//! Cryptographic functions for soli
//!
//! Key generation, encoding and the streaming encryption format all come
//! from the age crate; this module adapts them to soli's key record.

pub mod key;
pub mod keyring;
pub mod stream;

pub use key::Key;
pub use keyring::Keyring;
pub use stream::{decrypt, encrypt};

//! Storage layer for soli
//!
//! Persists the key record as plain text files with atomic, non-clobbering
//! writes.

pub mod file_io;
pub mod key_store;

pub use key_store::{KeyRecord, KeyStore};

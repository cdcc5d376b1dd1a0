//! soli - keep one age keypair on disk and use it from the terminal
//!
//! On every run soli loads its key from `$HOME/config/soli/key.text`, or
//! generates and persists one on first use, then encrypts stdin to that key,
//! decrypts stdin with it, or prints the key material in several bases.
//!
//! # Architecture
//!
//! - `config`: Path resolution for the key record
//! - `error`: Custom error types
//! - `crypto`: Keys, keyring and the streaming age format
//! - `storage`: Key record persistence
//! - `display`: Multi-base rendering and report formatting
//! - `session`: The per-process key session
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use soli::session::Session;
//!
//! let session = Session::open()?;
//! println!("{}", session.id());
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod session;
pub mod storage;
pub mod telemetry;

pub use error::{SoliError, SoliResult};
pub use session::Session;

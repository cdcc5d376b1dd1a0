//! Path management for soli
//!
//! The key record always lives in `$HOME/config/soli`.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::SoliError;

/// Manages the paths of the persisted key record
#[derive(Debug, Clone)]
pub struct SoliPaths {
    /// Directory holding `key.text` and `id.text`
    base_dir: PathBuf,
}

impl SoliPaths {
    /// Resolve paths from the process environment
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if `HOME` is unset or empty. Nothing on disk
    /// is touched.
    pub fn new() -> Result<Self, SoliError> {
        let base_dir = resolve_base_dir(std::env::var_os("HOME"))?;
        Ok(Self { base_dir })
    }

    /// Create SoliPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Path to the encoded private key
    pub fn key_file(&self) -> PathBuf {
        self.base_dir.join("key.text")
    }

    /// Path to the textual key identifier
    pub fn id_file(&self) -> PathBuf {
        self.base_dir.join("id.text")
    }

    /// Ensure the base directory exists, owner-only on unix
    pub fn ensure_directories(&self) -> Result<(), SoliError> {
        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder
            .create(&self.base_dir)
            .map_err(|e| SoliError::Io(format!("Failed to create config directory: {}", e)))
    }
}

/// Derive the base directory from the value of `HOME`
fn resolve_base_dir(home: Option<OsString>) -> Result<PathBuf, SoliError> {
    match home.filter(|v| !v.is_empty()) {
        Some(home) => Ok(PathBuf::from(home).join("config").join("soli")),
        None => Err(SoliError::Config("$HOME empty".into())),
    }
}

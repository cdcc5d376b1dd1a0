//! File I/O utilities with atomic, non-clobbering writes
//!
//! Key record files are written to a sibling temp file, synced, and then
//! hard-linked into place. Linking fails when the target already exists, so a
//! file appears complete or not at all and is never overwritten.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::error::SoliError;

/// Result of a non-clobbering write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created with the given contents
    Created,
    /// Another file was already in place; nothing was written
    AlreadyExists,
}

/// Read a text file, returning an empty string if it doesn't exist
pub fn read_text_or_empty<P: AsRef<Path>>(path: P) -> Result<String, SoliError> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(SoliError::Io(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Write a text file only if it does not exist yet
pub fn write_text_new<P: AsRef<Path>>(path: P, contents: &str) -> Result<WriteOutcome, SoliError> {
    let path = path.as_ref();
    let temp_path = write_temp(path, contents)?;

    let linked = fs::hard_link(&temp_path, path);
    let _ = fs::remove_file(&temp_path);

    match linked {
        Ok(()) => Ok(WriteOutcome::Created),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(WriteOutcome::AlreadyExists),
        // Filesystems without hard links still get exclusive creation
        Err(_) => write_exclusive(path, contents),
    }
}

/// Clear a file that holds only whitespace so `write_text_new` can claim it
///
/// The file is renamed aside before it is inspected. If another process
/// filled it in the meantime, the contents are linked back into place.
pub fn clear_blank_text<P: AsRef<Path>>(path: P) -> Result<(), SoliError> {
    let path = path.as_ref();
    let aside = sibling_path(path, "blank");

    match fs::rename(path, &aside) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(SoliError::Io(format!(
                "Failed to move {} aside: {}",
                path.display(),
                e
            )))
        }
    }

    let contents = read_text_or_empty(&aside).map(Zeroizing::new);
    let restored = match contents {
        Ok(ref text) if !text.trim().is_empty() => match fs::hard_link(&aside, path) {
            Err(e) if e.kind() != io::ErrorKind::AlreadyExists => Err(SoliError::Io(format!(
                "Failed to restore {}: {}",
                path.display(),
                e
            ))),
            _ => Ok(()),
        },
        Ok(_) => Ok(()),
        Err(e) => Err(e),
    };
    let _ = fs::remove_file(&aside);
    restored
}

/// Write `contents` to a fresh temp file next to `path` and sync it
fn write_temp(path: &Path, contents: &str) -> Result<PathBuf, SoliError> {
    let temp_path = sibling_path(path, "tmp");

    // Leftover from an earlier run with the same pid
    match fs::remove_file(&temp_path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => {
            return Err(SoliError::Io(format!(
                "Failed to remove stale temp file {}: {}",
                temp_path.display(),
                e
            )))
        }
        _ => {}
    }

    let mut file = open_owner_only(&temp_path)
        .map_err(|e| SoliError::Io(format!("Failed to create temp file: {}", e)))?;

    let written = file
        .write_all(contents.as_bytes())
        .and_then(|()| file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(SoliError::Io(format!(
            "Failed to write {}: {}",
            temp_path.display(),
            e
        )));
    }

    Ok(temp_path)
}

fn write_exclusive(path: &Path, contents: &str) -> Result<WriteOutcome, SoliError> {
    let mut file = match open_owner_only(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(WriteOutcome::AlreadyExists)
        }
        Err(e) => {
            return Err(SoliError::Io(format!(
                "Failed to create {}: {}",
                path.display(),
                e
            )))
        }
    };

    file.write_all(contents.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| SoliError::Io(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok(WriteOutcome::Created)
}

/// Create a new file readable and writable by the owner only
fn open_owner_only(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

/// Scratch names carry the pid so concurrent processes never share one
fn sibling_path(path: &Path, tag: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.{}", tag, std::process::id()));
    path.with_file_name(name)
}

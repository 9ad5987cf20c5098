//! Exclusive lock file serializing writers of the user metadata JSONL.
//!
//! The lock lives next to the metadata file as `<meta>.lock`, is created
//! with `create_new` and removed on drop. The holder stamps it with its pid
//! and acquisition time. A stamp older than the stale timeout means the
//! holder died without cleaning up; the next writer removes the file and
//! tries once more.

use chrono::{DateTime, Utc};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use unread_kernel::StoreError;

pub fn lock_path_for(meta_path: &Path) -> PathBuf {
    let mut path: OsString = meta_path.as_os_str().to_os_string();
    path.push(".lock");
    PathBuf::from(path)
}

/// Held for the duration of one load-modify-save of the metadata file.
#[derive(Debug)]
pub struct MetaLock {
    path: PathBuf,
    file: File,
}

impl MetaLock {
    /// Take the lock guarding `meta_path`.
    ///
    /// Fails with `StoreError::Unavailable` while another writer holds a
    /// lock younger than `stale_after`.
    pub fn acquire(meta_path: &Path, stale_after: Duration) -> Result<Self, StoreError> {
        let path = lock_path_for(meta_path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        match Self::create(&path) {
            Ok(lock) => return Ok(lock),
            Err(e) if e.kind() != io::ErrorKind::AlreadyExists => return Err(io_error(&path, e)),
            Err(_) => {}
        }

        let age = lock_age(&path);
        if age.is_none_or(|age| age < stale_after) {
            tracing::warn!(lock = %path.display(), "user-meta lock busy");
            return Err(busy(&path));
        }

        tracing::warn!(
            lock = %path.display(),
            age_secs = age.map(|age| age.as_secs()),
            "reclaiming stale user-meta lock"
        );
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_error(&path, e)),
        }
        Self::create(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                busy(&path)
            } else {
                io_error(&path, e)
            }
        })
    }

    fn create(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let mut lock = Self {
            path: path.to_path_buf(),
            file,
        };
        // A failed stamp drops `lock`, which removes the file again.
        writeln!(
            lock.file,
            "pid={}\nutc={}",
            std::process::id(),
            Utc::now().to_rfc3339()
        )?;
        Ok(lock)
    }
}

impl Drop for MetaLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Time since the lock was stamped, falling back to its mtime when the
/// `utc=` line is missing or unreadable. `None` for stamps in the future.
fn lock_age(path: &Path) -> Option<Duration> {
    let text = fs::read_to_string(path).ok()?;
    let stamped = text
        .lines()
        .find_map(|line| line.strip_prefix("utc="))
        .and_then(|value| DateTime::parse_from_rfc3339(value.trim()).ok())
        .map(|at| at.with_timezone(&Utc));
    let since = match stamped {
        Some(at) => at,
        None => DateTime::<Utc>::from(fs::metadata(path).ok()?.modified().ok()?),
    };
    (Utc::now() - since).to_std().ok()
}

fn busy(path: &Path) -> StoreError {
    StoreError::Unavailable(format!("user-meta lock busy: {}", path.display()))
}

fn io_error(path: &Path, err: io::Error) -> StoreError {
    StoreError::Io(format!("{}: {err}", path.display()))
}

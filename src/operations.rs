//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the backup, retention and
//! cleanup phases can be unit-tested with injected failures.  Production code
//! uses [`SystemFileSystemOps`]; tests use `FailingFileSystemOps`.

use anyhow::Result;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Type and modification time of a filesystem entry, without following
/// symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryInfo {
    /// `true` for real directories; symlinks to directories report `false`.
    pub is_dir: bool,
    /// Last modification time.
    pub modified: SystemTime,
}

/// Abstraction over the filesystem calls made by maintenance phases.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists and is a directory (following symlinks).
    fn is_dir(&self, path: &Path) -> bool;

    /// Returns the immediate child paths inside `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Type and modification time of `path` (symlinks are not followed).
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata cannot be read.
    fn entry(&self, path: &Path) -> io::Result<EntryInfo>;

    /// Create `path` and all missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a file or symlink.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is not empty or removal fails.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory and everything below it.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of the tree cannot be removed.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = std::fs::read_dir(path)?
            .map(|e| e.map(|entry| entry.path()).map_err(Into::into))
            .collect::<Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }

    fn entry(&self, path: &Path) -> io::Result<EntryInfo> {
        let meta = std::fs::symlink_metadata(path)?;
        Ok(EntryInfo {
            is_dir: meta.is_dir(),
            modified: meta.modified()?,
        })
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }
}

/// Real filesystem with injected failures, for unit tests.
///
/// Any mutating call whose path is listed in `fail_on` returns
/// `PermissionDenied` without touching the disk.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FailingFileSystemOps {
    fail_on: Vec<PathBuf>,
}

#[cfg(test)]
impl FailingFileSystemOps {
    /// Fail every mutating call on `path`.
    #[must_use]
    pub fn failing(path: impl Into<PathBuf>) -> Self {
        Self {
            fail_on: vec![path.into()],
        }
    }

    fn check(&self, path: &Path) -> io::Result<()> {
        if self.fail_on.iter().any(|p| p == path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "injected failure",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
impl FileSystemOps for FailingFileSystemOps {
    fn is_dir(&self, path: &Path) -> bool {
        SystemFileSystemOps.is_dir(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        SystemFileSystemOps.read_dir(path)
    }

    fn entry(&self, path: &Path) -> io::Result<EntryInfo> {
        SystemFileSystemOps.entry(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        SystemFileSystemOps.create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        SystemFileSystemOps.remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        SystemFileSystemOps.remove_dir(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        SystemFileSystemOps.remove_dir_all(path)
    }
}

//! Age-based removal of filesystem entries.
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::operations::FileSystemOps;

/// An entry that could not be inspected or removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneFailure {
    /// Path of the entry.
    pub path: PathBuf,
    /// Error description.
    pub reason: String,
}

/// Outcome of a prune pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneReport {
    /// Entries removed (or, in dry-run mode, that would be removed).
    pub removed: Vec<PathBuf>,
    /// Entries that could not be handled.
    pub failures: Vec<PruneFailure>,
}

/// Age policy shared by one prune pass.
#[derive(Debug, Clone, Copy)]
pub struct PrunePolicy<'a> {
    /// Filesystem backend.
    pub fs: &'a dyn FileSystemOps,
    /// Entries strictly older than this are removed.
    pub max_age: Duration,
    /// Reference time for age computation.
    pub now: SystemTime,
    /// Report removals without performing them.
    pub dry_run: bool,
}

impl PrunePolicy<'_> {
    /// Whether an entry modified at `modified` is older than the threshold.
    ///
    /// Modification times in the future count as fresh.
    #[must_use]
    pub fn is_expired(&self, modified: SystemTime) -> bool {
        self.now
            .duration_since(modified)
            .is_ok_and(|age| age > self.max_age)
    }

    /// Remove the immediate children of `dir` that are older than the
    /// threshold, deleting expired directories with all their contents.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` itself cannot be listed; failures on
    /// individual entries are collected in the report instead.
    pub fn prune_top_level(&self, dir: &Path) -> Result<PruneReport> {
        let mut report = PruneReport::default();
        for path in self.fs.read_dir(dir)? {
            let info = match self.fs.entry(&path) {
                Ok(info) => info,
                Err(e) => {
                    report.fail(path, &e);
                    continue;
                }
            };
            if !self.is_expired(info.modified) {
                continue;
            }
            if info.is_dir {
                self.remove(&mut report, path, |p| self.fs.remove_dir_all(p));
            } else {
                self.remove(&mut report, path, |p| self.fs.remove_file(p));
            }
        }
        Ok(report)
    }

    /// Recursively remove entries below `dir` that are older than the
    /// threshold.
    ///
    /// Files and symlinks are removed when expired.  Directories are
    /// descended into first and removed only when they are themselves
    /// expired and every child was removed.  `dir` itself is never removed.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` itself cannot be listed.
    pub fn prune_tree(&self, dir: &Path) -> Result<PruneReport> {
        let mut report = PruneReport::default();
        self.prune_children(dir, &mut report)?;
        Ok(report)
    }

    /// Returns `true` if every child of `dir` was removed.
    fn prune_children(&self, dir: &Path, report: &mut PruneReport) -> Result<bool> {
        let mut emptied = true;
        for path in self.fs.read_dir(dir)? {
            emptied &= self.prune_entry(path, report);
        }
        Ok(emptied)
    }

    /// Returns `true` if `path` was removed.
    fn prune_entry(&self, path: PathBuf, report: &mut PruneReport) -> bool {
        let info = match self.fs.entry(&path) {
            Ok(info) => info,
            Err(e) => {
                report.fail(path, &e);
                return false;
            }
        };
        // Captured before descending: removing children bumps the mtime.
        let expired = self.is_expired(info.modified);

        if info.is_dir {
            let emptied = match self.prune_children(&path, report) {
                Ok(emptied) => emptied,
                Err(e) => {
                    report.fail(path, &format!("{e:#}"));
                    return false;
                }
            };
            if !(expired && emptied) {
                return false;
            }
            self.remove(report, path, |p| self.fs.remove_dir(p))
        } else {
            if !expired {
                return false;
            }
            self.remove(report, path, |p| self.fs.remove_file(p))
        }
    }

    fn remove(
        &self,
        report: &mut PruneReport,
        path: PathBuf,
        op: impl FnOnce(&Path) -> std::io::Result<()>,
    ) -> bool {
        if self.dry_run {
            report.removed.push(path);
            return true;
        }
        match op(&path) {
            Ok(()) => {
                report.removed.push(path);
                true
            }
            Err(e) => {
                report.fail(path, &e);
                false
            }
        }
    }
}

impl PruneReport {
    fn fail(&mut self, path: PathBuf, reason: &dyn std::fmt::Display) {
        self.failures.push(PruneFailure {
            path,
            reason: reason.to_string(),
        });
    }
}

use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};

/// Shared context for phase execution.
pub struct Context {
    /// Configuration loaded at startup; read-only for the whole run.
    pub config: Arc<Config>,
    /// Logger for output and phase recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (log actions without applying them).
    pub dry_run: bool,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Filesystem operation abstraction (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Wall-clock time the run started; dates backups and ages entries.
    pub started_at: DateTime<Local>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("executor", &"<dyn Executor>")
            .field("fs_ops", &self.fs_ops)
            .field("started_at", &self.started_at)
            .finish()
    }
}

impl Context {
    /// Creates a new context for phase execution, stamped with the current
    /// time.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            config,
            log,
            dry_run,
            executor,
            fs_ops: Arc::new(SystemFileSystemOps),
            started_at: Local::now(),
        }
    }

    /// Reference time for age thresholds.
    #[must_use]
    pub fn now(&self) -> SystemTime {
        SystemTime::from(self.started_at)
    }

    /// Name of today's backup directory (`YYYYMMDD`).
    #[must_use]
    pub fn backup_date(&self) -> String {
        self.started_at.format("%Y%m%d").to_string()
    }

    /// Create a copy of this context with a fixed start time.
    #[must_use]
    pub fn with_started_at(mut self, started_at: DateTime<Local>) -> Self {
        self.started_at = started_at;
        self
    }

    /// Create a copy of this context with a different [`FileSystemOps`]
    /// implementation.
    #[must_use]
    pub fn with_fs_ops(mut self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        self.fs_ops = fs_ops;
        self
    }
}

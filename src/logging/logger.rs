//! Structured logger with dry-run awareness and summary collection.
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::types::{Log, TaskEntry, TaskStatus};
use super::utils::{DRY_RUN_TARGET, SECTION_TARGET};

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with summary collection.
///
/// Messages are emitted as `tracing` events; the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) writes them to the
/// console and appends them to the configured log file.
///
/// `Logger::default()` has no log file to report in the summary; it is used
/// for status reporting before the configuration is loaded.
#[derive(Debug, Default)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: PathBuf,
}

impl Logger {
    /// Create a new logger that reports `log_file` in the run summary.
    #[must_use]
    pub fn new(log_file: &Path) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file: log_file.to_path_buf(),
        }
    }

    /// Path of the log file events are appended to.
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_file
    }

    /// Return a clone of all recorded phase entries.
    #[must_use]
    pub fn entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a section header.
    pub fn section(&self, title: &str) {
        tracing::info!(target: SECTION_TARGET, "{title}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (dropped from both console and log file unless
    /// verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a phase result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed phases.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.tasks.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|t| t.status == TaskStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded phases.
    pub fn print_summary(&self) {
        let tasks = self.entries();
        if tasks.is_empty() {
            return;
        }

        self.section("Summary");

        let mut ok = 0u32;
        let mut warned = 0u32;
        let mut not_applicable = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for task in &tasks {
            let (icon, color) = match task.status {
                TaskStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                TaskStatus::Warned => {
                    warned += 1;
                    ("!", "\x1b[33m")
                }
                TaskStatus::NotApplicable => {
                    not_applicable += 1;
                    ("·", "\x1b[2m")
                }
                TaskStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                TaskStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                TaskStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = task
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", task.name));
        }

        let total = ok + warned + not_applicable + skipped + dry_run + failed;
        self.info(&format!(
            "{total} phases: \x1b[32m{ok} ok\x1b[0m, \x1b[33m{warned} warned\x1b[0m, \x1b[2m{not_applicable} n/a\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));
        if !self.log_file.as_os_str().is_empty() {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", self.log_file.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(section, info, debug, warn, error, dry_run);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }
}

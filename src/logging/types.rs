//! Core logging types: task entries, status, and the [`Log`] trait.

/// Phase execution result for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    /// Human-readable phase name.
    pub name: String,
    /// Final status of the phase.
    pub status: TaskStatus,
    /// Optional detail message (e.g., skip reason or error description).
    pub message: Option<String>,
}

/// Status of a completed phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Phase completed successfully.
    Ok,
    /// Phase completed but some items were skipped with a warning.
    Warned,
    /// Phase was filtered out by `--skip`/`--only`.
    NotApplicable,
    /// Phase was skipped as a whole (e.g., tool not found).
    Skipped,
    /// Phase ran in dry-run mode; no changes were applied.
    DryRun,
    /// Phase encountered an error.
    Failed,
}

/// Abstraction over logging backends.
///
/// Phases log through this trait so tests can swap in a logger bound to a
/// temporary file.
pub trait Log: Send + Sync {
    /// Log a section header (one per maintenance phase).
    fn section(&self, title: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (console only with `--verbose`).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a phase result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_equality() {
        assert_eq!(TaskStatus::Ok, TaskStatus::Ok);
        assert_ne!(TaskStatus::Ok, TaskStatus::Failed);
        assert_ne!(TaskStatus::Warned, TaskStatus::Skipped);
    }

    #[test]
    fn task_entry_clone() {
        let entry = TaskEntry {
            name: "Back up directories".to_string(),
            status: TaskStatus::Warned,
            message: Some("1 source missing".to_string()),
        };
        assert_eq!(entry.clone(), entry);
    }
}

//! Fixed-order maintenance phases and the fail-soft runner primitive.
pub mod backup;
mod context;
pub mod orphans;
pub mod retention;
mod stats;
pub mod temp_cleanup;
pub mod update;

pub use context::Context;
pub use stats::ItemStats;

use anyhow::Result;

use crate::logging::TaskStatus;

/// Outcome of a phase that did not fail.
///
/// # Examples
///
/// ```
/// use sysmaint::tasks::TaskResult;
///
/// let result = TaskResult::Warned("1 done, 1 warned".to_string());
/// assert!(matches!(result, TaskResult::Warned(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Phase completed successfully.
    Ok,
    /// Phase completed, but some items were skipped with a warning.
    Warned(String),
    /// Phase was skipped as a whole.
    Skipped(String),
    /// Phase ran in dry-run mode.
    DryRun,
}

/// A named maintenance phase.
pub trait Task: Send + Sync + 'static {
    /// Human-readable phase name, used as the section title.
    fn name(&self) -> &str;

    /// Execute the phase.
    ///
    /// Item-level problems are logged as they happen; an error is returned
    /// only when the phase as a whole should be recorded as failed.
    ///
    /// # Errors
    ///
    /// Returns an error if a delegated command or filesystem operation the
    /// phase depends on fails.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The maintenance phases, in execution order.
#[must_use]
pub fn all_maintenance_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(update::UpdateSystem),
        Box::new(backup::BackupDirectories),
        Box::new(retention::PruneBackups),
        Box::new(temp_cleanup::CleanTempFiles),
        Box::new(orphans::RemoveOrphans),
    ]
}

/// Execute a phase, recording the result in the logger.
///
/// Never propagates the phase's error: it is logged and recorded as
/// [`TaskStatus::Failed`] so the following phases still run.
pub fn execute(task: &dyn Task, ctx: &Context) {
    ctx.log.section(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Warned(reason)) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Warned, Some(&reason));
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}

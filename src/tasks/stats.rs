use anyhow::Result;

use super::{Context, TaskResult};
use crate::error::TaskError;

/// Per-item counters for phases that walk a list (sources, directories,
/// steps).
///
/// # Examples
///
/// ```
/// use sysmaint::tasks::ItemStats;
///
/// let mut stats = ItemStats::default();
/// stats.done += 2;
/// stats.warned += 1;
///
/// assert_eq!(stats.total(), 3);
/// assert_eq!(stats.summary(), "2 done, 1 warned");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ItemStats {
    /// Items completed (or, in dry-run mode, planned).
    pub done: usize,
    /// Items skipped with a warning.
    pub warned: usize,
    /// Items that failed.
    pub failed: usize,
}

impl ItemStats {
    /// Number of items attempted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.done + self.warned + self.failed
    }

    /// Human-readable counts, omitting zero categories after `done`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} done", self.done)];
        if self.warned > 0 {
            parts.push(format!("{} warned", self.warned));
        }
        if self.failed > 0 {
            parts.push(format!("{} failed", self.failed));
        }
        parts.join(", ")
    }

    /// Fold the counters into the phase outcome.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::ItemsFailed`] if any item failed.
    pub fn finish(self, ctx: &Context) -> Result<TaskResult> {
        if self.failed > 0 {
            return Err(TaskError::ItemsFailed {
                failed: self.failed,
                total: self.total(),
            }
            .into());
        }
        if ctx.dry_run {
            return Ok(TaskResult::DryRun);
        }
        if self.warned > 0 {
            return Ok(TaskResult::Warned(self.summary()));
        }
        Ok(TaskResult::Ok)
    }
}

//! Backup retention (pruning) phase.

use anyhow::{Context as _, Result};
use std::time::Duration;

use super::{Context, Task, TaskResult};
use crate::error::TaskError;
use crate::resources::prune::PrunePolicy;

/// Dated backup trees older than this are removed.
pub const BACKUP_MAX_AGE: Duration = Duration::from_secs(5 * 24 * 60 * 60);

/// Delete backup trees that have aged past [`BACKUP_MAX_AGE`].
///
/// Only the top-level entries of the backup root are aged; an expired entry
/// is removed with everything below it.
#[derive(Debug)]
pub struct PruneBackups;

impl Task for PruneBackups {
    fn name(&self) -> &'static str {
        "Prune old backups"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let root = &ctx.config.backup_root;
        if !ctx.fs_ops.is_dir(root) {
            return Ok(TaskResult::Skipped(format!(
                "backup root {} does not exist",
                root.display()
            )));
        }

        let policy = PrunePolicy {
            fs: ctx.fs_ops.as_ref(),
            max_age: BACKUP_MAX_AGE,
            now: ctx.now(),
            dry_run: ctx.dry_run,
        };
        let report = policy
            .prune_top_level(root)
            .with_context(|| format!("reading backup root {}", root.display()))?;

        for path in &report.removed {
            if ctx.dry_run {
                ctx.log
                    .dry_run(&format!("would remove old backup {}", path.display()));
            } else {
                ctx.log.debug(&format!("removed {}", path.display()));
            }
        }
        for failure in &report.failures {
            ctx.log.error(&format!(
                "Failed to remove old backup {}: {}",
                failure.path.display(),
                failure.reason
            ));
        }

        if !report.failures.is_empty() {
            return Err(TaskError::ItemsFailed {
                failed: report.failures.len(),
                total: report.failures.len() + report.removed.len(),
            }
            .into());
        }
        if ctx.dry_run {
            return Ok(TaskResult::DryRun);
        }
        ctx.log.info(&format!(
            "Removed {} backup(s) older than 5 days from {}.",
            report.removed.len(),
            root.display()
        ));
        Ok(TaskResult::Ok)
    }
}

//! Temporary file cleanup phase.

use anyhow::Result;
use std::time::Duration;

use super::{Context, ItemStats, Task, TaskResult};
use crate::resources::prune::PrunePolicy;

/// Entries in temporary directories older than this are removed.
pub const TEMP_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Recursively delete stale entries from each configured temp directory.
#[derive(Debug)]
pub struct CleanTempFiles;

impl Task for CleanTempFiles {
    fn name(&self) -> &'static str {
        "Clean temporary files"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let dirs = &ctx.config.temp_dirs;
        if dirs.is_empty() {
            return Ok(TaskResult::Skipped(
                "no temporary directories configured".to_string(),
            ));
        }

        let policy = PrunePolicy {
            fs: ctx.fs_ops.as_ref(),
            max_age: TEMP_MAX_AGE,
            now: ctx.now(),
            dry_run: ctx.dry_run,
        };
        let mut stats = ItemStats::default();

        for dir in dirs {
            if !ctx.fs_ops.is_dir(dir) {
                ctx.log.warn(&format!(
                    "Temporary directory {} does not exist; skipping.",
                    dir.display()
                ));
                stats.warned += 1;
                continue;
            }

            ctx.log
                .info(&format!("Cleaning temporary files in {}...", dir.display()));
            let report = match policy.prune_tree(dir) {
                Ok(report) => report,
                Err(e) => {
                    ctx.log
                        .error(&format!("Failed to read {}: {e:#}", dir.display()));
                    stats.failed += 1;
                    continue;
                }
            };

            for path in &report.removed {
                if ctx.dry_run {
                    ctx.log.dry_run(&format!("would remove {}", path.display()));
                } else {
                    ctx.log.debug(&format!("removed {}", path.display()));
                }
            }
            for failure in &report.failures {
                ctx.log.error(&format!(
                    "Failed to remove {}: {}",
                    failure.path.display(),
                    failure.reason
                ));
            }

            if report.failures.is_empty() {
                if !ctx.dry_run {
                    ctx.log.info(&format!(
                        "Removed {} stale entr{} from {}.",
                        report.removed.len(),
                        if report.removed.len() == 1 { "y" } else { "ies" },
                        dir.display()
                    ));
                }
                stats.done += 1;
            } else {
                stats.failed += 1;
            }
        }

        stats.finish(ctx)
    }
}

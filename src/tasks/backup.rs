//! Directory backup phase.

use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::{Context, ItemStats, Task, TaskResult};
use crate::resources::mirror::mirror;

/// Mirror each configured source into today's backup directory.
#[derive(Debug)]
pub struct BackupDirectories;

/// Name under which `source` is backed up: its final path component, or
/// `root` for the filesystem root.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use sysmaint::tasks::backup::backup_name;
///
/// assert_eq!(backup_name(Path::new("/etc")), "etc");
/// assert_eq!(backup_name(Path::new("/srv/www/")), "www");
/// assert_eq!(backup_name(Path::new("/")), "root");
/// ```
#[must_use]
pub fn backup_name(source: &Path) -> String {
    source
        .file_name()
        .map_or_else(|| "root".to_string(), |n| n.to_string_lossy().into_owned())
}

/// Destination of `source` under `<backup_root>/<date>/`.
#[must_use]
pub fn backup_target(backup_root: &Path, date: &str, source: &Path) -> PathBuf {
    backup_root
        .join(date)
        .join(format!("{}_backup", backup_name(source)))
}

impl Task for BackupDirectories {
    fn name(&self) -> &'static str {
        "Back up directories"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let sources = &ctx.config.backup_paths;
        if sources.is_empty() {
            return Ok(TaskResult::Skipped("no backup sources configured".to_string()));
        }

        let date = ctx.backup_date();
        let mut seen = HashSet::new();
        let mut stats = ItemStats::default();

        for source in sources {
            if !ctx.fs_ops.is_dir(source) {
                ctx.log.warn(&format!(
                    "Backup source {} does not exist; skipping.",
                    source.display()
                ));
                stats.warned += 1;
                continue;
            }

            let name = backup_name(source);
            if !seen.insert(name.clone()) {
                ctx.log.warn(&format!(
                    "Backup source {} has the same name '{name}' as an earlier source; skipping.",
                    source.display()
                ));
                stats.warned += 1;
                continue;
            }

            let target = backup_target(&ctx.config.backup_root, &date, source);
            if ctx.dry_run {
                ctx.log.dry_run(&format!(
                    "would back up {} to {}",
                    source.display(),
                    target.display()
                ));
                stats.done += 1;
                continue;
            }

            ctx.log.info(&format!(
                "Backing up {} to {}...",
                source.display(),
                target.display()
            ));
            if let Err(e) = ctx.fs_ops.create_dir_all(&target) {
                ctx.log.error(&format!(
                    "Failed to create backup directory {}: {e}",
                    target.display()
                ));
                stats.failed += 1;
                continue;
            }
            match mirror(ctx.executor.as_ref(), source, &target) {
                Ok(_) => {
                    ctx.log
                        .info(&format!("Backup of {} completed.", source.display()));
                    stats.done += 1;
                }
                Err(e) => {
                    ctx.log
                        .error(&format!("Backup of {} failed: {e:#}", source.display()));
                    stats.failed += 1;
                }
            }
        }

        ctx.log.debug(&format!("backups: {}", stats.summary()));
        stats.finish(ctx)
    }
}

//! System package update phase.

use anyhow::Result;

use super::{Context, ItemStats, Task, TaskResult};
use crate::resources::package::Pacman;

/// Synchronise package databases, report pending updates and optionally
/// upgrade.
#[derive(Debug)]
pub struct UpdateSystem;

impl Task for UpdateSystem {
    fn name(&self) -> &'static str {
        "Update system"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let pacman = Pacman::new(ctx.executor.as_ref());
        let mut stats = ItemStats::default();

        if ctx.dry_run {
            ctx.log.dry_run("would synchronize package databases (pacman -Sy)");
            stats.done += 1;
        } else {
            ctx.log.info("Synchronizing package databases...");
            match pacman.sync() {
                Ok(_) => {
                    ctx.log.info("Package databases synchronized.");
                    stats.done += 1;
                }
                Err(e) => {
                    // The query below still reports against the local databases.
                    ctx.log
                        .error(&format!("Failed to synchronize package databases: {e:#}"));
                    stats.failed += 1;
                }
            }
        }

        ctx.log.info("Checking for available updates...");
        let updates = match pacman.pending_updates() {
            Ok(updates) => updates,
            Err(e) => {
                ctx.log
                    .error(&format!("Failed to check for updates: {e:#}"));
                stats.failed += 1;
                return stats.finish(ctx);
            }
        };
        stats.done += 1;

        if updates.is_empty() {
            ctx.log.info("No updates available. System is up-to-date.");
            return stats.finish(ctx);
        }

        ctx.log.info(&format!(
            "{} update(s) available:\n{}",
            updates.len(),
            updates.join("\n")
        ));

        if !ctx.config.auto_update {
            ctx.log
                .info("Automatic updates are disabled; run 'pacman -Syu' to upgrade.");
            return stats.finish(ctx);
        }

        if ctx.dry_run {
            ctx.log.dry_run(&format!(
                "would upgrade {} package(s) (pacman -Syu --noconfirm)",
                updates.len()
            ));
            stats.done += 1;
            return stats.finish(ctx);
        }

        ctx.log.info("Upgrading packages...");
        match pacman.upgrade() {
            Ok(result) => {
                let output = result.combined_output();
                if !output.is_empty() {
                    ctx.log.info(&output);
                }
                ctx.log.info("System upgrade completed.");
                stats.done += 1;
            }
            Err(e) => {
                ctx.log.error(&format!("System upgrade failed: {e:#}"));
                stats.failed += 1;
            }
        }

        stats.finish(ctx)
    }
}

//! Orphaned package removal phase.

use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::resources::package::{PACMAN, Pacman, is_valid_package_name};

/// Remove packages installed as dependencies that nothing requires anymore.
#[derive(Debug)]
pub struct RemoveOrphans;

impl Task for RemoveOrphans {
    fn name(&self) -> &'static str {
        "Remove orphaned packages"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let pacman = Pacman::new(ctx.executor.as_ref());
        if !pacman.is_available() {
            ctx.log
                .warn(&format!("{PACMAN} not found; skipping orphan removal."));
            return Ok(TaskResult::Skipped(format!("{PACMAN} not found")));
        }

        ctx.log.info("Checking for orphaned packages...");
        let orphans = pacman.orphans()?;
        if orphans.is_empty() {
            ctx.log.info("No orphaned packages found.");
            return Ok(TaskResult::Ok);
        }

        let (valid, rejected): (Vec<String>, Vec<String>) = orphans
            .into_iter()
            .partition(|name| is_valid_package_name(name));
        for name in &rejected {
            ctx.log
                .warn(&format!("Ignoring invalid package name from {PACMAN}: {name:?}"));
        }
        if valid.is_empty() {
            return Ok(TaskResult::Warned(format!(
                "{} invalid package name(s) ignored",
                rejected.len()
            )));
        }

        ctx.log.info(&format!(
            "Found {} orphaned package(s):\n{}",
            valid.len(),
            valid.join("\n")
        ));

        if ctx.dry_run {
            ctx.log.dry_run(&format!(
                "would remove {} orphaned package(s) (pacman -Rns --noconfirm)",
                valid.len()
            ));
            return Ok(TaskResult::DryRun);
        }

        let result = pacman.remove(&valid)?;
        let output = result.combined_output();
        if !output.is_empty() {
            ctx.log.info(&output);
        }
        ctx.log
            .info(&format!("Removed {} orphaned package(s).", valid.len()));

        if rejected.is_empty() {
            Ok(TaskResult::Ok)
        } else {
            Ok(TaskResult::Warned(format!(
                "{} invalid package name(s) ignored",
                rejected.len()
            )))
        }
    }
}

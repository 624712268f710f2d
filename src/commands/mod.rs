//! Run orchestration: startup checks, the phase loop and the exit status.
pub mod exit;
pub mod maintain;

use crate::logging::{Logger, TaskStatus};
use crate::tasks::{self, Context, Task};

/// Execute every selected phase in order, then print the summary.
///
/// Phases rejected by `selects` are recorded as not applicable.  A failing
/// phase never stops the loop.  Returns the number of failed phases.
pub fn run_phases<'a>(
    phases: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
    selects: impl Fn(&str) -> bool,
) -> usize {
    for phase in phases {
        if selects(phase.name()) {
            tasks::execute(phase, ctx);
        } else {
            ctx.log
                .debug(&format!("skipping phase: {} (filtered)", phase.name()));
            ctx.log
                .record_task(phase.name(), TaskStatus::NotApplicable, None);
        }
    }

    log.print_summary();
    log.failure_count()
}

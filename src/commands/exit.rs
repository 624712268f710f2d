//! Final run status, reported exactly once however the process ends.
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::logging::Log;

/// Exit code reported when the handler is dropped without [`ExitHandler::finish`]
/// (a panic unwinding through the run).
pub const PANIC_EXIT_CODE: u8 = 101;

/// Exit code used when the run is interrupted.
pub const INTERRUPT_EXIT_CODE: i32 = 130;

/// Logs the final status of the run.
///
/// Create it as soon as logging is up; call [`finish`](Self::finish) on the
/// normal path.  If it is dropped unfinished, the abnormal-termination
/// message is logged instead.
pub struct ExitHandler {
    log: Arc<dyn Log>,
    finished: bool,
}

impl std::fmt::Debug for ExitHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExitHandler")
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl ExitHandler {
    /// Create a handler without touching signal handling.
    #[must_use]
    pub const fn new(log: Arc<dyn Log>) -> Self {
        Self {
            log,
            finished: false,
        }
    }

    /// Create a handler and install an interrupt handler that logs the
    /// interruption and exits with status 130.
    ///
    /// # Errors
    ///
    /// Returns an error if the interrupt handler cannot be installed.
    pub fn install(log: Arc<dyn Log>) -> Result<Self> {
        let signal_log = Arc::clone(&log);
        ctrlc::set_handler(move || std::process::exit(interrupted(signal_log.as_ref())))
            .context("installing interrupt handler")?;
        Ok(Self::new(log))
    }

    /// Log the final status for `code` and convert it to the process exit
    /// code.
    #[must_use]
    pub fn finish(mut self, code: u8) -> ExitCode {
        self.finished = true;
        report(self.log.as_ref(), code);
        ExitCode::from(code)
    }
}

impl Drop for ExitHandler {
    fn drop(&mut self) {
        if !self.finished {
            report(self.log.as_ref(), PANIC_EXIT_CODE);
        }
    }
}

/// Log the interruption and return the exit code to terminate with.
pub fn interrupted(log: &dyn Log) -> i32 {
    log.error(&format!(
        "Maintenance interrupted; terminated unexpectedly with exit code {INTERRUPT_EXIT_CODE}."
    ));
    INTERRUPT_EXIT_CODE
}

/// Log the completion message for exit code `code`.
pub fn report(log: &dyn Log, code: u8) {
    if code == 0 {
        log.info("System maintenance completed.");
    } else {
        log.error(&format!(
            "Maintenance terminated unexpectedly with exit code {code}."
        ));
    }
}

//! The maintenance run: privilege and configuration preconditions, logging
//! setup, then every phase in order.
use std::process::ExitCode;
use std::sync::Arc;

use crate::cli::Cli;
use crate::config::{self, LoadedConfig};
use crate::error::SysmaintError;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, LogFile, Logger, init_subscriber};
use crate::privilege::require_root;
use crate::tasks::{Context, all_maintenance_tasks};

use super::exit::ExitHandler;
use super::run_phases;

/// Run the maintenance command.
///
/// Console logging and the exit handler are set up first, so a failed
/// startup precondition is reported like any other termination.
#[must_use]
pub fn run(cli: &Cli) -> ExitCode {
    let log_file = match init_subscriber(cli.verbose) {
        Ok(log_file) => log_file,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let status_log: Arc<dyn Log> = Arc::new(Logger::default());
    let exit = ExitHandler::install(Arc::clone(&status_log)).unwrap_or_else(|e| {
        status_log.warn(&format!("{e:#}"));
        ExitHandler::new(Arc::clone(&status_log))
    });

    maintain(cli, Arc::new(SystemExecutor), &log_file, exit)
}

/// Check the startup preconditions, attach the log file, then run every
/// selected phase in order.
///
/// Returns 1 through `exit` if a startup precondition fails, otherwise 0
/// once every phase has been attempted, even when some phases logged errors.
#[must_use]
pub fn maintain(
    cli: &Cli,
    executor: Arc<dyn Executor>,
    log_file: &LogFile,
    exit: ExitHandler,
) -> ExitCode {
    let loaded = match preflight(cli, executor.as_ref()) {
        Ok(loaded) => loaded,
        Err(e) => return startup_failure(exit, &e),
    };
    if let Err(e) = log_file.attach(&loaded.config.log_file) {
        return startup_failure(exit, &e);
    }

    let log = Arc::new(Logger::new(&loaded.config.log_file));
    announce(&log, &loaded, cli);

    let ctx = Context::new(
        Arc::new(loaded.config),
        Arc::clone(&log) as Arc<dyn Log>,
        cli.dry_run,
        executor,
    );
    let tasks = all_maintenance_tasks();
    let failed = run_phases(tasks.iter().map(AsRef::as_ref), &ctx, &log, |name| {
        cli.selects(name)
    });
    if failed > 0 {
        log.info(&format!("{failed} phase(s) failed; see the errors above."));
    }

    exit.finish(0)
}

/// Check the startup preconditions in order: root privilege first, then the
/// configuration file (created with defaults if absent).
///
/// Nothing is written to disk unless the privilege check passes.
///
/// # Errors
///
/// Returns an error if the process is not root or the configuration cannot
/// be created or parsed.
pub fn preflight(cli: &Cli, executor: &dyn Executor) -> Result<LoadedConfig, SysmaintError> {
    require_root(executor)?;
    Ok(config::ensure_and_load(&cli.config)?)
}

fn startup_failure(exit: ExitHandler, e: &dyn std::fmt::Display) -> ExitCode {
    print_error(e);
    exit.finish(1)
}

#[allow(clippy::print_stderr)]
fn print_error(e: &dyn std::fmt::Display) {
    eprintln!("Error: {e:#}");
}

fn announce(log: &Logger, loaded: &LoadedConfig, cli: &Cli) {
    let version = option_env!("SYSMAINT_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.info(&format!("sysmaint {version}"));
    if loaded.created {
        log.info(&format!(
            "Created default configuration at {}.",
            loaded.path.display()
        ));
    }
    log.debug(&format!("configuration: {}", loaded.path.display()));
    log.debug(&format!(
        "{} backup source(s), {} temporary director{}, auto-update {}",
        loaded.config.backup_paths.len(),
        loaded.config.temp_dirs.len(),
        if loaded.config.temp_dirs.len() == 1 { "y" } else { "ies" },
        if loaded.config.auto_update { "on" } else { "off" }
    ));
    if cli.dry_run {
        log.dry_run("no changes will be applied");
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PrivilegeError;
    use crate::logging::capturing_subscriber;
    use crate::tasks::test_helpers::RecordingExecutor;
    use clap::Parser;

    fn cli_for(path: &std::path::Path) -> Cli {
        Cli::parse_from(["sysmaint", "--config", &path.display().to_string()])
    }

    fn root() -> RecordingExecutor {
        RecordingExecutor::new().respond("id -u", RecordingExecutor::ok("0\n"))
    }

    fn status_handler() -> ExitHandler {
        ExitHandler::new(Arc::new(Logger::default()))
    }

    /// Configuration whose paths all live under `dir`, with nothing to back
    /// up or clean.
    fn write_config(dir: &std::path::Path, log_file: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            format!(
                "log_file = {:?}\nbackup_root = {:?}\nbackup_paths = []\ntemp_dirs = []\nauto_update = \"no\"\n",
                log_file.display().to_string(),
                dir.join("backups").display().to_string(),
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn non_root_run_reports_exit_code_one() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let (console, log_file, _guard) = capturing_subscriber(false);
        let exec = RecordingExecutor::new().respond("id -u", RecordingExecutor::ok("1000\n"));

        let code = maintain(&cli_for(&path), Arc::new(exec), &log_file, status_handler());

        assert_eq!(code, ExitCode::FAILURE);
        assert!(
            console
                .text()
                .contains("ERROR: Maintenance terminated unexpectedly with exit code 1.")
        );
        assert!(!path.exists());
        assert!(!log_file.is_attached());
    }

    #[test]
    fn unopenable_log_file_reports_exit_code_one() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let path = write_config(tmp.path(), &blocker.join("sysmaint.log"));
        let (console, log_file, _guard) = capturing_subscriber(false);

        let code = maintain(&cli_for(&path), Arc::new(root()), &log_file, status_handler());

        assert_eq!(code, ExitCode::FAILURE);
        let text = console.text();
        assert!(text.contains("exit code 1."));
        assert!(!text.contains("Update system"));
    }

    #[test]
    fn clean_run_logs_the_same_events_to_console_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let log_path = tmp.path().join("log").join("sysmaint.log");
        let path = write_config(tmp.path(), &log_path);
        let (console, log_file, _guard) = capturing_subscriber(false);

        let code = maintain(&cli_for(&path), Arc::new(root()), &log_file, status_handler());

        assert_eq!(code, ExitCode::SUCCESS);
        let console = console.text();
        let file = std::fs::read_to_string(&log_path).unwrap();
        assert!(file.contains(" - System maintenance completed."));
        for line in file.lines() {
            let Some((_, message)) = line.split_once(" - ") else {
                continue;
            };
            let message = message
                .strip_prefix("ERROR: ")
                .or_else(|| message.strip_prefix("WARNING: "))
                .unwrap_or(message);
            assert!(console.contains(message), "{message:?} missing from console");
        }
    }

    #[test]
    fn preflight_rejects_non_root_before_writing_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("etc").join("config.toml");
        let exec = RecordingExecutor::new().respond("id -u", RecordingExecutor::ok("1000\n"));

        let err = preflight(&cli_for(&path), &exec).unwrap_err();

        assert!(matches!(
            err,
            SysmaintError::Privilege(PrivilegeError::NotRoot { .. })
        ));
        assert_eq!(
            format!("Error: {err}"),
            "Error: sysmaint must be run as root (current uid 1000)"
        );
        assert!(!path.exists());
    }

    #[test]
    fn preflight_creates_default_config_as_root() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let exec = RecordingExecutor::new().respond("id -u", RecordingExecutor::ok("0\n"));

        let loaded = preflight(&cli_for(&path), &exec).unwrap();

        assert!(loaded.created);
        assert!(path.exists());
        assert_eq!(loaded.config.backup_paths.len(), 2);
    }

    #[test]
    fn preflight_reports_invalid_config() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "log_file = [").unwrap();
        let exec = RecordingExecutor::new().respond("id -u", RecordingExecutor::ok("0\n"));

        let err = preflight(&cli_for(&path), &exec).unwrap_err();

        assert!(matches!(err, SysmaintError::Config(_)));
        assert!(err.to_string().contains("Invalid configuration in"));
    }
}

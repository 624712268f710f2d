//! Package manager operations (pacman).
use anyhow::Result;

use crate::error::ResourceError;
use crate::exec::{ExecResult, Executor, command_line};

/// Name of the package manager binary.
pub const PACMAN: &str = "pacman";

/// Thin wrapper over the pacman CLI.
///
/// Every method delegates to a single pacman invocation through the
/// [`Executor`]; no resolution logic lives here.
#[derive(Clone, Copy)]
pub struct Pacman<'a> {
    executor: &'a dyn Executor,
}

impl std::fmt::Debug for Pacman<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacman").finish_non_exhaustive()
    }
}

impl<'a> Pacman<'a> {
    /// Create a wrapper issuing commands through `executor`.
    #[must_use]
    pub const fn new(executor: &'a dyn Executor) -> Self {
        Self { executor }
    }

    /// Whether pacman is on `PATH`.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.executor.which(PACMAN)
    }

    /// Synchronise the package databases (`pacman -Sy`).
    ///
    /// # Errors
    ///
    /// Returns an error carrying pacman's output if the sync fails.
    pub fn sync(&self) -> Result<ExecResult> {
        self.executor.run(PACMAN, &["-Sy"])
    }

    /// List pending upgrades (`pacman -Qu`), one `name old -> new` line each.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails for a reason other than having
    /// nothing to report.
    pub fn pending_updates(&self) -> Result<Vec<String>> {
        self.query(&["-Qu"])
    }

    /// Upgrade all packages (`pacman -Syu --noconfirm`).
    ///
    /// # Errors
    ///
    /// Returns an error carrying pacman's output if the upgrade fails.
    pub fn upgrade(&self) -> Result<ExecResult> {
        self.executor.run(PACMAN, &["-Syu", "--noconfirm"])
    }

    /// List orphaned packages (`pacman -Qdtq`).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails for a reason other than having
    /// nothing to report.
    pub fn orphans(&self) -> Result<Vec<String>> {
        self.query(&["-Qdtq"])
    }

    /// Remove `packages` together with their unneeded dependencies in one
    /// batch (`pacman -Rns --noconfirm <names…>`).
    ///
    /// Each name is passed as its own argument; no shell is involved.
    ///
    /// # Errors
    ///
    /// Returns an error carrying pacman's output if the removal fails.
    pub fn remove(&self, packages: &[String]) -> Result<ExecResult> {
        let mut args = vec!["-Rns", "--noconfirm"];
        args.extend(packages.iter().map(String::as_str));
        self.executor.run(PACMAN, &args)
    }

    /// Run a query whose "nothing found" answer is exit status 1 with no
    /// output.
    fn query(&self, args: &[&str]) -> Result<Vec<String>> {
        let result = self.executor.run_unchecked(PACMAN, args)?;
        if !result.success {
            if result.code == Some(1) && result.combined_output().is_empty() {
                return Ok(Vec::new());
            }
            return Err(ResourceError::CommandFailed {
                program: command_line(PACMAN, args),
                code: result.code.unwrap_or(-1),
                output: result.combined_output(),
            }
            .into());
        }
        Ok(result
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }
}

/// Whether `name` is a well-formed pacman package name.
///
/// Package names consist of lowercase alphanumerics and `@ . _ + -`, and may
/// not start with a hyphen or a dot.
///
/// # Examples
///
/// ```
/// use sysmaint::resources::package::is_valid_package_name;
///
/// assert!(is_valid_package_name("python-pip"));
/// assert!(is_valid_package_name("lib32-glibc"));
/// assert!(!is_valid_package_name("--cascade"));
/// assert!(!is_valid_package_name("foo bar"));
/// ```
#[must_use]
pub fn is_valid_package_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(['-', '.'])
        && name.chars().all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '@' | '.' | '_' | '+' | '-')
        })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tasks::test_helpers::RecordingExecutor;

    #[test]
    fn pending_updates_parses_lines() {
        let exec = RecordingExecutor::new().respond(
            "pacman -Qu",
            RecordingExecutor::ok("linux 6.1-1 -> 6.2-1\n\nvim 9.0-1 -> 9.1-1\n"),
        );
        let updates = Pacman::new(&exec).pending_updates().unwrap();
        assert_eq!(updates, vec!["linux 6.1-1 -> 6.2-1", "vim 9.0-1 -> 9.1-1"]);
    }

    #[test]
    fn pending_updates_exit_one_without_output_means_none() {
        let exec =
            RecordingExecutor::new().respond("pacman -Qu", RecordingExecutor::fail(1, ""));
        assert!(Pacman::new(&exec).pending_updates().unwrap().is_empty());
    }

    #[test]
    fn pending_updates_real_failure_is_error() {
        let exec = RecordingExecutor::new().respond(
            "pacman -Qu",
            RecordingExecutor::fail(1, "error: could not open database"),
        );
        let err = Pacman::new(&exec).pending_updates().unwrap_err();
        assert!(format!("{err:#}").contains("could not open database"));
    }

    #[test]
    fn orphans_exit_one_without_output_means_none() {
        let exec =
            RecordingExecutor::new().respond("pacman -Qdtq", RecordingExecutor::fail(1, ""));
        assert!(Pacman::new(&exec).orphans().unwrap().is_empty());
    }

    #[test]
    fn remove_passes_each_name_as_argument() {
        let exec = RecordingExecutor::new();
        Pacman::new(&exec)
            .remove(&["foo".to_string(), "bar-lib".to_string()])
            .unwrap();
        assert_eq!(exec.calls(), vec!["pacman -Rns --noconfirm foo bar-lib"]);
    }

    #[test]
    fn sync_failure_carries_output() {
        let exec = RecordingExecutor::new().respond(
            "pacman -Sy",
            RecordingExecutor::fail(1, "error: failed to synchronize all databases"),
        );
        let err = Pacman::new(&exec).sync().unwrap_err();
        assert!(format!("{err:#}").contains("failed to synchronize"));
    }

    #[test]
    fn package_name_validation() {
        assert!(is_valid_package_name("gtk+"));
        assert!(is_valid_package_name("libc++abi"));
        assert!(is_valid_package_name("qt5-base"));
        assert!(!is_valid_package_name(""));
        assert!(!is_valid_package_name(".hidden"));
        assert!(!is_valid_package_name("Upper"));
        assert!(!is_valid_package_name("semi;colon"));
        assert!(!is_valid_package_name("$(reboot)"));
    }
}

//! Domain-specific error types for the maintenance runner.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`], [`TaskError`])
//! while phases convert them to [`anyhow::Error`] via the standard `?`
//! operator.  The startup preconditions fold into [`SysmaintError`].
//!
//! # Error hierarchy
//!
//! ```text
//! SysmaintError
//! ├── Config(ConfigError)        config file creation and parsing
//! └── Privilege(PrivilegeError)  root check before any phase runs
//!
//! TaskError                      phase-level failures
//! ResourceError                  delegated commands
//! ```

use thiserror::Error;

/// Top-level error type for the maintenance runner.
#[derive(Error, Debug)]
pub enum SysmaintError {
    /// Configuration-related error (creation, reading, parsing).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The process lacks the privilege required to run maintenance.
    #[error("{0}")]
    Privilege(#[from] PrivilegeError),
}

/// Errors that arise from loading or creating the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML file is malformed or a required key is missing.
    #[error("Invalid configuration in {file}: {message}")]
    InvalidSyntax {
        /// Path to the offending file.
        file: String,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading or writing a config file.
    #[error("IO error on config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read or written.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from the privilege precondition.
#[derive(Error, Debug)]
pub enum PrivilegeError {
    /// The effective user is not root.
    #[error("sysmaint must be run as root (current uid {uid})")]
    NotRoot {
        /// Effective user id reported by `id -u`.
        uid: String,
    },

    /// The effective user id could not be determined.
    #[error("could not determine effective user id: {0}")]
    DetectionFailed(String),
}

/// Errors that arise during phase execution.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Some items within a phase failed while the rest were processed.
    #[error("{failed} of {total} item(s) failed")]
    ItemsFailed {
        /// Number of failed items.
        failed: usize,
        /// Number of items attempted.
        total: usize,
    },
}

/// Errors that arise from delegated commands.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A delegated command exited non-zero.
    #[error("{program} failed (exit {code}):\n{output}")]
    CommandFailed {
        /// Command line that was run.
        program: String,
        /// Exit code, or `-1` if terminated by a signal.
        code: i32,
        /// Captured stdout and stderr.
        output: String,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn config_error_invalid_syntax_display() {
        let e = ConfigError::InvalidSyntax {
            file: "/etc/sysmaint/config.toml".to_string(),
            message: "missing field `log_file`".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Invalid configuration in /etc/sysmaint/config.toml: missing field `log_file`"
        );
    }

    #[test]
    fn config_error_io_has_source() {
        use std::error::Error as StdError;
        let e = ConfigError::Io {
            path: "/etc/sysmaint/config.toml".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.to_string().contains("/etc/sysmaint/config.toml"));
        assert!(e.source().is_some());
    }

    #[test]
    fn privilege_error_not_root_display() {
        let e = PrivilegeError::NotRoot {
            uid: "1000".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "sysmaint must be run as root (current uid 1000)"
        );
    }

    #[test]
    fn task_error_items_failed_display() {
        let e = TaskError::ItemsFailed {
            failed: 1,
            total: 3,
        };
        assert_eq!(e.to_string(), "1 of 3 item(s) failed");
    }

    #[test]
    fn resource_error_command_failed_includes_output() {
        let e = ResourceError::CommandFailed {
            program: "rsync".to_string(),
            code: 23,
            output: "rsync: some files vanished".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.starts_with("rsync failed (exit 23):"));
        assert!(msg.contains("some files vanished"));
    }

    #[test]
    fn sysmaint_error_privilege_is_transparent() {
        let e: SysmaintError = PrivilegeError::NotRoot {
            uid: "1000".to_string(),
        }
        .into();
        assert_eq!(
            e.to_string(),
            "sysmaint must be run as root (current uid 1000)"
        );
    }

    #[test]
    fn sysmaint_error_from_config_error() {
        let e: SysmaintError = ConfigError::InvalidSyntax {
            file: "c.toml".to_string(),
            message: "bad".to_string(),
        }
        .into();
        assert!(e.to_string().starts_with("Configuration error"));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<SysmaintError>();
        assert_send_sync::<ConfigError>();
        assert_send_sync::<PrivilegeError>();
        assert_send_sync::<TaskError>();
        assert_send_sync::<ResourceError>();
    }

    #[test]
    fn task_error_converts_to_anyhow() {
        let e = TaskError::ItemsFailed {
            failed: 2,
            total: 2,
        };
        let _anyhow_err: anyhow::Error = e.into();
    }
}

//! Maintenance configuration: creation of the default file and loading.
pub mod flag;
pub mod toml_loader;

use serde::Deserialize;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Well-known configuration path used when no override is given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sysmaint/config.toml";

/// Payload written when the configuration file does not exist.
pub const DEFAULT_CONFIG: &str = r#"# sysmaint configuration
log_file = "/var/log/sysmaint.log"
backup_root = "/var/backups/sysmaint"
backup_paths = ["/etc", "/home"]
temp_dirs = ["/tmp", "/var/tmp"]
auto_update = "no"
"#;

/// All settings for one maintenance run.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Append-only log file.
    pub log_file: PathBuf,
    /// Directory receiving dated backup trees.
    pub backup_root: PathBuf,
    /// Directories mirrored into the backup root, in order.
    pub backup_paths: Vec<PathBuf>,
    /// Directories pruned of stale entries, in order.
    pub temp_dirs: Vec<PathBuf>,
    /// Whether to run a full upgrade when updates are pending.
    #[serde(deserialize_with = "flag::deserialize")]
    pub auto_update: bool,
}

/// Outcome of [`ensure_and_load`].
#[derive(Debug)]
pub struct LoadedConfig {
    /// The parsed configuration.
    pub config: Config,
    /// Path the configuration was read from.
    pub path: PathBuf,
    /// `true` if the default file was written during this call.
    pub created: bool,
}

impl Config {
    /// Load configuration from an existing TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        toml_loader::load_config(path)
    }
}

/// Ensure the configuration file exists, writing defaults if absent, then
/// load it.
///
/// # Errors
///
/// Returns an error if the default file cannot be written or the file cannot
/// be read or parsed.
pub fn ensure_and_load(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let created = if path.exists() {
        false
    } else {
        write_default(path)?;
        true
    };
    let config = Config::load(path)?;
    Ok(LoadedConfig {
        config,
        path: path.to_path_buf(),
        created,
    })
}

/// Write [`DEFAULT_CONFIG`] to `path` with owner-only permissions.
///
/// # Errors
///
/// Returns an error if the parent directory or file cannot be created.
pub fn write_default(path: &Path) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt as _;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(io_err)?;
    file.write_all(DEFAULT_CONFIG.as_bytes()).map_err(io_err)?;

    // The umask may have narrowed the mode further; set it explicitly.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(io_err)?;
    }
    Ok(())
}

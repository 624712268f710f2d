//! Command-line interface definition.

use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

/// Top-level CLI entry point for the maintenance runner.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sysmaint",
    about = "Package updates, backups, temp cleanup and orphan removal in one pass",
    version
)]
pub struct Cli {
    /// Configuration file (created with defaults if absent)
    #[arg(short, long, env = "SYSMAINT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Preview changes without applying
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Skip specific phases
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only specific phases
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

impl Cli {
    /// Whether the phase named `name` passes the `--only`/`--skip` filters.
    ///
    /// Filters match case-insensitive substrings of the phase name; `--only`
    /// takes precedence over `--skip`.
    #[must_use]
    pub fn selects(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        if !self.only.is_empty() {
            return self.only.iter().any(|o| name.contains(&o.to_lowercase()));
        }
        !self.skip.iter().any(|s| name.contains(&s.to_lowercase()))
    }
}

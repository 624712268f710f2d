//! Mirroring copy via rsync.
use anyhow::Result;
use std::path::Path;

use crate::exec::{ExecResult, Executor};

/// Name of the mirroring copy binary.
pub const RSYNC: &str = "rsync";

/// Make `destination` an exact mirror of `source`.
///
/// Runs `rsync -a --delete <source>/ <destination>/`: archive mode preserves
/// permissions, ownership and timestamps, and destination-only entries are
/// deleted.  The trailing slashes copy the *contents* of `source` rather than
/// nesting it inside `destination`.
///
/// # Errors
///
/// Returns an error carrying rsync's output if the copy fails.
pub fn mirror(executor: &dyn Executor, source: &Path, destination: &Path) -> Result<ExecResult> {
    let src = with_trailing_slash(source);
    let dest = with_trailing_slash(destination);
    executor.run(RSYNC, &["-a", "--delete", &src, &dest])
}

fn with_trailing_slash(path: &Path) -> String {
    let s = path.to_string_lossy();
    if s.ends_with('/') {
        s.into_owned()
    } else {
        format!("{s}/")
    }
}

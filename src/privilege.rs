//! Root privilege precondition.
use crate::error::PrivilegeError;
use crate::exec::Executor;

/// Fail unless the effective user is root.
///
/// The effective uid is read from `id -u` so the check can be driven by a
/// test executor.
///
/// # Errors
///
/// Returns [`PrivilegeError::NotRoot`] for any other uid, and
/// [`PrivilegeError::DetectionFailed`] if `id` cannot be run or prints
/// something other than a number.
pub fn require_root(executor: &dyn Executor) -> Result<(), PrivilegeError> {
    let result = executor
        .run("id", &["-u"])
        .map_err(|e| PrivilegeError::DetectionFailed(format!("{e:#}")))?;
    let uid = result.stdout.trim();
    match uid.parse::<u32>() {
        Ok(0) => Ok(()),
        Ok(_) => Err(PrivilegeError::NotRoot {
            uid: uid.to_string(),
        }),
        Err(_) => Err(PrivilegeError::DetectionFailed(format!(
            "unexpected output from id -u: {uid:?}"
        ))),
    }
}

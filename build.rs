//! Build script: embeds version information at compile time.

use std::process::Command;

fn main() {
    // Prefer SYSMAINT_VERSION env var if set (e.g., by a packaging script),
    // otherwise fall back to git describe for local development builds.
    if let Ok(version) = std::env::var("SYSMAINT_VERSION") {
        println!("cargo:rustc-env=SYSMAINT_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=SYSMAINT_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=SYSMAINT_VERSION");
}

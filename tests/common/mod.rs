// Shared helpers for integration tests.
//
// Provides a recording executor double and a temporary-directory-backed
// host layout so each integration test can run phases in isolation without
// touching the real package manager or filesystem.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use sysmaint::config::Config;
use sysmaint::exec::{ExecResult, Executor, command_line};
use sysmaint::logging::{Log, Logger};
use sysmaint::tasks::Context;

/// Executor double that records every command line and answers from
/// scripted responses matched by command-line prefix.
///
/// Unmatched commands succeed with empty output; `which()` always succeeds.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    responses: Vec<(String, ExecResult)>,
    calls: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    /// Answer commands starting with `prefix` with `result`.
    pub fn respond(mut self, prefix: &str, result: ExecResult) -> Self {
        self.responses.push((prefix.to_string(), result));
        self
    }

    /// Command lines issued so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Number of issued commands starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl Executor for RecordingExecutor {
    fn run_unchecked(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        let line = command_line(program, args);
        self.calls.lock().expect("calls lock").push(line.clone());
        Ok(self
            .responses
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map_or_else(|| ok(""), |(_, result)| result.clone()))
    }

    fn which(&self, _: &str) -> bool {
        true
    }
}

/// Successful command result with the given stdout.
pub fn ok(stdout: &str) -> ExecResult {
    ExecResult {
        stdout: stdout.to_string(),
        stderr: String::new(),
        success: true,
        code: Some(0),
    }
}

/// Failed command result with the given exit code and stderr.
pub fn fail(code: i32, stderr: &str) -> ExecResult {
    ExecResult {
        stdout: String::new(),
        stderr: stderr.to_string(),
        success: false,
        code: Some(code),
    }
}

/// Executor describing an up-to-date host: no pending updates and no
/// orphans (both queries exit 1 with no output).
pub fn up_to_date_host() -> RecordingExecutor {
    RecordingExecutor::default()
        .respond("pacman -Qu", fail(1, ""))
        .respond("pacman -Qdtq", fail(1, ""))
}

/// A temporary host layout: two backup sources, one temp directory and a
/// backup root, all below one [`tempfile::TempDir`].
pub struct TestHost {
    /// Temporary directory holding the layout.
    pub root: tempfile::TempDir,
}

impl TestHost {
    /// Create the layout with existing `etc`, `home` and `tmp` directories.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        for dir in ["etc", "home", "tmp", "backups"] {
            std::fs::create_dir_all(root.path().join(dir)).expect("create host dir");
        }
        Self { root }
    }

    /// Absolute path of `rel` inside the layout.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    /// Configuration pointing every setting into the layout.
    pub fn config(&self) -> Config {
        Config {
            log_file: self.path("sysmaint.log"),
            backup_root: self.path("backups"),
            backup_paths: vec![self.path("etc"), self.path("home")],
            temp_dirs: vec![self.path("tmp")],
            auto_update: false,
        }
    }
}

/// Build a [`Context`] for `config` around `executor`, returning the logger
/// so tests can inspect recorded phase outcomes.
pub fn make_context(config: Config, executor: Arc<RecordingExecutor>) -> (Context, Arc<Logger>) {
    let log = Arc::new(Logger::new(&config.log_file));
    let ctx = Context::new(
        Arc::new(config),
        Arc::clone(&log) as Arc<dyn Log>,
        false,
        executor as Arc<dyn Executor>,
    );
    (ctx, log)
}

/// Set the modification time of `path` to `age` before `now`.
pub fn set_age(path: &Path, now: std::time::SystemTime, age: std::time::Duration) {
    std::fs::File::open(path)
        .expect("open for set_modified")
        .set_modified(now - age)
        .expect("set_modified");
}

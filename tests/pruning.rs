#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the age thresholds of the retention and temp
//! cleanup phases.
//!
//! Modification times are set explicitly relative to the context's start
//! time so the 5-day and 1-day boundaries can be checked on a real
//! filesystem.

mod common;

use std::sync::Arc;
use std::time::Duration;

use sysmaint::logging::TaskStatus;
use sysmaint::tasks::retention::{BACKUP_MAX_AGE, PruneBackups};
use sysmaint::tasks::temp_cleanup::{CleanTempFiles, TEMP_MAX_AGE};
use sysmaint::tasks::{Task, execute};

use common::*;

const HOUR: Duration = Duration::from_secs(60 * 60);

#[test]
fn thresholds_are_five_days_and_one_day() {
    assert_eq!(BACKUP_MAX_AGE, 5 * 24 * HOUR);
    assert_eq!(TEMP_MAX_AGE, 24 * HOUR);
}

#[test]
fn backups_past_retention_are_removed_and_newer_kept() {
    let host = TestHost::new();
    let (ctx, log) = make_context(host.config(), Arc::new(up_to_date_host()));
    let now = ctx.now();
    let expired = host.path("backups/20260101");
    let kept = host.path("backups/20260104");
    std::fs::create_dir_all(expired.join("etc_backup")).unwrap();
    std::fs::write(expired.join("etc_backup").join("fstab"), "").unwrap();
    std::fs::create_dir_all(&kept).unwrap();
    set_age(&expired, now, BACKUP_MAX_AGE + HOUR);
    set_age(&kept, now, BACKUP_MAX_AGE - HOUR);

    execute(&PruneBackups, &ctx);

    assert!(!expired.exists());
    assert!(kept.exists());
    assert_eq!(log.entries()[0].status, TaskStatus::Ok);
}

#[test]
fn temp_entries_past_one_day_are_removed_and_newer_kept() {
    let host = TestHost::new();
    let (ctx, log) = make_context(host.config(), Arc::new(up_to_date_host()));
    let now = ctx.now();
    let stale = host.path("tmp/stale.pid");
    let fresh = host.path("tmp/fresh.pid");
    let stale_dir = host.path("tmp/build-1234");
    std::fs::create_dir_all(&stale_dir).unwrap();
    std::fs::write(&stale, "").unwrap();
    std::fs::write(&fresh, "").unwrap();
    std::fs::write(stale_dir.join("obj.o"), "").unwrap();
    set_age(&stale, now, TEMP_MAX_AGE + HOUR);
    set_age(&fresh, now, TEMP_MAX_AGE - HOUR);
    set_age(&stale_dir.join("obj.o"), now, 3 * TEMP_MAX_AGE);
    set_age(&stale_dir, now, 3 * TEMP_MAX_AGE);

    execute(&CleanTempFiles, &ctx);

    assert!(!stale.exists());
    assert!(fresh.exists());
    assert!(!stale_dir.exists());
    assert!(host.path("tmp").exists());
    assert_eq!(log.entries()[0].name, CleanTempFiles.name());
    assert_eq!(log.entries()[0].status, TaskStatus::Ok);
}

#[test]
fn missing_temp_dir_is_warned() {
    let host = TestHost::new();
    let mut config = host.config();
    config.temp_dirs.push(host.path("var-tmp"));
    let (ctx, log) = make_context(config, Arc::new(up_to_date_host()));

    execute(&CleanTempFiles, &ctx);

    assert_eq!(log.entries()[0].status, TaskStatus::Warned);
}

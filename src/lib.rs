//! System maintenance runner.
//!
//! Runs a fixed sequence of maintenance phases on an Arch-style host:
//! package database sync and upgrade, dated directory backups, backup
//! retention, temporary-file cleanup and orphan-package removal.  Every phase
//! is fail-soft and every message goes to both the console and an
//! append-only log file.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: create and load the TOML configuration file
//! - **[`resources`]**: primitives over pacman, rsync and age-based pruning
//! - **[`tasks`]**: the maintenance phases wired to resources
//! - **[`commands`]**: preconditions, the phase loop and the exit status
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod operations;
pub mod privilege;
pub mod resources;
pub mod tasks;

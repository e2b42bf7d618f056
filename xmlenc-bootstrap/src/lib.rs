// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # xmlenc-bootstrap
//!
//! Process-level concerns for the `xmlenc` CLI binary: argument parsing,
//! exit codes, and a logging facade over `tracing`. Kept separate from the
//! `xmlenc` library crate so the encrypt/decrypt engine never depends on
//! how it's invoked.

pub mod cli;
pub mod exit_code;
pub mod logger;

pub use cli::{Cli, Command, EncryptType};
pub use exit_code::ExitCode;
pub use logger::{BootstrapLogger, ConsoleLogger, NoOpLogger};

use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber writing to stderr, honoring `RUST_LOG`
/// and falling back to `info`, or `debug` when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

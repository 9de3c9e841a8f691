//! certutil: list, verify and prune certificates held in a credential store
//!
//! The binary is a thin shell around this library:
//! 1. [`cli::normalize_args`] accepts the historic `certutil -list <name>` spelling
//! 2. [`settings::Settings`] layers defaults, a config file, `CERTUTIL_*` and flags
//! 3. [`logging::init_tracing`] sends diagnostics to stderr
//! 4. [`run`] opens the configured store and writes the report to stdout

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod settings;
pub mod usage;

pub use cli::{normalize_args, Cli, Command};
pub use error::{CliError, Result};
pub use settings::{LogFormat, LoggingSettings, Overrides, Settings};

use credential_store::open_store;
use retention_engine::RetentionEngine;
use std::io::Write;

/// Open the store named by `settings` and execute `command` against it.
///
/// # Errors
///
/// Fails when the store cannot be opened or `out` cannot be written.
pub fn run<W: Write>(command: &Command, settings: &Settings, out: &mut W) -> Result<()> {
    let store = open_store(&settings.store)?;
    let engine = RetentionEngine::new(store);
    commands::execute(command, &engine, out)
}

//! # propgen
//!
//! **CLI Binary**
//!
//! This is the entry point for the `propgen` command-line application.
//! It orchestrates the other crates to perform the requested actions.
//!
//! ## Responsibilities
//! * Parse command line arguments
//! * Initialise logging
//! * Load `propgen.toml` and layer flags over it
//! * Dispatch commands to appropriate handlers
//! * Handle errors and exit codes
//!
//! This crate should contain minimal business logic.

mod commands;
mod config;
mod error_hints;
mod logging;

use anyhow::Result;
use clap::Parser;

use propgen_config::Cli;

/// How a successful invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything requested was done.
    Success,
    /// The run finished but some output files could not be written.
    Partial,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Partial => 2,
        }
    }
}

/// Entry point used by the `propgen` binary.
pub fn run() -> Result<Outcome> {
    let cli = Cli::parse();
    logging::init(&cli.global);
    commands::dispatch(cli)
}

/// Render an error for stderr, with hints when the failure is recognisable.
pub fn format_error(err: &anyhow::Error) -> String {
    error_hints::format(err)
}

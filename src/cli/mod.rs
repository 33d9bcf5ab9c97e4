//! # CLI Module
//!
//! This module defines the command-line interface for repoman using `clap`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `audit` | Audit the repositories of an organization |
//! | `init` | Write a starter configuration file |
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `-c, --config <FILE>` - Path to configuration file
//! - `--log-json` - Emit logs as JSON lines
//!
//! ## Examples
//!
//! ```bash
//! # Audit an organization, token taken from GITHUB_TOKEN
//! repoman audit acme --domain example.com
//!
//! # Machine-readable report
//! repoman audit acme --domain example.com --format json -o report.json
//! ```

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{AuditArgs, InitArgs};

/// repoman - Audit GitHub organizations for branch protection and CI webhook compliance
#[derive(Parser, Debug)]
#[command(name = "repoman")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit the repositories of an organization
    Audit(AuditArgs),

    /// Write a starter configuration file
    Init(InitArgs),
}

//! repoman Library
//!
//! This crate audits the repositories of a GitHub organization for two
//! policies: branch protection of the default branch and CI webhook wiring.
//!
//! The classification logic in [`rules`] is pure; [`providers`] fetches the
//! data it consumes and [`cli`] drives both from the command line.

pub mod cli;
pub mod config;
pub mod error;
pub mod providers;
pub mod rules;
pub mod utils;

pub use cli::exit_codes;
pub use error::RepomanError;

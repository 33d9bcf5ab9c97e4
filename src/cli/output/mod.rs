//! Output formatting module for CLI

pub mod json;
mod terminal;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

use crate::error::RepomanError;
use crate::rules::results::AuditResults;

/// Trait for rendering audit output
pub trait ReportRenderer {
    fn render_report(&self, results: &AuditResults) -> Result<String, RepomanError>;
}

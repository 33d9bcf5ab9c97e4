//! Terminal output formatting with colors

use colored::Colorize;

use super::ReportRenderer;
use crate::error::RepomanError;
use crate::rules::protection::ProtectionTier;
use crate::rules::results::{AuditResults, RepositoryComplianceRecord};
use crate::rules::webhooks::HookStatus;

pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn format_header(&self, results: &AuditResults) -> String {
        format!(
            "\n{} v{}\n\n{} {}\n{} {}\n",
            "repoman".cyan().bold(),
            env!("CARGO_PKG_VERSION"),
            "Organization:".dimmed(),
            results.organization.white().bold(),
            "CI proxy:".dimmed(),
            format!("ci-proxy.{}", results.domain).yellow()
        )
    }

    fn format_records(&self, results: &AuditResults) -> String {
        let mut output = format!(
            "\n{}\n{}\n\n",
            "━".repeat(50).dimmed(),
            "  REPOSITORIES".bold()
        );

        if results.records().is_empty() {
            output.push_str(&format!("  {}\n", "No repositories audited.".dimmed()));
            return output;
        }

        for record in results.records() {
            output.push_str(&self.format_record(record));
        }

        output
    }

    fn format_record(&self, record: &RepositoryComplianceRecord) -> String {
        if let Some(error) = &record.error {
            return format!(
                "  {} {}\n    {} {}\n",
                "!".yellow().bold(),
                record.name.white(),
                "└─".dimmed(),
                error.yellow()
            );
        }

        let marker = if record.is_compliant() {
            "✓".green().bold()
        } else {
            "✗".red().bold()
        };

        let tier = record.protection_tier();
        let tier_label = match tier {
            ProtectionTier::Unprotected => tier.label().red(),
            _ => tier.label().green(),
        };

        let hooks = if record.ci_hooks_valid {
            "ci hooks ok".green()
        } else {
            "ci hooks missing or invalid".red()
        };

        let mut output = format!(
            "  {} {}  [{}] [{}]\n",
            marker,
            record.name.white().bold(),
            tier_label,
            hooks
        );

        if !record.ci_hooks_valid {
            for (role, status) in [
                ("push", record.hooks.push),
                ("pull request", record.hooks.pull_request),
            ] {
                let detail = match status {
                    HookStatus::Valid => continue,
                    HookStatus::Missing => "missing",
                    HookStatus::Invalid => "misconfigured",
                };
                output.push_str(&format!(
                    "    {} {} hook {}\n",
                    "└─".dimmed(),
                    role,
                    detail.dimmed()
                ));
            }
        }

        output
    }

    fn format_summary(&self, results: &AuditResults) -> String {
        let mut output = format!("\n{}\n{}\n\n", "━".repeat(50).dimmed(), "  SUMMARY".bold());

        output.push_str(&format!(
            "  {} {}   {} {}   {} {}\n",
            "Compliant:".dimmed(),
            results.compliant_count().to_string().green().bold(),
            "Non-compliant:".dimmed(),
            results.non_compliant_count().to_string().red().bold(),
            "Failed:".dimmed(),
            results.failed_count().to_string().yellow().bold()
        ));
        output.push_str(&format!(
            "  {} {} protected, {} protected + build check, {} with valid CI hooks (of {})\n",
            "Details:".dimmed(),
            results.count_by_tier(ProtectionTier::Protected),
            results.count_by_tier(ProtectionTier::ProtectedWithStatusCheck),
            results.ci_hooks_valid_count(),
            results.total_count()
        ));

        output
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TerminalOutput {
    fn render_report(&self, results: &AuditResults) -> Result<String, RepomanError> {
        let mut output = self.format_header(results);
        output.push_str(&self.format_records(results));
        output.push_str(&self.format_summary(results));
        Ok(output)
    }
}

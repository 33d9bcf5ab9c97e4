//! JSON output formatting

use serde::Serialize;

use super::ReportRenderer;
use crate::error::RepomanError;
use crate::rules::protection::ProtectionTier;
use crate::rules::results::{AuditResults, RepositoryComplianceRecord};

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    version: &'static str,
    organization: &'a str,
    domain: &'a str,
    generated_at: String,
    summary: Summary,
    repositories: &'a [RepositoryComplianceRecord],
}

#[derive(Serialize)]
struct Summary {
    total: usize,
    compliant: usize,
    non_compliant: usize,
    failed: usize,
    protected: usize,
    protected_with_status_check: usize,
    ci_hooks_valid: usize,
}

impl ReportRenderer for JsonOutput {
    fn render_report(&self, results: &AuditResults) -> Result<String, RepomanError> {
        let output = ReportOutput {
            version: env!("CARGO_PKG_VERSION"),
            organization: &results.organization,
            domain: &results.domain,
            generated_at: results.generated_at.to_rfc3339(),
            summary: Summary {
                total: results.total_count(),
                compliant: results.compliant_count(),
                non_compliant: results.non_compliant_count(),
                failed: results.failed_count(),
                protected: results.count_by_tier(ProtectionTier::Protected),
                protected_with_status_check: results
                    .count_by_tier(ProtectionTier::ProtectedWithStatusCheck),
                ci_hooks_valid: results.ci_hooks_valid_count(),
            },
            repositories: results.records(),
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}

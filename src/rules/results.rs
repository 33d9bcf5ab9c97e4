//! # Audit Results Structures
//!
//! This module defines the per-repository compliance record and the
//! collection produced by one audit run.
//!
//! ## Examples
//!
//! ```rust
//! use repoman::rules::protection::ProtectionClassification;
//! use repoman::rules::results::{AuditResults, RepositoryComplianceRecord};
//! use repoman::rules::webhooks::WebhookReport;
//!
//! let protection = ProtectionClassification { protected: true, protected_with_status_check: false };
//! let record = RepositoryComplianceRecord::new("widget", protection, WebhookReport::default());
//!
//! let mut results = AuditResults::new("acme", "example.com");
//! results.add_record(record);
//!
//! assert_eq!(results.non_compliant_count(), 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::protection::{ProtectionClassification, ProtectionTier};
use super::webhooks::WebhookReport;

/// Compliance status of a single repository.
///
/// Records are recomputed from scratch on every run and identified by name
/// only. A record carrying an `error` could not be audited and has every
/// flag cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryComplianceRecord {
    /// Repository name
    pub name: String,

    /// Default branch protected for everyone, no status checks
    pub protected: bool,

    /// Default branch protected for everyone and gated on `build`
    pub protected_with_status_check: bool,

    /// Both CI notifier webhooks present and valid
    pub ci_hooks_valid: bool,

    /// Test CI proxy wiring; not evaluated, always false
    pub ci_test_hooks: bool,

    /// Per-role webhook detail
    #[serde(default)]
    pub hooks: WebhookReport,

    /// Why the repository could not be audited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RepositoryComplianceRecord {
    /// Merge both classifications into a record
    pub fn new(
        name: impl Into<String>,
        protection: ProtectionClassification,
        hooks: WebhookReport,
    ) -> Self {
        Self {
            name: name.into(),
            protected: protection.protected,
            protected_with_status_check: protection.protected_with_status_check,
            ci_hooks_valid: hooks.ci_hooks_valid(),
            ci_test_hooks: hooks.ci_test_hooks(),
            hooks,
            error: None,
        }
    }

    /// Record for a repository whose data could not be fetched
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            protected: false,
            protected_with_status_check: false,
            ci_hooks_valid: false,
            ci_test_hooks: false,
            hooks: WebhookReport::default(),
            error: Some(error.into()),
        }
    }

    /// Protection tier of the default branch
    pub fn protection_tier(&self) -> ProtectionTier {
        ProtectionClassification {
            protected: self.protected,
            protected_with_status_check: self.protected_with_status_check,
        }
        .tier()
    }

    /// Protected in either tier and wired into CI
    pub fn is_compliant(&self) -> bool {
        (self.protected || self.protected_with_status_check) && self.ci_hooks_valid
    }

    /// Whether the repository could not be audited
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Collection of records from a complete audit run
#[derive(Debug, Clone)]
pub struct AuditResults {
    /// Audited organization
    pub organization: String,

    /// Domain of the CI proxy the webhooks were checked against
    pub domain: String,

    /// When the run started
    pub generated_at: DateTime<Utc>,

    /// One record per repository, in listing order
    records: Vec<RepositoryComplianceRecord>,
}

impl AuditResults {
    pub fn new(organization: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            domain: domain.into(),
            generated_at: Utc::now(),
            records: Vec::new(),
        }
    }

    /// Add a record
    pub fn add_record(&mut self, record: RepositoryComplianceRecord) {
        self.records.push(record);
    }

    /// Add multiple records
    pub fn add_records(&mut self, records: impl IntoIterator<Item = RepositoryComplianceRecord>) {
        self.records.extend(records);
    }

    /// Get all records
    pub fn records(&self) -> &[RepositoryComplianceRecord] {
        &self.records
    }

    /// Look up a record by repository name
    pub fn record(&self, name: &str) -> Option<&RepositoryComplianceRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    pub fn compliant_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_compliant()).count()
    }

    /// Audited repositories that are not compliant
    pub fn non_compliant_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.is_failed() && !r.is_compliant())
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_failed()).count()
    }

    /// Count records in a given protection tier
    pub fn count_by_tier(&self, tier: ProtectionTier) -> usize {
        self.records
            .iter()
            .filter(|r| !r.is_failed() && r.protection_tier() == tier)
            .count()
    }

    pub fn ci_hooks_valid_count(&self) -> usize {
        self.records.iter().filter(|r| r.ci_hooks_valid).count()
    }
}

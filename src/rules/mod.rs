//! Rules module - Compliance classification and the audit engine
//!
//! - [`protection`] classifies branch protection settings
//! - [`webhooks`] validates CI webhooks against their canonical definitions
//! - [`results`] merges both into per-repository records
//! - [`engine`] drives a whole organization through the above

pub mod constants;
pub mod engine;
pub mod protection;
pub mod results;
pub mod webhooks;

pub use protection::{classify_protection, BranchProtectionSettings, ProtectionTier};
pub use results::{AuditResults, RepositoryComplianceRecord};
pub use webhooks::{validate_ci_hooks, Webhook, WebhookValidator};

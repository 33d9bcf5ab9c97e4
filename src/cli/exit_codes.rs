//! Exit codes for the CLI
//!
//! Standard exit codes used by the repoman CLI so audits can gate CI jobs.
//!
//! # Exit Code Reference
//!
//! | Code | Constant | Meaning |
//! |------|----------|---------|
//! | 0 | `SUCCESS` | Every audited repository is compliant |
//! | 1 | `NON_COMPLIANT` | At least one repository is not compliant |
//! | 2 | `AUDIT_FAILURES` | At least one repository could not be audited |
//! | 3 | `ERROR` | Runtime error (API unreachable, timeout, ...) |
//! | 4 | `INVALID_ARGS` | Missing or invalid configuration |

use crate::error::RepomanError;
use crate::rules::results::AuditResults;

/// Every audited repository is compliant, or the command completed normally.
pub const SUCCESS: i32 = 0;

/// At least one repository lacks protection or correct CI webhooks.
pub const NON_COMPLIANT: i32 = 1;

/// At least one repository could not be fetched.
///
/// Takes precedence over `NON_COMPLIANT`: an incomplete audit cannot vouch
/// for the organization.
pub const AUDIT_FAILURES: i32 = 2;

/// Runtime error.
///
/// Used when:
/// - The organization cannot be listed
/// - A repository fails under `--fail-fast`
/// - The audit times out or is cancelled
/// - The report cannot be written
pub const ERROR: i32 = 3;

/// Missing or invalid configuration (organization, domain, token, ...).
pub const INVALID_ARGS: i32 = 4;

/// Exit code summarizing an audit
pub fn for_results(results: &AuditResults) -> i32 {
    if results.failed_count() > 0 {
        AUDIT_FAILURES
    } else if results.non_compliant_count() > 0 {
        NON_COMPLIANT
    } else {
        SUCCESS
    }
}

/// Exit code for a command that failed with `err`
pub fn for_error(err: &RepomanError) -> i32 {
    match err {
        RepomanError::Config(_) => INVALID_ARGS,
        _ => ERROR,
    }
}

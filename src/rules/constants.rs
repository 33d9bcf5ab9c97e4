//! Compliance policy constants

/// Enforcement level under which protection also binds administrators
pub const ENFORCEMENT_EVERYONE: &str = "everyone";

/// Status check context that qualifies a branch for the status-check tier
pub const BUILD_STATUS_CONTEXT: &str = "build";

/// Subdomain of the production CI proxy receiving webhooks
pub const CI_PROXY_SUBDOMAIN: &str = "ci-proxy";

/// Path of the push notifier endpoint on the CI proxy
pub const PUSH_HOOK_PATH: &str = "github-webhook";

/// Path of the pull-request notifier endpoint on the CI proxy
pub const PULL_REQUEST_HOOK_PATH: &str = "ghprbhook";

/// Events the push notifier must be subscribed to
pub const PUSH_HOOK_EVENTS: &[&str] = &["push"];

/// Events the pull-request notifier must be subscribed to
pub const PULL_REQUEST_HOOK_EVENTS: &[&str] = &["issue_comment", "pull_request"];

/// Required webhook payload encoding
pub const EXPECTED_CONTENT_TYPE: &str = "form";

/// Required webhook TLS verification flag (`0` = verify certificates)
pub const EXPECTED_INSECURE_SSL: &str = "0";

/// Build the URL a CI webhook is expected to deliver to
pub fn ci_hook_url(subdomain: &str, domain: &str, path: &str) -> String {
    format!("https://{}.{}/{}/", subdomain, domain, path)
}

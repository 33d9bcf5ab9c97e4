//! CI webhook validation
//!
//! A repository is wired into CI when it carries two webhooks pointing at
//! the CI proxy: a push notifier and a pull-request/comment notifier. Each
//! must match its canonical definition exactly.
//!
//! Hooks are scanned once. When several hooks point at the same canonical
//! URL, the last one in the list decides the outcome for that role.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::constants::{
    ci_hook_url, CI_PROXY_SUBDOMAIN, EXPECTED_CONTENT_TYPE, EXPECTED_INSECURE_SSL,
    PULL_REQUEST_HOOK_EVENTS, PULL_REQUEST_HOOK_PATH, PUSH_HOOK_EVENTS, PUSH_HOOK_PATH,
};

/// A webhook configured on a repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    /// Events the hook is subscribed to
    #[serde(default)]
    pub events: BTreeSet<String>,

    /// Delivery configuration (`url`, `content_type`, `insecure_ssl`, ...)
    #[serde(default)]
    pub config: HashMap<String, String>,
}

impl Webhook {
    /// Create a webhook from its events and delivery URL.
    ///
    /// `content_type` and `insecure_ssl` are left unset; use
    /// [`Webhook::with_config`] to add them.
    pub fn new(events: impl IntoIterator<Item = impl Into<String>>, url: impl Into<String>) -> Self {
        let mut config = HashMap::new();
        config.insert("url".to_string(), url.into());
        Self {
            events: events.into_iter().map(Into::into).collect(),
            config,
        }
    }

    /// Set a config entry
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Delivery URL, if configured
    pub fn url(&self) -> Option<&str> {
        self.config_value("url")
    }

    fn config_value(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }
}

/// Which CI notifier a canonical webhook stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookRole {
    Push,
    PullRequest,
}

impl HookRole {
    fn path(&self) -> &'static str {
        match self {
            Self::Push => PUSH_HOOK_PATH,
            Self::PullRequest => PULL_REQUEST_HOOK_PATH,
        }
    }

    fn events(&self) -> &'static [&'static str] {
        match self {
            Self::Push => PUSH_HOOK_EVENTS,
            Self::PullRequest => PULL_REQUEST_HOOK_EVENTS,
        }
    }
}

/// The exact shape a correctly configured CI webhook must have
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalWebhook {
    pub url: String,
    pub events: BTreeSet<String>,
    pub content_type: &'static str,
    pub insecure_ssl: &'static str,
}

impl CanonicalWebhook {
    /// Canonical definition of `role` on the CI proxy of `domain`
    pub fn new(role: HookRole, domain: &str) -> Self {
        Self {
            url: ci_hook_url(CI_PROXY_SUBDOMAIN, domain, role.path()),
            events: role.events().iter().map(|e| e.to_string()).collect(),
            content_type: EXPECTED_CONTENT_TYPE,
            insecure_ssl: EXPECTED_INSECURE_SSL,
        }
    }

    fn targets(&self, hook: &Webhook) -> bool {
        hook.url() == Some(self.url.as_str())
    }

    /// Whether a hook already pointing at this URL is configured correctly.
    ///
    /// The event set must match exactly: a superset is as wrong as a subset.
    pub fn accepts(&self, hook: &Webhook) -> bool {
        hook.events == self.events
            && hook.config_value("content_type") == Some(self.content_type)
            && hook.config_value("insecure_ssl") == Some(self.insecure_ssl)
    }
}

/// Outcome for one canonical role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookStatus {
    /// No hook points at the canonical URL
    #[default]
    Missing,
    /// A hook points at the canonical URL but is misconfigured
    Invalid,
    /// A hook matches the canonical definition
    Valid,
}

impl HookStatus {
    fn from_match(valid: bool) -> Self {
        if valid {
            Self::Valid
        } else {
            Self::Invalid
        }
    }
}

/// Per-role outcome of validating a repository's webhooks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookReport {
    pub push: HookStatus,
    pub pull_request: HookStatus,
}

impl WebhookReport {
    /// True iff both notifiers are present and valid
    pub fn ci_hooks_valid(&self) -> bool {
        self.push == HookStatus::Valid && self.pull_request == HookStatus::Valid
    }

    /// Hooks for the test CI proxy are not checked and never count as wired
    pub fn ci_test_hooks(&self) -> bool {
        false
    }
}

/// Validates webhook lists against the canonical CI notifiers of a domain
#[derive(Debug, Clone)]
pub struct WebhookValidator {
    push: CanonicalWebhook,
    pull_request: CanonicalWebhook,
}

impl WebhookValidator {
    pub fn new(domain: &str) -> Self {
        Self {
            push: CanonicalWebhook::new(HookRole::Push, domain),
            pull_request: CanonicalWebhook::new(HookRole::PullRequest, domain),
        }
    }

    /// Validate every hook of a repository in a single pass
    pub fn validate(&self, hooks: &[Webhook]) -> WebhookReport {
        let mut report = WebhookReport::default();

        for hook in hooks {
            if self.push.targets(hook) {
                report.push = HookStatus::from_match(self.push.accepts(hook));
            }
            if self.pull_request.targets(hook) {
                report.pull_request = HookStatus::from_match(self.pull_request.accepts(hook));
            }
        }

        report
    }
}

/// Check whether `hooks` wire a repository into the CI proxy of `domain`.
///
/// # Examples
///
/// ```rust
/// use repoman::rules::webhooks::{validate_ci_hooks, Webhook};
///
/// let hooks = vec![
///     Webhook::new(["push"], "https://ci-proxy.test.com/github-webhook/")
///         .with_config("content_type", "form")
///         .with_config("insecure_ssl", "0"),
///     Webhook::new(["issue_comment", "pull_request"], "https://ci-proxy.test.com/ghprbhook/")
///         .with_config("content_type", "form")
///         .with_config("insecure_ssl", "0"),
/// ];
///
/// assert!(validate_ci_hooks(&hooks, "test.com"));
/// assert!(!validate_ci_hooks(&hooks[..1], "test.com"));
/// ```
pub fn validate_ci_hooks(hooks: &[Webhook], domain: &str) -> bool {
    WebhookValidator::new(domain).validate(hooks).ci_hooks_valid()
}

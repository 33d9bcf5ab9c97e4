//! Classification tests driven by GitHub API payloads

use pretty_assertions::assert_eq;
use repoman::providers::github::{BranchResponse, HookResponse};
use repoman::rules::protection::{classify_protection, BranchProtectionSettings};
use repoman::rules::webhooks::{HookStatus, Webhook, WebhookValidator};

const BRANCH_TEMPLATE: &str = include_str!("fixtures/branch_response.json");

/// Decode a full branch response carrying the given `protection` block
fn settings_from_branch(protection: &str) -> BranchProtectionSettings {
    let body = BRANCH_TEMPLATE.replace("{{protection}}", protection);
    let response: BranchResponse = serde_json::from_str(&body).unwrap();
    response.into()
}

fn protection_block(enabled: bool, level: &str, contexts: &str) -> String {
    format!(
        r#""protection": {{
            "enabled": {enabled},
            "required_status_checks": {{
                "enforcement_level": "{level}",
                "contexts": {contexts}
            }}
        }}"#
    )
}

fn hooks_from_json(json: &str) -> Vec<Webhook> {
    let hooks: Vec<HookResponse> = serde_json::from_str(json).unwrap();
    hooks.into_iter().map(Webhook::from).collect()
}

#[test]
fn test_protected_no_context_include_admins() {
    let settings = settings_from_branch(&protection_block(true, "everyone", "[]"));
    let result = classify_protection(&settings);
    assert!(result.protected);
    assert!(!result.protected_with_status_check);
}

#[test]
fn test_protected_with_build_status_check() {
    let settings = settings_from_branch(&protection_block(true, "everyone", r#"["build"]"#));
    let result = classify_protection(&settings);
    assert!(!result.protected);
    assert!(result.protected_with_status_check);
}

#[test]
fn test_protection_disabled() {
    let settings = settings_from_branch(&protection_block(false, "everyone", "[]"));
    let result = classify_protection(&settings);
    assert!(!result.protected);
    assert!(!result.protected_with_status_check);
}

#[test]
fn test_protection_exempting_admins() {
    for contexts in ["[]", r#"["build"]"#] {
        let settings = settings_from_branch(&protection_block(true, "non_admins", contexts));
        let result = classify_protection(&settings);
        assert!(!result.protected);
        assert!(!result.protected_with_status_check);
    }
}

#[test]
fn test_branch_decoding_keeps_only_protection() {
    let settings = settings_from_branch(&protection_block(
        true,
        "everyone",
        r#"["lint", "build"]"#,
    ));
    assert_eq!(
        settings,
        BranchProtectionSettings {
            enabled: true,
            enforcement_level: "everyone".to_string(),
            required_status_check_contexts: vec!["lint".to_string(), "build".to_string()],
        }
    );
}

#[test]
fn test_branch_without_status_checks() {
    let settings = settings_from_branch(r#""protection": { "enabled": true }"#);
    assert!(settings.enabled);
    assert!(!classify_protection(&settings).protected);
}

const CANONICAL_HOOKS: &str = r#"[
    {
        "type": "Repository",
        "id": 12345678,
        "name": "web",
        "active": true,
        "events": ["push"],
        "config": {
            "content_type": "form",
            "insecure_ssl": "0",
            "url": "https://ci-proxy.test.com/github-webhook/"
        },
        "updated_at": "2019-06-03T00:57:16Z",
        "created_at": "2019-06-03T00:57:16Z"
    },
    {
        "type": "Repository",
        "id": 12345679,
        "name": "web",
        "active": true,
        "events": ["pull_request", "issue_comment"],
        "config": {
            "content_type": "form",
            "insecure_ssl": "0",
            "url": "https://ci-proxy.test.com/ghprbhook/"
        }
    }
]"#;

#[test]
fn test_hooks_empty() {
    let report = WebhookValidator::new("").validate(&hooks_from_json("[]"));
    assert!(!report.ci_hooks_valid());
    assert!(!report.ci_test_hooks());
}

#[test]
fn test_hooks_ci() {
    let report = WebhookValidator::new("test.com").validate(&hooks_from_json(CANONICAL_HOOKS));
    assert!(report.ci_hooks_valid());
    assert!(!report.ci_test_hooks());
}

#[test]
fn test_hooks_push_subscribed_to_pull_requests() {
    let json = CANONICAL_HOOKS.replacen(r#"["push"]"#, r#"["push", "pull_request"]"#, 1);
    let report = WebhookValidator::new("test.com").validate(&hooks_from_json(&json));
    assert_eq!(report.push, HookStatus::Invalid);
    assert_eq!(report.pull_request, HookStatus::Valid);
    assert!(!report.ci_hooks_valid());
}

#[test]
fn test_hooks_insecure_ssl() {
    let json = CANONICAL_HOOKS.replacen(r#""insecure_ssl": "0""#, r#""insecure_ssl": "1""#, 1);
    let report = WebhookValidator::new("test.com").validate(&hooks_from_json(&json));
    assert!(!report.ci_hooks_valid());
}

#[test]
fn test_classifiers_are_idempotent() {
    let settings = settings_from_branch(&protection_block(true, "everyone", "[]"));
    let hooks = hooks_from_json(CANONICAL_HOOKS);
    let validator = WebhookValidator::new("test.com");

    let first = (classify_protection(&settings), validator.validate(&hooks));
    let second = (classify_protection(&settings), validator.validate(&hooks));
    assert_eq!(first, second);
}

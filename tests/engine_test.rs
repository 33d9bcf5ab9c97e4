//! Audit engine tests against an in-memory organization

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use repoman::error::{ProviderError, RepomanError};
use repoman::providers::{HostingApi, RepositoryRef};
use repoman::rules::engine::{AuditEngine, AuditOptions};
use repoman::rules::protection::BranchProtectionSettings;
use repoman::rules::results::RepositoryComplianceRecord;
use repoman::rules::webhooks::{HookStatus, Webhook};

const DOMAIN: &str = "test.com";

#[derive(Default, Clone)]
struct FakeRepo {
    protection: BranchProtectionSettings,
    hooks: Vec<Webhook>,
    broken: bool,
    delay_ms: u64,
}

/// Organization held in memory
#[derive(Default)]
struct FakeOrganization {
    listing: Vec<RepositoryRef>,
    repos: HashMap<String, FakeRepo>,
    list_fails: bool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeOrganization {
    fn with_repo(mut self, repo: RepositoryRef, data: FakeRepo) -> Self {
        self.repos.insert(repo.name.clone(), data);
        self.listing.push(repo);
        self
    }

    fn repo(&self, name: &str) -> Result<&FakeRepo, ProviderError> {
        let repo = self.repos.get(name).ok_or_else(|| ProviderError::Api {
            endpoint: format!("/repos/acme/{}", name),
            message: "Not Found".to_string(),
        })?;
        if repo.broken {
            return Err(ProviderError::Transport {
                endpoint: format!("/repos/acme/{}/hooks", name),
                message: "connection reset".to_string(),
            });
        }
        Ok(repo)
    }
}

#[async_trait]
impl HostingApi for FakeOrganization {
    async fn list_repositories(&self, _: &str) -> Result<Vec<RepositoryRef>, ProviderError> {
        if self.list_fails {
            return Err(ProviderError::Api {
                endpoint: "/orgs/acme/repos".to_string(),
                message: "Bad credentials".to_string(),
            });
        }
        Ok(self.listing.clone())
    }

    async fn branch_protection(
        &self,
        _: &str,
        repository: &str,
        _: &str,
    ) -> Result<BranchProtectionSettings, ProviderError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self.repos.get(repository).map(|r| r.delay_ms).unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.repo(repository)?.protection.clone())
    }

    async fn list_webhooks(&self, _: &str, repository: &str) -> Result<Vec<Webhook>, ProviderError> {
        Ok(self.repo(repository)?.hooks.clone())
    }
}

fn protected() -> BranchProtectionSettings {
    BranchProtectionSettings {
        enabled: true,
        enforcement_level: "everyone".to_string(),
        required_status_check_contexts: Vec::new(),
    }
}

fn canonical_hooks() -> Vec<Webhook> {
    vec![
        Webhook::new(["push"], "https://ci-proxy.test.com/github-webhook/")
            .with_config("content_type", "form")
            .with_config("insecure_ssl", "0"),
        Webhook::new(
            ["issue_comment", "pull_request"],
            "https://ci-proxy.test.com/ghprbhook/",
        )
        .with_config("content_type", "form")
        .with_config("insecure_ssl", "0"),
    ]
}

fn compliant_repo() -> FakeRepo {
    FakeRepo {
        protection: protected(),
        hooks: canonical_hooks(),
        ..Default::default()
    }
}

fn names(records: &[RepositoryComplianceRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}

#[tokio::test]
async fn test_audit_classifies_each_repository() {
    let org = FakeOrganization::default()
        .with_repo(RepositoryRef::new("widget"), compliant_repo())
        .with_repo(
            RepositoryRef::new("gadget"),
            FakeRepo {
                protection: protected(),
                hooks: canonical_hooks()[..1].to_vec(),
                ..Default::default()
            },
        )
        .with_repo(RepositoryRef::new("gizmo"), FakeRepo::default());

    let engine = AuditEngine::new(&org, DOMAIN, AuditOptions::default());
    let results = engine.run("acme").await.unwrap();

    assert_eq!(results.organization, "acme");
    assert_eq!(names(results.records()), vec!["widget", "gadget", "gizmo"]);

    let widget = results.record("widget").unwrap();
    assert!(widget.protected && widget.ci_hooks_valid && widget.is_compliant());

    let gadget = results.record("gadget").unwrap();
    assert!(gadget.protected);
    assert!(!gadget.ci_hooks_valid);
    assert_eq!(gadget.hooks.pull_request, HookStatus::Missing);

    let gizmo = results.record("gizmo").unwrap();
    assert!(!gizmo.protected && !gizmo.protected_with_status_check);
    assert!(!gizmo.ci_test_hooks);

    assert_eq!(results.compliant_count(), 1);
    assert_eq!(results.non_compliant_count(), 2);
}

#[tokio::test]
async fn test_fetch_failure_is_isolated() {
    let org = FakeOrganization::default()
        .with_repo(RepositoryRef::new("widget"), compliant_repo())
        .with_repo(
            RepositoryRef::new("broken"),
            FakeRepo {
                broken: true,
                ..compliant_repo()
            },
        )
        .with_repo(RepositoryRef::new("gadget"), compliant_repo());

    let engine = AuditEngine::new(&org, DOMAIN, AuditOptions::default());
    let results = engine.run("acme").await.unwrap();

    assert_eq!(results.total_count(), 3);
    assert_eq!(results.compliant_count(), 2);
    assert_eq!(results.failed_count(), 1);

    let broken = results.record("broken").unwrap();
    assert!(broken.error.as_deref().unwrap().contains("connection reset"));
    assert!(!broken.protected && !broken.ci_hooks_valid);
}

#[tokio::test]
async fn test_fail_fast_aborts_the_run() {
    let org = FakeOrganization::default()
        .with_repo(RepositoryRef::new("widget"), compliant_repo())
        .with_repo(
            RepositoryRef::new("broken"),
            FakeRepo {
                broken: true,
                ..Default::default()
            },
        );
    let options = AuditOptions {
        fail_fast: true,
        ..Default::default()
    };

    let err = AuditEngine::new(&org, DOMAIN, options)
        .run("acme")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepomanError::Provider(ProviderError::Transport { .. })
    ));
}

#[tokio::test]
async fn test_listing_failure_is_fatal() {
    let org = FakeOrganization {
        list_fails: true,
        ..Default::default()
    };

    let err = AuditEngine::new(&org, DOMAIN, AuditOptions::default())
        .run("acme")
        .await
        .unwrap_err();
    assert!(matches!(err, RepomanError::Provider(ProviderError::Api { .. })));
}

#[tokio::test]
async fn test_archived_repositories_are_skipped() {
    let org = FakeOrganization::default()
        .with_repo(RepositoryRef::new("widget"), compliant_repo())
        .with_repo(RepositoryRef::new("fossil").archived(), FakeRepo::default());

    let results = AuditEngine::new(&org, DOMAIN, AuditOptions::default())
        .run("acme")
        .await
        .unwrap();
    assert_eq!(names(results.records()), vec!["widget"]);

    let options = AuditOptions {
        include_archived: true,
        ..Default::default()
    };
    let results = AuditEngine::new(&org, DOMAIN, options)
        .run("acme")
        .await
        .unwrap();
    assert_eq!(names(results.records()), vec!["widget", "fossil"]);
}

#[tokio::test]
async fn test_limit_caps_the_run() {
    let mut org = FakeOrganization::default();
    for i in 0..10 {
        org = org.with_repo(RepositoryRef::new(format!("repo-{i}")), compliant_repo());
    }
    let options = AuditOptions {
        limit: Some(5),
        ..Default::default()
    };

    let results = AuditEngine::new(&org, DOMAIN, options)
        .run("acme")
        .await
        .unwrap();
    assert_eq!(
        names(results.records()),
        vec!["repo-0", "repo-1", "repo-2", "repo-3", "repo-4"]
    );
}

#[tokio::test]
async fn test_concurrency_is_bounded_and_order_preserved() {
    let mut org = FakeOrganization::default();
    for i in 0..8u64 {
        // Earlier repositories answer last
        org = org.with_repo(
            RepositoryRef::new(format!("repo-{i}")),
            FakeRepo {
                delay_ms: (8 - i) * 10,
                ..compliant_repo()
            },
        );
    }
    let options = AuditOptions {
        concurrency: 3,
        ..Default::default()
    };

    let results = AuditEngine::new(&org, DOMAIN, options)
        .run("acme")
        .await
        .unwrap();

    let expected: Vec<String> = (0..8).map(|i| format!("repo-{i}")).collect();
    assert_eq!(names(results.records()), expected);
    assert!(org.max_in_flight.load(Ordering::SeqCst) <= 3);
    assert!(org.max_in_flight.load(Ordering::SeqCst) > 1);
}

#[tokio::test]
async fn test_audit_is_repeatable() {
    let org = FakeOrganization::default()
        .with_repo(RepositoryRef::new("widget"), compliant_repo())
        .with_repo(RepositoryRef::new("gizmo"), FakeRepo::default());
    let engine = AuditEngine::new(&org, DOMAIN, AuditOptions::default());

    let first = engine.run("acme").await.unwrap();
    let second = engine.run("acme").await.unwrap();
    assert_eq!(first.records(), second.records());
}

//! Organization audit engine
//!
//! Lists the repositories of an organization, fetches protection settings and
//! webhooks for each one and merges both classifications into a
//! [`RepositoryComplianceRecord`]. Repositories are processed concurrently up
//! to a fixed bound; records come back in listing order.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, info_span, warn, Instrument};

use super::protection::classify_protection;
use super::results::{AuditResults, RepositoryComplianceRecord};
use super::webhooks::WebhookValidator;
use crate::config::{AuditSettings, FALLBACK_BRANCH};
use crate::error::{ProviderError, RepomanError};
use crate::providers::{HostingApi, RepositoryRef};
use crate::utils::timing::Timer;

/// Called after each repository with its name, the number done and the total
pub type ProgressCallback = Box<dyn Fn(&str, usize, usize) + Send + Sync>;

/// Knobs controlling a run
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Branch to audit instead of each repository's default branch
    pub branch: Option<String>,
    /// Maximum number of repositories in flight
    pub concurrency: usize,
    /// Audit at most this many repositories
    pub limit: Option<usize>,
    pub include_archived: bool,
    /// Abort on the first fetch failure instead of recording it
    pub fail_fast: bool,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            branch: None,
            concurrency: crate::config::loader::default_concurrency(),
            limit: None,
            include_archived: false,
            fail_fast: false,
        }
    }
}

impl From<&AuditSettings> for AuditOptions {
    fn from(settings: &AuditSettings) -> Self {
        Self {
            branch: settings.branch.clone(),
            concurrency: settings.concurrency,
            limit: settings.limit,
            include_archived: settings.include_archived,
            fail_fast: settings.fail_fast,
        }
    }
}

/// Main audit engine
pub struct AuditEngine<'a> {
    provider: &'a dyn HostingApi,
    domain: String,
    validator: WebhookValidator,
    options: AuditOptions,
    progress: Option<ProgressCallback>,
}

impl<'a> AuditEngine<'a> {
    /// Create an engine checking webhooks against the CI proxy of `domain`
    pub fn new(provider: &'a dyn HostingApi, domain: impl Into<String>, options: AuditOptions) -> Self {
        let domain = domain.into();
        Self {
            provider,
            validator: WebhookValidator::new(&domain),
            domain,
            options,
            progress: None,
        }
    }

    /// Set the progress callback
    pub fn set_progress_callback(&mut self, callback: ProgressCallback) {
        self.progress = Some(callback);
    }

    /// Branch audited for `repo`
    fn branch_for<'r>(&'r self, repo: &'r RepositoryRef) -> &'r str {
        self.options
            .branch
            .as_deref()
            .or(repo.default_branch.as_deref())
            .unwrap_or(FALLBACK_BRANCH)
    }

    /// Repositories selected for the run, in listing order
    fn select(&self, repos: Vec<RepositoryRef>) -> Vec<RepositoryRef> {
        let include_archived = self.options.include_archived;
        repos
            .into_iter()
            .filter(|repo| {
                if repo.archived && !include_archived {
                    debug!(repository = %repo.name, "Skipping archived repository");
                    return false;
                }
                true
            })
            .take(self.options.limit.unwrap_or(usize::MAX))
            .collect()
    }

    /// Fetch and classify a single repository
    pub async fn audit_repository(
        &self,
        organization: &str,
        repo: &RepositoryRef,
    ) -> Result<RepositoryComplianceRecord, ProviderError> {
        let branch = self.branch_for(repo);
        debug!(branch, "Fetching protection settings and webhooks");

        let (protection, hooks) = futures::try_join!(
            self.provider
                .branch_protection(organization, &repo.name, branch),
            self.provider.list_webhooks(organization, &repo.name),
        )?;

        let record = RepositoryComplianceRecord::new(
            repo.name.clone(),
            classify_protection(&protection),
            self.validator.validate(&hooks),
        );

        debug!(
            protected = record.protected,
            protected_with_status_check = record.protected_with_status_check,
            ci_hooks_valid = record.ci_hooks_valid,
            "Repository classified"
        );

        Ok(record)
    }

    /// Audit every selected repository of `organization`.
    ///
    /// A failure to list the organization is always fatal. A failure on one
    /// repository is recorded on its record unless `fail_fast` is set.
    pub async fn run(&self, organization: &str) -> Result<AuditResults, RepomanError> {
        info!("Starting audit of organization {}", organization);
        let timer = Timer::start();

        let repos = self.select(self.provider.list_repositories(organization).await?);
        let total = repos.len();
        let mut results = AuditResults::new(organization, &self.domain);

        let mut outcomes = stream::iter(repos.iter())
            .map(move |repo| {
                let span = info_span!("repository", repository = %repo.name);
                async move { (repo, self.audit_repository(organization, repo).await) }
                    .instrument(span)
            })
            .buffered(self.options.concurrency.max(1));

        let mut done = 0;
        while let Some((repo, outcome)) = outcomes.next().await {
            done += 1;

            let record = match outcome {
                Ok(record) => record,
                Err(e) if self.options.fail_fast => return Err(e.into()),
                Err(e) => {
                    warn!(repository = %repo.name, error = %e, "Could not audit repository");
                    RepositoryComplianceRecord::failed(repo.name.clone(), e.to_string())
                }
            };

            if let Some(progress) = &self.progress {
                progress(&record.name, done, total);
            }
            results.add_record(record);
        }

        info!(
            "Audit complete in {}: {} compliant, {} non-compliant, {} failed",
            timer.elapsed_formatted(),
            results.compliant_count(),
            results.non_compliant_count(),
            results.failed_count(),
        );

        Ok(results)
    }
}

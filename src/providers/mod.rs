//! # Providers Module
//!
//! This module handles integrations with the source-control host.
//!
//! The audit engine only talks to the host through the [`HostingApi`] trait,
//! which covers the two collaborators an audit needs:
//!
//! - the repository lister ([`HostingApi::list_repositories`])
//! - the API client fetching branch protection and webhooks
//!
//! [`github::GitHubProvider`] implements it on top of `octocrab`.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use repoman::providers::{github::GitHubProvider, HostingApi};
//!
//! # async fn run() -> Result<(), repoman::error::ProviderError> {
//! let provider = GitHubProvider::new("ghp_example", None)?;
//! let repos = provider.list_repositories("acme").await?;
//! println!("acme has {} repositories", repos.len());
//! # Ok(())
//! # }
//! ```

pub mod github;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::rules::protection::BranchProtectionSettings;
use crate::rules::webhooks::Webhook;

/// A repository as reported by the organization listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub name: String,

    /// Default branch, when the host reports one
    pub default_branch: Option<String>,

    pub archived: bool,
}

impl RepositoryRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_branch: None,
            archived: false,
        }
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = Some(branch.into());
        self
    }

    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }
}

/// Read access to a hosting organization
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// List every repository of an organization
    async fn list_repositories(&self, organization: &str)
        -> Result<Vec<RepositoryRef>, ProviderError>;

    /// Fetch the protection settings of one branch
    async fn branch_protection(
        &self,
        organization: &str,
        repository: &str,
        branch: &str,
    ) -> Result<BranchProtectionSettings, ProviderError>;

    /// List the webhooks configured on a repository
    async fn list_webhooks(
        &self,
        organization: &str,
        repository: &str,
    ) -> Result<Vec<Webhook>, ProviderError>;
}

//! GitHub provider - Interactions with the GitHub REST API via octocrab
//!
//! Responses are decoded selectively: only the `protection` block of a branch
//! and the `events`/`config` of a hook are read, everything else GitHub
//! returns is ignored.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{HostingApi, RepositoryRef};
use crate::error::ProviderError;
use crate::rules::protection::BranchProtectionSettings;
use crate::rules::webhooks::Webhook;

const PER_PAGE: u8 = 100;

/// GitHub provider for organization audits
pub struct GitHubProvider {
    client: Octocrab,
}

impl GitHubProvider {
    /// Create a provider authenticated with a personal access token.
    ///
    /// `api_url` overrides the API base URL (GitHub Enterprise).
    pub fn new(token: &str, api_url: Option<&str>) -> Result<Self, ProviderError> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(url) = api_url {
            builder = builder.base_uri(url).map_err(|e| ProviderError::Client {
                message: format!("invalid API URL '{}': {}", url, e),
            })?;
        }

        let client = builder.build().map_err(|e| ProviderError::Client {
            message: e.to_string(),
        })?;

        Ok(Self { client })
    }

    async fn get<T>(&self, endpoint: &str) -> Result<T, ProviderError>
    where
        T: serde::de::DeserializeOwned,
    {
        tracing::debug!("GET {}", endpoint);
        self.client
            .get(endpoint, None::<&()>)
            .await
            .map_err(|e| map_octocrab_error(endpoint, e))
    }

    /// Fetch every page of a list endpoint, stopping at the first short page
    async fn get_all<T>(&self, endpoint: &str) -> Result<Vec<T>, ProviderError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            tracing::debug!("GET {} (page {})", endpoint, page);
            let batch: Vec<T> = self
                .client
                .get(
                    endpoint,
                    Some(&PageParams {
                        per_page: PER_PAGE,
                        page,
                    }),
                )
                .await
                .map_err(|e| map_octocrab_error(endpoint, e))?;

            let last = batch.len() < usize::from(PER_PAGE);
            items.extend(batch);
            if last {
                return Ok(items);
            }
            page += 1;
        }
    }
}

#[async_trait]
impl HostingApi for GitHubProvider {
    async fn list_repositories(
        &self,
        organization: &str,
    ) -> Result<Vec<RepositoryRef>, ProviderError> {
        let endpoint = format!("/orgs/{}/repos", organization);

        let first_page = self
            .client
            .orgs(organization)
            .list_repos()
            .per_page(PER_PAGE)
            .send()
            .await
            .map_err(|e| map_octocrab_error(&endpoint, e))?;

        let repos = self
            .client
            .all_pages(first_page)
            .await
            .map_err(|e| map_octocrab_error(&endpoint, e))?;

        tracing::info!(
            "Found {} repo(s) for the organization {}",
            repos.len(),
            organization
        );

        Ok(repos
            .into_iter()
            .map(|repo| RepositoryRef {
                name: repo.name,
                default_branch: repo.default_branch,
                archived: repo.archived.unwrap_or(false),
            })
            .collect())
    }

    async fn branch_protection(
        &self,
        organization: &str,
        repository: &str,
        branch: &str,
    ) -> Result<BranchProtectionSettings, ProviderError> {
        let endpoint = format!(
            "/repos/{}/{}/branches/{}",
            encode_segment(organization),
            encode_segment(repository),
            encode_branch(branch)
        );
        let response: BranchResponse = self.get(&endpoint).await?;
        Ok(response.into())
    }

    async fn list_webhooks(
        &self,
        organization: &str,
        repository: &str,
    ) -> Result<Vec<Webhook>, ProviderError> {
        let endpoint = format!(
            "/repos/{}/{}/hooks",
            encode_segment(organization),
            encode_segment(repository)
        );
        let hooks: Vec<HookResponse> = self.get_all(&endpoint).await?;
        Ok(hooks.into_iter().map(Webhook::from).collect())
    }
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

/// Percent-encode one path segment so `#`, `?` and `%` reach GitHub intact
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Branch names keep their `/` separators; GitHub resolves them unescaped
fn encode_branch(branch: &str) -> String {
    branch
        .split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// octocrab's `Display` appends a backtrace after this marker
const BACKTRACE_MARKER: &str = "\n\nFound at";

fn without_backtrace(message: &str) -> String {
    match message.find(BACKTRACE_MARKER) {
        Some(index) => message[..index].to_string(),
        None => message.to_string(),
    }
}

fn map_octocrab_error(endpoint: &str, err: octocrab::Error) -> ProviderError {
    match err {
        octocrab::Error::GitHub { source, .. } => ProviderError::Api {
            endpoint: endpoint.to_string(),
            message: source.message.clone(),
        },
        octocrab::Error::Serde { source, .. } => ProviderError::Decode {
            endpoint: endpoint.to_string(),
            message: source.to_string(),
        },
        octocrab::Error::Json { source, .. } => ProviderError::Decode {
            endpoint: endpoint.to_string(),
            message: source.to_string(),
        },
        other => ProviderError::Transport {
            endpoint: endpoint.to_string(),
            message: without_backtrace(&other.to_string()),
        },
    }
}

/// Subset of `GET /repos/{owner}/{repo}/branches/{branch}`
#[derive(Debug, Default, Deserialize)]
pub struct BranchResponse {
    #[serde(default)]
    pub protection: Option<ProtectionResponse>,
}

/// The `protection` block of a branch
#[derive(Debug, Default, Deserialize)]
pub struct ProtectionResponse {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub required_status_checks: Option<RequiredStatusChecksResponse>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RequiredStatusChecksResponse {
    #[serde(default)]
    pub enforcement_level: Option<String>,
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
}

impl From<BranchResponse> for BranchProtectionSettings {
    fn from(response: BranchResponse) -> Self {
        let protection = response.protection.unwrap_or_default();
        let checks = protection.required_status_checks.unwrap_or_default();

        Self {
            enabled: protection.enabled.unwrap_or(false),
            enforcement_level: checks.enforcement_level.unwrap_or_default(),
            required_status_check_contexts: checks.contexts.unwrap_or_default(),
        }
    }
}

/// Subset of one entry of `GET /repos/{owner}/{repo}/hooks`
#[derive(Debug, Default, Deserialize)]
pub struct HookResponse {
    #[serde(default)]
    pub events: Option<Vec<String>>,
    #[serde(default)]
    pub config: Option<HashMap<String, serde_json::Value>>,
}

impl From<HookResponse> for Webhook {
    fn from(response: HookResponse) -> Self {
        let config = response
            .config
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    serde_json::Value::Null => return None,
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                Some((key, value))
            })
            .collect();

        Self {
            events: response.events.unwrap_or_default().into_iter().collect(),
            config,
        }
    }
}

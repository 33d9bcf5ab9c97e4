//! Configuration module
//!
//! Settings come from three layers, later ones winning: the TOML file,
//! environment variables and CLI flags. [`AuditSettings::resolve`] merges
//! them once at startup and validates the result; nothing downstream reads
//! configuration from anywhere else.

pub mod loader;

pub use loader::Config;

use url::Url;

use crate::error::ConfigError;
use crate::rules::constants::CI_PROXY_SUBDOMAIN;

/// Branch audited when neither the configuration nor the host names one
pub const FALLBACK_BRANCH: &str = "master";

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub organization: Option<String>,
    pub domain: Option<String>,
    pub token: Option<String>,
    pub branch: Option<String>,
    pub api_url: Option<String>,
    pub concurrency: Option<usize>,
    pub limit: Option<usize>,
    pub include_archived: bool,
    pub timeout_secs: Option<u64>,
    pub fail_fast: bool,
}

/// Validated settings for one audit run
#[derive(Debug, Clone)]
pub struct AuditSettings {
    pub organization: String,
    pub domain: String,
    pub token: String,
    pub branch: Option<String>,
    pub api_url: Option<String>,
    pub concurrency: usize,
    pub limit: Option<usize>,
    pub include_archived: bool,
    pub timeout_secs: Option<u64>,
    pub fail_fast: bool,
}

impl AuditSettings {
    /// Merge the file configuration with overrides and validate the result
    pub fn resolve(config: Config, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let organization = required(
            overrides.organization.or(config.organization),
            "organization",
            "ORG argument, REPOMAN_ORG or config file",
        )?;
        let domain = required(
            overrides.domain.or(config.domain),
            "domain",
            "--domain, REPOMAN_DOMAIN or config file",
        )?;
        let token = required(overrides.token, "token", "--token or GITHUB_TOKEN")?;

        validate_domain(&domain)?;

        let api_url = overrides.api_url.or(config.api_url);
        if let Some(url) = &api_url {
            Url::parse(url).map_err(|e| ConfigError::Invalid {
                name: "api_url",
                reason: e.to_string(),
            })?;
        }

        let concurrency = overrides.concurrency.unwrap_or(config.concurrency);
        if concurrency == 0 {
            return Err(ConfigError::Invalid {
                name: "concurrency",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            organization,
            domain,
            token,
            branch: overrides.branch.or(config.branch),
            api_url,
            concurrency,
            limit: overrides.limit.or(config.limit),
            include_archived: overrides.include_archived || config.include_archived,
            timeout_secs: overrides.timeout_secs.or(config.timeout_secs),
            fail_fast: overrides.fail_fast || config.fail_fast,
        })
    }
}

fn required(
    value: Option<String>,
    name: &'static str,
    hint: &'static str,
) -> Result<String, ConfigError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing { name, hint }),
    }
}

/// The domain must be a bare host name that yields `ci-proxy.<domain>`
fn validate_domain(domain: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        name: "domain",
        reason: format!("'{}' {}", domain, reason),
    };

    if domain.contains("://") || domain.contains('/') {
        return Err(invalid("must be a host name without scheme or path"));
    }

    let expected = format!("{}.{}", CI_PROXY_SUBDOMAIN, domain.to_lowercase());
    let url = Url::parse(&format!("https://{}/", expected))
        .map_err(|e| invalid(&format!("is not a valid host ({})", e)))?;

    if url.host_str() != Some(expected.as_str()) {
        return Err(invalid("is not a valid host"));
    }

    Ok(())
}

//! CLI commands module

pub mod audit;
pub mod init;

use clap::Args;
use std::path::PathBuf;

use crate::config::ConfigOverrides;

/// Arguments for the audit command
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// GitHub organization to audit
    #[arg(value_name = "ORG", env = "REPOMAN_ORG")]
    pub organization: Option<String>,

    /// Domain of the CI proxy the webhooks must point at (ci-proxy.<DOMAIN>)
    #[arg(short, long, value_name = "DOMAIN", env = "REPOMAN_DOMAIN")]
    pub domain: Option<String>,

    /// GitHub API token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format (terminal, json)
    #[arg(short, long, default_value = "terminal")]
    pub format: AuditFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Audit this branch instead of each repository's default branch
    #[arg(short, long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// GitHub API base URL (GitHub Enterprise)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Number of repositories audited concurrently
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Audit at most N repositories
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Also audit archived repositories
    #[arg(long)]
    pub include_archived: bool,

    /// Abort on the first repository that cannot be fetched
    #[arg(long)]
    pub fail_fast: bool,

    /// Abort the audit after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl AuditArgs {
    /// Values that take precedence over the configuration file
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            organization: self.organization.clone(),
            domain: self.domain.clone(),
            token: self.token.clone(),
            branch: self.branch.clone(),
            api_url: self.api_url.clone(),
            concurrency: self.concurrency,
            limit: self.limit,
            include_archived: self.include_archived,
            timeout_secs: self.timeout,
            fail_fast: self.fail_fast,
        }
    }
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Organization to write into the configuration
    #[arg(value_name = "ORG")]
    pub organization: Option<String>,

    /// Domain to write into the configuration
    #[arg(short, long, value_name = "DOMAIN")]
    pub domain: Option<String>,

    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

/// Output format for audit command
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AuditFormat {
    Terminal,
    Json,
}

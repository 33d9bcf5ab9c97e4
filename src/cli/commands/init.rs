//! Init command - Write a starter configuration file

use colored::Colorize;
use std::path::{Path, PathBuf};

use super::InitArgs;
use crate::cli::exit_codes;
use crate::config::loader::CONFIG_FILENAME;
use crate::config::Config;
use crate::error::{ConfigError, OutputError, RepomanError};

const HEADER: &str = "\
# repoman configuration
#
# CLI flags and environment variables override these values.
# The API token is read from --token or GITHUB_TOKEN only.
";

pub async fn execute(args: InitArgs, config_path: Option<&Path>) -> Result<i32, RepomanError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    if path.exists() && !args.force {
        return Err(ConfigError::AlreadyExists {
            path: path.display().to_string(),
        }
        .into());
    }

    let config = Config {
        organization: args.organization,
        domain: args.domain,
        ..Default::default()
    };
    let content = format!("{}\n{}", HEADER, config.to_toml()?);

    std::fs::write(&path, content).map_err(|e| {
        RepomanError::Output(OutputError::FileWrite {
            path: path.display().to_string(),
            source: e,
        })
    })?;

    println!(
        "{} Configuration written to: {}",
        "Success:".green().bold(),
        path.display().to_string().cyan()
    );

    Ok(exit_codes::SUCCESS)
}

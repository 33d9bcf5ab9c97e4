//! Audit command - Classify every repository of an organization
//!
//! Resolves configuration, runs the audit engine against GitHub and renders
//! the records. The run can be bounded by `--timeout` and is cancelled on
//! Ctrl-C; in both cases in-flight requests are dropped.

use colored::Colorize;
use std::path::Path;
use std::time::Duration;

use super::{AuditArgs, AuditFormat};
use crate::cli::exit_codes;
use crate::cli::output::{JsonOutput, ReportRenderer, TerminalOutput};
use crate::config::{AuditSettings, Config};
use crate::error::{OutputError, RepomanError};
use crate::providers::github::GitHubProvider;
use crate::rules::engine::{AuditEngine, AuditOptions};
use crate::rules::results::AuditResults;

/// Execute the audit command
///
/// # Returns
///
/// An exit code: 0 when everything is compliant, 1 for non-compliant
/// repositories, 2 when some repositories could not be audited
///
/// # Errors
///
/// Returns an error if configuration is invalid, the organization cannot be
/// listed, the run times out, or the report cannot be written
pub async fn execute(
    args: AuditArgs,
    config_path: Option<&Path>,
    log_json: bool,
) -> Result<i32, RepomanError> {
    let config = Config::load(config_path)?;
    let settings = AuditSettings::resolve(config, args.overrides())?;

    let provider = GitHubProvider::new(&settings.token, settings.api_url.as_deref())?;
    let mut engine = AuditEngine::new(&provider, &settings.domain, AuditOptions::from(&settings));

    if shows_progress(args.format, log_json) {
        engine.set_progress_callback(Box::new(|name, done, total| {
            eprintln!("  {} {} ({}/{})", "→".dimmed(), name.cyan(), done, total);
        }));
    }

    if log_json {
        tracing::info!(organization = %settings.organization, "Auditing");
    } else {
        eprintln!(
            "{} {}...",
            "Auditing".dimmed(),
            settings.organization.as_str().cyan()
        );
    }
    let results = run_until_cancelled(&engine, &settings).await?;

    let renderer: Box<dyn ReportRenderer> = match args.format {
        AuditFormat::Terminal => {
            if args.output.is_some() {
                colored::control::set_override(false);
            }
            Box::new(TerminalOutput::new())
        }
        AuditFormat::Json => Box::new(JsonOutput::new()),
    };
    let rendered = renderer.render_report(&results)?;

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &rendered).map_err(|e| {
            RepomanError::Output(OutputError::FileWrite {
                path: output_path.display().to_string(),
                source: e,
            })
        })?;
        eprintln!("Report written to: {}", output_path.display());
    } else {
        println!("{rendered}");
    }

    Ok(exit_codes::for_results(&results))
}

/// Progress lines are plain text on stderr; they would interleave with JSON logs
fn shows_progress(format: AuditFormat, log_json: bool) -> bool {
    format == AuditFormat::Terminal && !log_json
}

async fn run_until_cancelled(
    engine: &AuditEngine<'_>,
    settings: &AuditSettings,
) -> Result<AuditResults, RepomanError> {
    let run = engine.run(&settings.organization);

    let bounded = async {
        match settings.timeout_secs {
            Some(seconds) => match tokio::time::timeout(Duration::from_secs(seconds), run).await {
                Ok(result) => result,
                Err(_) => Err(RepomanError::Timeout { seconds }),
            },
            None => run.await,
        }
    };

    tokio::select! {
        result = bounded => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, dropping in-flight requests");
            Err(RepomanError::Cancelled)
        }
    }
}

//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use std::io::Write;

use serde::Serialize;

use super::parser::{Cli, Commands, OutputFormat};
use super::report::UrlReport;
use crate::config::Settings;
use crate::error::{AppError, AppResult};
use crate::indexing::{Notifier, NotifyType, Provider};

/// Execute a CLI command with the given settings
///
/// Results are written to stdout; logs go to stderr.
///
/// # Returns
/// `Ok(true)` when every notification succeeded (or the configuration check
/// found at least one enabled backend), `Ok(false)` otherwise
///
/// # Errors
/// Returns errors from notifier construction or when no backend is enabled
/// for a publish/remove command
pub async fn execute_command(cli: &Cli, settings: &Settings) -> AppResult<bool> {
    let notifier = Notifier::from_settings(settings)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute_with(&notifier, &cli.command, cli.output, &mut out).await
}

/// Runs `command` against an already built notifier, writing results to `out`
pub async fn execute_with<W: Write>(
    notifier: &Notifier,
    command: &Commands,
    output: OutputFormat,
    out: &mut W,
) -> AppResult<bool> {
    match command {
        Commands::Publish { urls } => {
            notify_all(notifier, urls, NotifyType::Updated, output, out).await
        }
        Commands::Remove { urls } => {
            notify_all(notifier, urls, NotifyType::Deleted, output, out).await
        }
        Commands::Check => check(notifier, output, out),
    }
}

async fn notify_all<W: Write>(
    notifier: &Notifier,
    urls: &[String],
    notify_type: NotifyType,
    output: OutputFormat,
    out: &mut W,
) -> AppResult<bool> {
    if notifier.is_empty() {
        return Err(AppError::Validation {
            field: "backends".to_string(),
            reason: "no indexing backend is enabled; configure google.credentials_file or bing.api_key"
                .to_string(),
        });
    }

    let mut reports = Vec::with_capacity(urls.len());
    for url in urls {
        let outcomes = notifier.notify_url(url, notify_type).await;
        let report = UrlReport::new(url, notify_type, outcomes);
        if output == OutputFormat::Text {
            write_line(out, &report.to_text())?;
        }
        reports.push(report);
    }

    let all_ok = reports.iter().all(UrlReport::all_succeeded);
    tracing::info!(
        urls = reports.len(),
        %notify_type,
        success = all_ok,
        "Notifications finished"
    );

    if output == OutputFormat::Json {
        write_json(out, &reports)?;
    }

    Ok(all_ok)
}

#[derive(Serialize)]
struct CheckReport {
    providers: Vec<Provider>,
}

fn check<W: Write>(notifier: &Notifier, output: OutputFormat, out: &mut W) -> AppResult<bool> {
    let providers = notifier.enabled_providers();

    match output {
        OutputFormat::Text if providers.is_empty() => {
            write_line(out, "no backends enabled")?;
        }
        OutputFormat::Text => {
            for provider in &providers {
                write_line(out, &format!("{} enabled", provider))?;
            }
        }
        OutputFormat::Json => {
            write_json(
                out,
                &CheckReport {
                    providers: providers.clone(),
                },
            )?;
        }
    }

    Ok(!providers.is_empty())
}

fn write_line<W: Write>(out: &mut W, line: &str) -> AppResult<()> {
    writeln!(out, "{}", line).map_err(|e| AppError::from(anyhow::Error::new(e)))
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::from(anyhow::Error::new(e)))?;
    write_line(out, &json)
}

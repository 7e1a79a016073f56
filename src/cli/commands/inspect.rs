//! `inspect` command: standalone debug report for one record.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use console::style;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, DebugReport};
use crate::services::batch_processor::{parse_report, ReportFile};
use crate::services::report_inspector;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Report file holding a single test record
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Also write the debug report to this file
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct InspectOutput {
    #[serde(flatten)]
    pub report: DebugReport,
    #[serde(skip)]
    pub started_at: Option<DateTime<Utc>>,
}

impl CommandOutput for InspectOutput {
    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.report).unwrap_or_default()
    }

    fn to_human(&self) -> String {
        let report = &self.report;
        let info = &report.test_info;
        let mut lines = vec![
            format!("{} {}", style("Test:").bold(), info.name),
            format!("  Full name:   {}", info.full_name),
            format!("  Description: {}", info.description),
            format!("  Status:      {}", info.status),
            format!("  Duration:    {:.3}s", info.duration_seconds),
        ];
        if let Some(started_at) = self.started_at {
            lines.push(format!("  Started:     {}", started_at.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        lines.push(format!(
            "{} {} runs, {:.2}% pass rate{}",
            style("History:").bold(),
            report.history.total_runs,
            report.history.pass_rate,
            if report.history.consistently_failing {
                style(", consistently failing").red().to_string()
            } else {
                String::new()
            }
        ));

        if let Some(error) = &report.error_info {
            lines.push(format!("{} {}", style("Error:").bold().red(), error.message));
            lines.push(format!(
                "  Location: {}:{} in {}",
                error.location.file, error.location.line, error.location.method
            ));
            lines.push(format!("  Stage:    {} ({})", error.stage.name, error.stage.phase));
        }
        if let Some(analysis) = &report.analysis {
            lines.push(format!("{} {}", style("Possible cause:").bold(), analysis.possible_cause));
            lines.push(format!("{} {}", style("Possible fix:").bold(), analysis.possible_fix));
        }
        if let Some(summary) = &report.summary {
            lines.push(style(summary).green().to_string());
        }
        lines.join("\n")
    }
}

pub async fn execute(args: InspectArgs, config: &Config, json_mode: bool) -> Result<()> {
    let file = ReportFile::read(&args.file).await?;
    let mut parsed = parse_report(&file.name, &file.contents)?;
    if let Some(rejected) = parsed.rejected.first() {
        bail!("{rejected}");
    }
    if parsed.records.len() != 1 {
        bail!(
            "{}: expected a single test record, found {}",
            file.name,
            parsed.records.len()
        );
    }
    let record = parsed.records.remove(0);

    let requestor = super::build_requestor(config)?;
    let report = report_inspector::inspect(&record, &requestor).await;

    if let Some(path) = &args.output {
        let body = serde_json::to_string_pretty(&report)?;
        tokio::fs::write(path, body)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let started_at = record
        .time
        .as_ref()
        .and_then(|time| time.start)
        .and_then(DateTime::<Utc>::from_timestamp_millis);

    output(&InspectOutput { report, started_at }, json_mode);
    Ok(())
}

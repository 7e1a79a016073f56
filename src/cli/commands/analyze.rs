//! `analyze` command: batch mode.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Cell;
use console::style;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::{base_table, fail_percentage_cell, output, supports_color, truncate, CommandOutput};
use crate::domain::models::{BatchReport, ClassAggregate, Config};
use crate::services::{BatchMode, BatchProcessor};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Report files; each holds one test record or an array of records
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Write the merged aggregates as a job file (test name -> aggregate)
    #[arg(short, long, value_name = "PATH", requires = "merge")]
    pub output: Option<PathBuf>,

    /// Fold the records of all files into one aggregate per class instead
    /// of aggregating each file on its own
    #[arg(long)]
    pub merge: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    #[serde(flatten)]
    pub report: BatchReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

impl CommandOutput for AnalyzeOutput {
    fn to_human(&self) -> String {
        let report = &self.report;
        let mut lines = Vec::new();

        if report.aggregates.is_empty() {
            lines.push("No test classes found.".to_string());
        } else {
            let use_colors = supports_color();
            let mut table = base_table(&["Class", "Total", "Passed", "Failed", "Fail %", "Top cause"]);
            for aggregate in &report.aggregates {
                let top_cause = aggregate
                    .analysis
                    .causes
                    .first()
                    .map_or_else(|| "-".to_string(), |c| truncate(&c.cause, 48));
                table.add_row(vec![
                    Cell::new(truncate(&aggregate.class_name, 48)),
                    Cell::new(aggregate.total_tests),
                    Cell::new(aggregate.passed),
                    Cell::new(aggregate.failed),
                    fail_percentage_cell(aggregate.fail_percentage, use_colors),
                    Cell::new(top_cause),
                ]);
            }
            lines.push(table.to_string());
        }

        lines.push(String::new());
        lines.push(style(&report.success_message).bold().to_string());
        if !report.skipped_records.is_empty() {
            lines.push(format!(
                "{} record(s) skipped (missing testClass label or status)",
                report.skipped_records.len()
            ));
        }
        for failure in &report.failed_files {
            lines.push(format!("{} {failure}", style("✗").red()));
        }
        if let Some(path) = &self.output_path {
            lines.push(format!("Aggregates written to {path}"));
        }
        lines.join("\n")
    }
}

/// Job file layout: test class name -> aggregate.
pub fn job_file_json(aggregates: &[ClassAggregate]) -> Result<serde_json::Value> {
    let mut map = serde_json::Map::new();
    for aggregate in aggregates {
        map.insert(
            aggregate.class_name.clone(),
            serde_json::to_value(aggregate).context("Failed to serialize aggregate")?,
        );
    }
    Ok(serde_json::Value::Object(map))
}

pub async fn execute(args: AnalyzeArgs, config: &Config, json_mode: bool) -> Result<()> {
    let requestor = super::build_requestor(config)?;
    let mode = if args.merge {
        BatchMode::Merged
    } else {
        BatchMode::PerFile
    };

    let report = BatchProcessor::new(requestor, mode)
        .process_paths(&args.files)
        .await;

    let output_path = match &args.output {
        Some(path) => {
            let body = serde_json::to_string_pretty(&job_file_json(&report.aggregates)?)?;
            tokio::fs::write(path, body)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Some(path.display().to_string())
        }
        None => None,
    };

    output(&AnalyzeOutput { report, output_path }, json_mode);
    Ok(())
}

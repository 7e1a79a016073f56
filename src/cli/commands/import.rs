//! `import` command: validate job aggregate files.

use anyhow::Result;
use clap::Args;
use console::style;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::services::aggregate_importer;
use crate::services::batch_processor::ReportFile;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Job files mapping test names to aggregates
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

/// Upload-style summary of an import run.
#[derive(Debug, Serialize)]
pub struct ImportOutput {
    pub total_files: usize,
    pub processed_files: usize,
    pub failed_files: Vec<String>,
    pub success_message: String,
    pub classes: Vec<String>,
}

impl CommandOutput for ImportOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![style(&self.success_message).bold().to_string()];
        lines.push(format!("{} test class aggregate(s) valid", self.classes.len()));
        for failure in &self.failed_files {
            lines.push(format!("{} {failure}", style("✗").red()));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: ImportArgs, json_mode: bool) -> Result<()> {
    let mut files = Vec::with_capacity(args.files.len());
    let mut unreadable = Vec::new();
    for path in &args.files {
        match ReportFile::read(path).await {
            Ok(file) => files.push(file),
            Err(err) => unreadable.push(err.to_string()),
        }
    }

    let report = aggregate_importer::import_files(&files);
    let total_files = report.total_files + unreadable.len();
    unreadable.extend(report.failed_files);

    let result = ImportOutput {
        total_files,
        processed_files: report.processed_files,
        failed_files: unreadable,
        success_message: crate::domain::models::BatchReport::summary_message(
            report.processed_files,
            total_files,
        ),
        classes: report
            .aggregates
            .into_iter()
            .map(|aggregate| aggregate.class_name)
            .collect(),
    };

    output(&result, json_mode);
    Ok(())
}

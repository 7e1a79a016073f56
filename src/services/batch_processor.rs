//! Batch processing of report files.
//!
//! Each input file holds a single record or an array of records. Files that
//! cannot be read or parsed are reported in `failed_files` and the batch
//! carries on; aggregates already built are kept.

use std::path::Path;
use tracing::{info, instrument, warn};

use crate::domain::models::{BatchReport, ClassAggregate, RawTestRecord, SkippedRecord};
use crate::domain::{ReportError, ReportResult};
use crate::services::aggregator::ClassAggregator;
use crate::services::analysis_requestor::AnalysisRequestor;

/// How records from different files are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    /// A fresh aggregate map per file; no aggregate is shared across files.
    #[default]
    PerFile,
    /// One aggregate map for the whole batch, filled file by file.
    Merged,
}

/// Raw contents of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    /// Name stamped into failure details and diagnostics.
    pub name: String,
    pub contents: Vec<u8>,
}

impl ReportFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Read `path`; the file name (without directories) becomes the source
    /// name.
    pub async fn read(path: &Path) -> ReportResult<Self> {
        let contents = tokio::fs::read(path).await.map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self { name, contents })
    }
}

/// Records parsed from one file, plus entries that were not records.
#[derive(Debug, Default)]
pub struct ParsedReport {
    pub records: Vec<RawTestRecord>,
    pub rejected: Vec<ReportError>,
}

/// Parse a file holding one record object or an array of them.
///
/// An unparsable document is an error; within an array, entries that are
/// not valid records are collected in `rejected` and the rest are kept.
pub fn parse_report(source_name: &str, contents: &[u8]) -> ReportResult<ParsedReport> {
    let document: serde_json::Value =
        serde_json::from_slice(contents).map_err(|source| ReportError::InvalidJson {
            source_name: source_name.to_string(),
            source,
        })?;

    let entries = match document {
        serde_json::Value::Array(entries) => entries,
        object @ serde_json::Value::Object(_) => vec![object],
        _ => {
            return Err(ReportError::MalformedInput {
                source_name: source_name.to_string(),
                reason: "expected a test record object or an array of records".to_string(),
            })
        }
    };

    let mut parsed = ParsedReport::default();
    for (i, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<RawTestRecord>(entry) {
            Ok(record) => parsed.records.push(record),
            Err(e) => parsed.rejected.push(ReportError::InvalidEntry {
                source_name: source_name.to_string(),
                entry: format!("record {i}"),
                reason: e.to_string(),
            }),
        }
    }
    Ok(parsed)
}

/// Drives files through normalization, aggregation and analysis.
#[derive(Clone)]
pub struct BatchProcessor {
    requestor: AnalysisRequestor,
    mode: BatchMode,
}

impl BatchProcessor {
    pub const fn new(requestor: AnalysisRequestor, mode: BatchMode) -> Self {
        Self { requestor, mode }
    }

    /// Read every path, then process the batch. Unreadable files count as
    /// failed.
    pub async fn process_paths<P: AsRef<Path>>(&self, paths: &[P]) -> BatchReport {
        let mut files = Vec::with_capacity(paths.len());
        let mut unreadable = Vec::new();
        for path in paths {
            match ReportFile::read(path.as_ref()).await {
                Ok(file) => files.push(file),
                Err(err) => {
                    warn!(error = %err, "skipping unreadable file");
                    unreadable.push(err.to_string());
                }
            }
        }

        let mut report = self.process(files).await;
        report.total_files += unreadable.len();
        unreadable.append(&mut report.failed_files);
        report.failed_files = unreadable;
        report.success_message =
            BatchReport::summary_message(report.processed_files, report.total_files);
        report
    }

    /// Process files in order.
    #[instrument(skip_all, fields(files = files.len(), mode = ?self.mode))]
    pub async fn process(&self, files: Vec<ReportFile>) -> BatchReport {
        let total_files = files.len();
        let mut processed_files = 0;
        let mut failed_files = Vec::new();
        let mut skipped_records: Vec<SkippedRecord> = Vec::new();
        let mut aggregates: Vec<ClassAggregate> = Vec::new();
        let mut merged = ClassAggregator::new();

        for file in files {
            let parsed = match parse_report(&file.name, &file.contents) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(error = %err, "skipping malformed file");
                    failed_files.push(err.to_string());
                    continue;
                }
            };
            processed_files += 1;
            failed_files.extend(parsed.rejected.iter().map(ToString::to_string));

            let mut per_file = ClassAggregator::new();
            let aggregator = match self.mode {
                BatchMode::Merged => &mut merged,
                BatchMode::PerFile => &mut per_file,
            };
            for record in &parsed.records {
                if let Some(skipped) = aggregator.ingest(record, &file.name) {
                    skipped_records.push(skipped);
                }
            }

            if self.mode == BatchMode::PerFile {
                aggregates.extend(per_file.finalize(&self.requestor).await);
            }
        }

        if self.mode == BatchMode::Merged {
            aggregates = merged.finalize(&self.requestor).await;
        }

        info!(
            processed_files,
            total_files,
            classes = aggregates.len(),
            skipped = skipped_records.len(),
            "batch complete"
        );

        BatchReport {
            aggregates,
            total_files,
            processed_files,
            failed_files,
            skipped_records,
            success_message: BatchReport::summary_message(processed_files, total_files),
        }
    }
}

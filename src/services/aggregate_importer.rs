//! Import of previously produced job aggregate files.
//!
//! A job file maps test class name to its aggregate. Entries are validated
//! one at a time; a bad entry is reported and the rest of the file is still
//! imported.

use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::models::{Analysis, BatchReport, ClassAggregate, FailureDetail};
use crate::domain::{ReportError, ReportResult};
use crate::services::batch_processor::ReportFile;

/// Fields every aggregate entry must carry, in reporting order.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "total_tests",
    "passed",
    "failed",
    "fail_percentage",
    "failure_details",
    "analysis",
];

#[derive(Debug, Deserialize)]
struct AggregateEntry {
    total_tests: u64,
    passed: u64,
    failed: u64,
    fail_percentage: f64,
    failure_details: Vec<FailureDetail>,
    analysis: Analysis,
}

/// Aggregates read from one file and the entries that were rejected.
#[derive(Debug, Default)]
pub struct ImportedFile {
    pub aggregates: Vec<ClassAggregate>,
    pub rejected: Vec<ReportError>,
}

fn import_entry(
    source_name: &str,
    class_name: &str,
    entry: serde_json::Value,
) -> ReportResult<ClassAggregate> {
    let Some(fields) = entry.as_object() else {
        return Err(ReportError::InvalidEntry {
            source_name: source_name.to_string(),
            entry: class_name.to_string(),
            reason: "aggregate entry must be an object".to_string(),
        });
    };
    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !fields.contains_key(**f)) {
        return Err(ReportError::MissingField {
            source_name: source_name.to_string(),
            entry: class_name.to_string(),
            field: (*missing).to_string(),
        });
    }

    let entry: AggregateEntry =
        serde_json::from_value(entry).map_err(|e| ReportError::InvalidEntry {
            source_name: source_name.to_string(),
            entry: class_name.to_string(),
            reason: e.to_string(),
        })?;

    Ok(ClassAggregate {
        class_name: class_name.to_string(),
        total_tests: entry.total_tests,
        passed: entry.passed,
        failed: entry.failed,
        fail_percentage: entry.fail_percentage,
        failure_details: entry.failure_details,
        analysis: entry.analysis,
    })
}

/// Parse and validate one job file.
pub fn import_file(source_name: &str, contents: &[u8]) -> ReportResult<ImportedFile> {
    let document: serde_json::Value =
        serde_json::from_slice(contents).map_err(|source| ReportError::InvalidJson {
            source_name: source_name.to_string(),
            source,
        })?;
    let serde_json::Value::Object(entries) = document else {
        return Err(ReportError::MalformedInput {
            source_name: source_name.to_string(),
            reason: "expected an object mapping test names to aggregates".to_string(),
        });
    };

    let mut imported = ImportedFile::default();
    for (class_name, entry) in entries {
        match import_entry(source_name, &class_name, entry) {
            Ok(aggregate) => imported.aggregates.push(aggregate),
            Err(err) => {
                warn!(error = %err, "rejected aggregate entry");
                imported.rejected.push(err);
            }
        }
    }
    Ok(imported)
}

/// Import a set of job files. A file counts as processed once it parses,
/// even if some of its entries were rejected.
pub fn import_files(files: &[ReportFile]) -> BatchReport {
    let mut aggregates = Vec::new();
    let mut failed_files = Vec::new();
    let mut processed_files = 0;

    for file in files {
        match import_file(&file.name, &file.contents) {
            Ok(imported) => {
                processed_files += 1;
                aggregates.extend(imported.aggregates);
                failed_files.extend(imported.rejected.iter().map(ToString::to_string));
            }
            Err(err) => {
                warn!(error = %err, "skipping job file");
                failed_files.push(err.to_string());
            }
        }
    }

    info!(processed_files, total_files = files.len(), "import complete");

    BatchReport {
        aggregates,
        total_files: files.len(),
        processed_files,
        failed_files,
        skipped_records: Vec::new(),
        success_message: BatchReport::summary_message(processed_files, files.len()),
    }
}

//! Class aggregator.
//!
//! Groups normalized outcomes by test class. Classes keep the order in
//! which they were first seen so output is deterministic for a given input
//! order.

use std::collections::HashMap;
use tracing::{debug, info, instrument};

use crate::domain::models::{ClassAggregate, RawTestRecord, SkippedRecord};
use crate::services::analysis_requestor::AnalysisRequestor;
use crate::services::normalizer::{self, ClassifiedOutcome, Normalized};

#[derive(Debug, Default)]
pub struct ClassAggregator {
    aggregates: Vec<ClassAggregate>,
    index: HashMap<String, usize>,
}

impl ClassAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one classified outcome read from `source`.
    pub fn record(&mut self, classified: ClassifiedOutcome, source: &str) {
        let slot = match self.index.get(&classified.class_name) {
            Some(&slot) => slot,
            None => {
                let slot = self.aggregates.len();
                self.index.insert(classified.class_name.clone(), slot);
                self.aggregates
                    .push(ClassAggregate::new(classified.class_name.clone()));
                slot
            }
        };
        self.aggregates[slot].record(classified.outcome, source);
    }

    /// Normalize `record` and count it. Returns the skip when the record
    /// cannot be aggregated.
    pub fn ingest(&mut self, record: &RawTestRecord, source: &str) -> Option<SkippedRecord> {
        match normalizer::normalize(record) {
            Normalized::Outcome(classified) => {
                self.record(classified, source);
                None
            }
            Normalized::Skipped(reason) => {
                debug!(source, %reason, "record dropped from aggregation");
                Some(SkippedRecord {
                    source: source.to_string(),
                    reason,
                })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    pub fn get(&self, class_name: &str) -> Option<&ClassAggregate> {
        self.index.get(class_name).map(|&slot| &self.aggregates[slot])
    }

    /// Aggregates with fail percentages computed, in first-seen order.
    /// No analysis is requested.
    pub fn into_aggregates(self) -> Vec<ClassAggregate> {
        let mut aggregates = self.aggregates;
        for aggregate in &mut aggregates {
            aggregate.refresh_fail_percentage();
        }
        aggregates
    }

    /// Compute fail percentages, then request one analysis per class that
    /// has failure details, in first-seen order.
    #[instrument(skip_all, fields(classes = self.aggregates.len()))]
    pub async fn finalize(self, requestor: &AnalysisRequestor) -> Vec<ClassAggregate> {
        let mut aggregates = self.into_aggregates();
        for aggregate in aggregates.iter_mut().filter(|a| a.has_failures()) {
            info!(class = %aggregate.class_name, failures = aggregate.failure_details.len(), "analyzing failures");
            aggregate.analysis = requestor
                .analyze_class(&aggregate.class_name, &aggregate.failure_details)
                .await
                .analysis;
        }
        aggregates
    }
}

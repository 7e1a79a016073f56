//! Criterion benchmark: report parsing, aggregation and finalize with the
//! unconfigured generator. Run with: cargo bench --bench aggregation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

use jenkins_triage::domain::ports::UnconfiguredGenerator;
use jenkins_triage::services::batch_processor::parse_report;
use jenkins_triage::services::stack_trace;
use jenkins_triage::services::{AnalysisRequestor, ClassAggregator};

const STATUSES: [&str; 4] = ["passed", "failed", "broken", "skipped"];

fn record(i: usize) -> serde_json::Value {
    let class = format!("com.bench.Suite{}Test", i % 25);
    let status = STATUSES[i % STATUSES.len()];
    serde_json::json!({
        "name": format!("case{i}"),
        "fullName": format!("{class}.case{i}"),
        "status": status,
        "statusMessage": "expected <200> but was <503>",
        "statusTrace": format!(
            "java.lang.AssertionError\n\tat org.junit.Assert.fail(Assert.java:89)\n\tat {class}.case{i}(Suite.java:{})",
            i % 400 + 1
        ),
        "labels": [{"name": "testClass", "value": class}],
        "beforeStages": [{"name": "setUp", "status": "passed"}],
        "testStage": {"status": status},
        "extra": {"history": {
            "statistic": {"total": 20, "passed": 15},
            "items": [{"status": "failed"}, {"status": "passed"}, {"status": "failed"}]
        }}
    })
}

fn report_bytes(count: usize) -> Vec<u8> {
    let records: Vec<serde_json::Value> = (0..count).map(record).collect();
    serde_json::to_vec(&records).unwrap()
}

fn bench_parse_and_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");
    if std::env::var("QUICK").is_ok() {
        group.sample_size(10);
    }

    for count in [100, 1_000, 5_000] {
        let bytes = report_bytes(count);
        group.bench_with_input(BenchmarkId::new("parse_and_ingest", count), &bytes, |b, bytes| {
            b.iter(|| {
                let parsed = parse_report("bench.json", black_box(bytes)).unwrap();
                let mut aggregator = ClassAggregator::new();
                for record in &parsed.records {
                    aggregator.ingest(record, "bench.json");
                }
                black_box(aggregator.into_aggregates())
            });
        });
    }
    group.finish();
}

fn bench_finalize(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let parsed = parse_report("bench.json", &report_bytes(1_000)).unwrap();
    let requestor = AnalysisRequestor::new(Arc::new(UnconfiguredGenerator));

    c.bench_function("finalize_fallback_1000", |b| {
        b.iter(|| {
            let mut aggregator = ClassAggregator::new();
            for record in &parsed.records {
                aggregator.ingest(record, "bench.json");
            }
            black_box(runtime.block_on(aggregator.finalize(&requestor)))
        });
    });
}

fn bench_locate(c: &mut Criterion) {
    let frames: String = (0..200)
        .map(|i| format!("\tat com.bench.Deep{i}.call(Deep{i}.java:{i})\n"))
        .collect();
    let trace = format!("java.lang.IllegalStateException: boom\n{frames}");

    c.bench_function("locate_deep_trace", |b| {
        b.iter(|| black_box(stack_trace::locate(black_box(&trace))));
    });
}

criterion_group!(benches, bench_parse_and_ingest, bench_finalize, bench_locate);
criterion_main!(benches);

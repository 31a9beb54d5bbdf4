//! End-to-end tests: a host runner drives the reporter through a full run.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use jsoncov::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Coverage as the instrumentation would export it
const COVERAGE_JSON: &str = r#"{
    "lib/math.js": {
        "source": ["exports.add = function (a, b) {", "  return a + b;", "};", "// divide", "exports.div = 1;"],
        "1": 1, "2": 3, "3": null, "5": 0
    },
    "lib/Format.js": {
        "source": ["module.exports = String;"],
        "1": 1
    }
}"#;

fn run_events() -> Vec<RunEvent<Arc<TestCase>>> {
    let math = Suite::root().child("Math");
    let adds = Arc::new(TestCase::new(&math, "adds").with_duration(Duration::from_millis(2)));
    let divides = Arc::new(
        TestCase::new(&math, "divides")
            .with_duration(Duration::from_millis(5))
            .with_retry(1),
    );

    vec![
        RunEvent::Pass(Arc::clone(&adds)),
        RunEvent::TestEnd(adds),
        RunEvent::Fail(Arc::clone(&divides)),
        RunEvent::TestEnd(divides),
        RunEvent::End(
            RunEnd::new()
                .with_coverage(RawCoverageMap::from_json_str(COVERAGE_JSON).unwrap())
                .with_stats(json!({ "suites": 1, "tests": 2, "passes": 1, "failures": 1 })),
        ),
    ]
}

#[test]
fn test_full_run_document() {
    init_tracing();

    let mut reporter = JsonCovReporter::with_output(ReporterConfig::default(), Vec::new());
    dispatch(&mut reporter, run_events()).unwrap();

    let written: Value = serde_json::from_slice(&reporter.into_output()).unwrap();
    assert_eq!(
        written,
        json!({
            "instrumentation": "node-jscoverage",
            "sloc": 4,
            "hits": 3,
            "misses": 1,
            "coverage": 75.0,
            "files": [
                {
                    "filename": "lib/Format.js",
                    "coverage": 100.0,
                    "hits": 1,
                    "misses": 0,
                    "sloc": 1,
                    "source": {
                        "1": { "source": "module.exports = String;", "coverage": 1 }
                    }
                },
                {
                    "filename": "lib/math.js",
                    "coverage": 2.0 / 3.0 * 100.0,
                    "hits": 2,
                    "misses": 1,
                    "sloc": 3,
                    "source": {
                        "1": { "source": "exports.add = function (a, b) {", "coverage": 1 },
                        "2": { "source": "  return a + b;", "coverage": 3 },
                        "3": { "source": "};", "coverage": "" },
                        "4": { "source": "// divide", "coverage": "" },
                        "5": { "source": "exports.div = 1;", "coverage": 0 }
                    }
                }
            ],
            "stats": { "suites": 1, "tests": 2, "passes": 1, "failures": 1 },
            "tests": [
                { "duration": 2, "currentRetry": 0, "fullTitle": "Math adds", "title": "adds" },
                { "duration": 5, "currentRetry": 1, "fullTitle": "Math divides", "title": "divides" }
            ],
            "failures": [
                { "duration": 5, "currentRetry": 1, "fullTitle": "Math divides", "title": "divides" }
            ],
            "passes": [
                { "duration": 2, "currentRetry": 0, "fullTitle": "Math adds", "title": "adds" }
            ]
        })
    );
}

#[test]
fn test_top_level_key_order() {
    let mut reporter = JsonCovReporter::with_output(ReporterConfig::default(), Vec::new());
    dispatch(&mut reporter, run_events()).unwrap();
    let text = String::from_utf8(reporter.into_output()).unwrap();

    let keys = [
        "\n  \"instrumentation\"",
        "\n  \"sloc\"",
        "\n  \"hits\"",
        "\n  \"misses\"",
        "\n  \"coverage\"",
        "\n  \"files\"",
        "\n  \"stats\"",
        "\n  \"tests\"",
        "\n  \"failures\"",
        "\n  \"passes\"",
    ];
    let positions: Vec<usize> = keys.iter().map(|k| text.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
}

#[test]
fn test_silent_run_keeps_report() {
    let mut reporter = JsonCovReporter::with_output(ReporterConfig::silent(), Vec::new());
    dispatch(&mut reporter, run_events()).unwrap();

    let report = reporter.report().unwrap();
    assert_eq!(report.coverage.files.len(), 2);
    assert_eq!(report.coverage.file("lib/math.js").unwrap().uncovered_lines(), vec![5]);
    assert!(reporter.into_output().is_empty());
}

#[test]
fn test_events_over_channel() {
    init_tracing();

    let (tx, rx) = mpsc::channel();
    let producer = std::thread::spawn(move || {
        for event in run_events() {
            tx.send(event).unwrap();
        }
    });

    let mut reporter = JsonCovReporter::with_output(ReporterConfig::silent(), Vec::new());
    dispatch(&mut reporter, rx).unwrap();
    producer.join().unwrap();

    let report = reporter.into_report().unwrap();
    assert_eq!(report.tests.len(), 2);
    assert_eq!(report.passes[0].full_title, "Math adds");
    assert_eq!(report.failures[0].current_retry, 1);
}

#[test]
fn test_run_without_coverage() {
    let test = TestCase::new(&Suite::root(), "top level");
    let mut reporter = JsonCovReporter::with_output(ReporterConfig::default(), Vec::new());
    dispatch(
        &mut reporter,
        vec![
            RunEvent::TestEnd(test.clone()),
            RunEvent::Pass(test),
            RunEvent::End(RunEnd::new()),
        ],
    )
    .unwrap();

    let written: Value = serde_json::from_slice(&reporter.into_output()).unwrap();
    assert_eq!(written["files"], json!([]));
    assert_eq!(written["coverage"], json!(0.0));
    assert_eq!(written["stats"], json!({}));
    assert_eq!(written["tests"][0]["fullTitle"], " top level");
    assert!(written["tests"][0].get("duration").is_none());
}

#[test]
fn test_late_event_rejected_after_dispatch() {
    let mut reporter = JsonCovReporter::with_output(ReporterConfig::silent(), Vec::new());
    let mut events = run_events();
    let late = RunEvent::TestEnd(Arc::new(TestCase::new(&Suite::root(), "late")));
    events.push(late);

    let err = dispatch(&mut reporter, events).unwrap_err();
    assert!(matches!(err, ReportError::RunFinished { event: "test end" }));
    assert_eq!(reporter.report().unwrap().tests.len(), 2);
}

#[test]
fn test_malformed_coverage_reported() {
    let coverage = RawCoverageMap::new().with_file(
        "lib/short.js",
        RawFileCoverage::new(["a();"]).with_hits(9, 1),
    );
    let mut reporter = JsonCovReporter::<TestCase, _>::with_output(ReporterConfig::default(), Vec::new());
    let err = reporter
        .on_event(RunEvent::End(RunEnd::new().with_coverage(coverage)))
        .unwrap_err();
    assert!(err.to_string().contains("lib/short.js"));
}

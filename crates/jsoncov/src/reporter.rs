//! JSON Coverage Reporter
//!
//! Collects test outcomes during a run and, when the run ends, writes one
//! JSON document with line coverage and the test results.
//!
//! ```text
//! RunEvent::TestEnd/Pass/Fail ──► EventCollector
//!                                      │
//! RunEvent::End(coverage, stats) ──────┴──► Report ──► pretty JSON ──► sink
//! ```
//!
//! # Example
//!
//! ```
//! use jsoncov::{dispatch, JsonCovReporter, ReporterConfig, RunEnd, RunEvent, Suite, TestCase};
//!
//! let math = Suite::root().child("Math");
//! let adds = TestCase::new(&math, "adds");
//!
//! let mut reporter = JsonCovReporter::with_output(ReporterConfig::default(), Vec::new());
//! dispatch(
//!     &mut reporter,
//!     vec![
//!         RunEvent::Pass(adds.clone()),
//!         RunEvent::TestEnd(adds),
//!         RunEvent::End(RunEnd::new()),
//!     ],
//! )?;
//!
//! let report = reporter.report().expect("run finished");
//! assert_eq!(report.passes[0].full_title, "Math adds");
//! # Ok::<(), jsoncov::ReportError>(())
//! ```

use crate::config::ReporterConfig;
use crate::coverage::AggregateCoverageReport;
use crate::event::{EventCollector, RunEnd, RunEvent, RunListener};
use crate::record::TestRecord;
use crate::result::{ReportError, ReportResult};
use crate::runnable::Runnable;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Stdout, Write};
use tracing::{info, warn};

/// The finished report
///
/// Coverage fields sit at the top level next to `stats` and the test lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Line coverage totals and per-file details
    #[serde(flatten)]
    pub coverage: AggregateCoverageReport,
    /// Runner statistics, passed through untouched
    pub stats: Value,
    /// Every finished test
    pub tests: Vec<TestRecord>,
    /// Failed tests
    pub failures: Vec<TestRecord>,
    /// Passed tests
    pub passes: Vec<TestRecord>,
}

impl Report {
    /// Build the report from the collected tests and the run's end data
    pub fn from_run<T: Runnable>(
        instrumentation: &str,
        collector: &EventCollector<T>,
        end: RunEnd,
    ) -> ReportResult<Self> {
        let coverage = end.coverage.unwrap_or_default();
        Ok(Self {
            coverage: AggregateCoverageReport::build(instrumentation, &coverage)?,
            stats: end.stats,
            tests: normalize(collector.tests()),
            failures: normalize(collector.failures()),
            passes: normalize(collector.passes()),
        })
    }

    /// Render as JSON indented by two spaces
    pub fn to_json_pretty(&self) -> ReportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write as JSON indented by two spaces, without a trailing newline
    pub fn write_json<W: Write>(&self, mut writer: W) -> ReportResult<()> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(|err| {
            if err.is_io() {
                ReportError::Io(err.into())
            } else {
                ReportError::Json(err)
            }
        })?;
        writer.flush()?;
        Ok(())
    }
}

fn normalize<T: Runnable>(tests: &[T]) -> Vec<TestRecord> {
    tests.iter().map(TestRecord::from_runnable).collect()
}

/// Reporter that emits coverage and test results as JSON
///
/// Lives for exactly one run. Events after [`RunEvent::End`] are rejected.
#[derive(Debug)]
pub struct JsonCovReporter<T, W: Write = Stdout> {
    config: ReporterConfig,
    collector: EventCollector<T>,
    output: W,
    report: Option<Report>,
}

impl<T: Runnable> JsonCovReporter<T, Stdout> {
    /// Create a reporter writing to standard output
    #[must_use]
    pub fn new(config: ReporterConfig) -> Self {
        Self::with_output(config, io::stdout())
    }
}

impl<T: Runnable, W: Write> JsonCovReporter<T, W> {
    /// Create a reporter writing to the given sink
    #[must_use]
    pub fn with_output(config: ReporterConfig, output: W) -> Self {
        Self {
            config,
            collector: EventCollector::new(),
            output,
            report: None,
        }
    }

    /// Build the report, keep it, and write it if output is enabled
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidCoverageData`] if the coverage is
    /// malformed, in which case the run stays open. A write failure is
    /// returned after the report has been stored.
    pub fn finish(&mut self, end: RunEnd) -> ReportResult<&Report> {
        if self.report.is_some() {
            return Err(self.reject("end"));
        }

        let report = Report::from_run(&self.config.instrumentation, &self.collector, end)?;
        info!(
            tests = report.tests.len(),
            passes = report.passes.len(),
            failures = report.failures.len(),
            files = report.coverage.files.len(),
            coverage = report.coverage.coverage,
            "coverage report built"
        );

        // Kept before writing so a failed write still ends the run
        let report: &Report = self.report.insert(report);
        if self.config.emit_output {
            report.write_json(&mut self.output)?;
        }
        Ok(report)
    }

    /// Check if the run has ended
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.report.is_some()
    }

    /// The report, once the run has ended
    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// Take the report, once the run has ended
    #[must_use]
    pub fn into_report(self) -> Option<Report> {
        self.report
    }

    /// Tests collected so far
    #[must_use]
    pub fn collector(&self) -> &EventCollector<T> {
        &self.collector
    }

    /// Reporter configuration
    #[must_use]
    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Give back the output sink
    #[must_use]
    pub fn into_output(self) -> W {
        self.output
    }

    fn reject(&self, event: &'static str) -> ReportError {
        warn!(event, "event received after run finished");
        ReportError::RunFinished { event }
    }
}

impl<T: Runnable, W: Write> RunListener<T> for JsonCovReporter<T, W> {
    fn on_event(&mut self, event: RunEvent<T>) -> ReportResult<()> {
        if self.is_finished() {
            return Err(self.reject(event.name()));
        }

        match event {
            RunEvent::TestEnd(test) => self.collector.record_test_end(test),
            RunEvent::Pass(test) => self.collector.record_pass(test),
            RunEvent::Fail(test) => self.collector.record_fail(test),
            RunEvent::End(end) => {
                let _ = self.finish(end)?;
            }
        }
        Ok(())
    }
}

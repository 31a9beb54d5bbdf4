//! jsoncov: JSON Coverage Reporter for Test Runners
//!
//! Listens to a test run's lifecycle events and, when the run ends, emits a
//! single JSON document with per-file line coverage and the passed/failed
//! tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    JSONCOV Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Host       │    │ Event      │    │ Report     │            │
//! │   │ Runner     │───►│ Collector  │───►│ Builder    │───► JSON   │
//! │   │ (RunEvent) │    │            │    │ (coverage) │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host owns test execution and instrumentation. It hands tests in
//! through [`RunEvent`] and the raw coverage map through [`RunEnd`].

#![warn(missing_docs)]

pub mod coverage;
mod config;
mod event;
mod record;
mod reporter;
mod result;
mod runnable;

pub use config::{ReporterConfig, DEFAULT_INSTRUMENTATION};
pub use coverage::{
    build_aggregate_coverage, build_file_coverage, locale_compare, AggregateCoverageReport,
    FileCoverageReport, LineHits, RawCoverageMap, RawFileCoverage, SourceLine,
};
pub use event::{dispatch, EventCollector, RunEnd, RunEvent, RunListener};
pub use record::TestRecord;
pub use reporter::{JsonCovReporter, Report};
pub use result::{ReportError, ReportResult};
pub use runnable::{Runnable, Suite, TestCase};

/// Convenient imports for hosts wiring up the reporter
pub mod prelude {
    pub use super::{
        dispatch, JsonCovReporter, RawCoverageMap, RawFileCoverage, Report, ReportError,
        ReportResult, ReporterConfig, RunEnd, RunEvent, RunListener, Runnable, Suite, TestCase,
        TestRecord,
    };
}

//! Line Coverage Aggregation
//!
//! ```text
//! RawCoverageMap ──► build_file_coverage (per file) ──► sum + sort ──► AggregateCoverageReport
//! ```
//!
//! The raw map is supplied by whatever instrumented the code under test;
//! this module only reads it.

mod collate;
mod raw;
mod report;

pub use collate::locale_compare;
pub use raw::{RawCoverageMap, RawFileCoverage};
pub use report::{
    build_aggregate_coverage, build_file_coverage, AggregateCoverageReport, FileCoverageReport,
    LineHits, SourceLine,
};

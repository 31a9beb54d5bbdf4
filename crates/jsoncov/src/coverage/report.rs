//! Coverage Report Generation
//!
//! Turns raw per-line hit counts into per-file reports and a sorted
//! aggregate with totals and percentages.
//!
//! A line is classified by its hit count:
//! - `0`: miss (counts toward `misses` and `sloc`)
//! - `> 0`: hit (counts toward `hits` and `sloc`)
//! - absent: untracked (blank, comment, non-executable)
//!
//! Every source line appears in the per-line `source` map whatever its
//! classification.

use super::collate::locale_compare;
use super::raw::{RawCoverageMap, RawFileCoverage};
use crate::config::DEFAULT_INSTRUMENTATION;
use crate::result::{ReportError, ReportResult};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::debug;

/// Coverage value of a single source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineHits {
    /// Line is not executable; serialized as `""`
    Untracked,
    /// Line is executable and ran this many times
    Tracked(u64),
}

impl LineHits {
    /// Check if the line is executable
    #[must_use]
    pub const fn is_tracked(self) -> bool {
        matches!(self, Self::Tracked(_))
    }

    /// Check if the line is executable but never ran
    #[must_use]
    pub const fn is_miss(self) -> bool {
        matches!(self, Self::Tracked(0))
    }
}

impl From<Option<u64>> for LineHits {
    fn from(hits: Option<u64>) -> Self {
        hits.map_or(Self::Untracked, Self::Tracked)
    }
}

impl Serialize for LineHits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Untracked => serializer.serialize_str(""),
            Self::Tracked(count) => serializer.serialize_u64(*count),
        }
    }
}

/// One line of source with its coverage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLine {
    /// Original line text
    pub source: String,
    /// Hit count, or untracked
    pub coverage: LineHits,
}

/// Coverage report for a single file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileCoverageReport {
    /// Path of the source file
    pub filename: String,
    /// Percentage of tracked lines that ran, `0` when nothing is tracked
    pub coverage: f64,
    /// Tracked lines that ran at least once
    pub hits: u64,
    /// Tracked lines that never ran
    pub misses: u64,
    /// Tracked lines (`hits + misses`)
    pub sloc: u64,
    /// Every source line keyed by 1-based line number
    pub source: BTreeMap<u32, SourceLine>,
}

impl FileCoverageReport {
    /// Line numbers that are tracked but never ran
    #[must_use]
    pub fn uncovered_lines(&self) -> Vec<u32> {
        self.source
            .iter()
            .filter(|(_, line)| line.coverage.is_miss())
            .map(|(number, _)| *number)
            .collect()
    }
}

/// Coverage totals across every instrumented file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateCoverageReport {
    /// Tool that produced the raw coverage
    pub instrumentation: String,
    /// Total tracked lines
    pub sloc: u64,
    /// Total lines that ran
    pub hits: u64,
    /// Total lines that never ran
    pub misses: u64,
    /// Overall percentage, `0` when nothing is tracked
    pub coverage: f64,
    /// Per-file reports ordered by filename
    pub files: Vec<FileCoverageReport>,
}

impl AggregateCoverageReport {
    /// Build the aggregate tagged with the given instrumentation name
    pub fn build(instrumentation: impl Into<String>, map: &RawCoverageMap) -> ReportResult<Self> {
        let mut report = Self {
            instrumentation: instrumentation.into(),
            sloc: 0,
            hits: 0,
            misses: 0,
            coverage: 0.0,
            files: Vec::with_capacity(map.len()),
        };

        for (filename, raw) in map {
            let file = build_file_coverage(filename, raw)?;
            report.hits += file.hits;
            report.misses += file.misses;
            report.sloc += file.sloc;
            report.files.push(file);
        }

        report
            .files
            .sort_by(|a, b| locale_compare(&a.filename, &b.filename));
        report.coverage = percent(report.hits, report.sloc);

        debug!(
            files = report.files.len(),
            sloc = report.sloc,
            coverage = report.coverage,
            "built aggregate coverage"
        );
        Ok(report)
    }

    /// Report for a single file
    #[must_use]
    pub fn file(&self, filename: &str) -> Option<&FileCoverageReport> {
        self.files.iter().find(|f| f.filename == filename)
    }
}

/// Build the aggregate report for every file in the map
pub fn build_aggregate_coverage(map: &RawCoverageMap) -> ReportResult<AggregateCoverageReport> {
    AggregateCoverageReport::build(DEFAULT_INSTRUMENTATION, map)
}

/// Build the report for one file
///
/// # Errors
///
/// Returns [`ReportError::InvalidCoverageData`] if a hit count is keyed to
/// line `0` or to a line past the end of the source.
pub fn build_file_coverage(
    filename: &str,
    raw: &RawFileCoverage,
) -> ReportResult<FileCoverageReport> {
    let line_count = raw.source().len();
    if let Some((line, _)) = raw
        .tracked_lines()
        .find(|(line, _)| *line == 0 || *line as usize > line_count)
    {
        return Err(ReportError::invalid_coverage(
            filename,
            format!("hit count for line {line} but source has {line_count} lines"),
        ));
    }

    let mut hits = 0;
    let mut misses = 0;
    let mut source = BTreeMap::new();

    for (index, text) in raw.source().iter().enumerate() {
        let number = line_number(filename, index)?;
        let coverage = LineHits::from(raw.hits(number));
        match coverage {
            LineHits::Tracked(0) => misses += 1,
            LineHits::Tracked(_) => hits += 1,
            LineHits::Untracked => {}
        }
        let _ = source.insert(
            number,
            SourceLine {
                source: text.clone(),
                coverage,
            },
        );
    }

    let sloc = hits + misses;
    debug!(filename, hits, misses, sloc, "built file coverage");

    Ok(FileCoverageReport {
        filename: filename.to_string(),
        coverage: percent(hits, sloc),
        hits,
        misses,
        sloc,
        source,
    })
}

/// One-based line number for a source index
pub(super) fn line_number(filename: &str, index: usize) -> ReportResult<u32> {
    index
        .checked_add(1)
        .and_then(|number| u32::try_from(number).ok())
        .ok_or_else(|| {
            ReportError::invalid_coverage(
                filename,
                format!("source has more than {} lines", u32::MAX),
            )
        })
}

/// `hits / sloc * 100`, or `0` when there is nothing to cover
fn percent(hits: u64, sloc: u64) -> f64 {
    if sloc == 0 {
        return 0.0;
    }
    hits as f64 / sloc as f64 * 100.0
}

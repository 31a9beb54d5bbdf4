//! Raw line coverage as produced by the instrumentation
//!
//! The JSON shape follows jscoverage: one object per file holding the
//! `source` lines plus one entry per tracked line, keyed by its 1-based
//! line number.
//!
//! ```text
//! {
//!   "lib/math.js": { "source": ["x=1;", "y=2;", "// c"], "1": 2, "2": 0 }
//! }
//! ```
//!
//! A `null` hit count marks the line as untracked, same as a missing key.

use crate::result::ReportResult;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

/// Coverage for one source file before aggregation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFileCoverage {
    source: Vec<String>,
    hits: BTreeMap<u32, u64>,
}

impl RawFileCoverage {
    /// Create coverage for the given source lines with no tracked lines
    #[must_use]
    pub fn new<I, S>(source: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: source.into_iter().map(Into::into).collect(),
            hits: BTreeMap::new(),
        }
    }

    /// Mark a 1-based line as tracked with the given hit count
    #[must_use]
    pub fn with_hits(mut self, line: u32, count: u64) -> Self {
        self.set_hits(line, count);
        self
    }

    /// Mark a 1-based line as tracked with the given hit count
    pub fn set_hits(&mut self, line: u32, count: u64) {
        let _ = self.hits.insert(line, count);
    }

    /// Hit count for a 1-based line, `None` when the line is untracked
    #[must_use]
    pub fn hits(&self, line: u32) -> Option<u64> {
        self.hits.get(&line).copied()
    }

    /// Source lines, index 0 is line 1
    #[must_use]
    pub fn source(&self) -> &[String] {
        &self.source
    }

    /// Tracked lines in ascending line order
    pub fn tracked_lines(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.hits.iter().map(|(line, count)| (*line, *count))
    }
}

impl Serialize for RawFileCoverage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.hits.len() + 1))?;
        map.serialize_entry("source", &self.source)?;
        for (line, count) in &self.hits {
            map.serialize_entry(&line.to_string(), count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawFileCoverage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RawFileCoverageVisitor)
    }
}

struct RawFileCoverageVisitor;

impl<'de> Visitor<'de> for RawFileCoverageVisitor {
    type Value = RawFileCoverage;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map with `source` lines and per-line hit counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut source: Option<Vec<String>> = None;
        let mut hits = BTreeMap::new();

        while let Some(key) = access.next_key::<String>()? {
            if key == "source" {
                if source.is_some() {
                    return Err(de::Error::duplicate_field("source"));
                }
                source = Some(access.next_value()?);
                continue;
            }

            // "01" or "+1" never name a line, so they must not alias "1"
            let line = key
                .parse::<u32>()
                .ok()
                .filter(|line| line.to_string() == key)
                .ok_or_else(|| {
                    de::Error::custom(format!("expected a line number or `source`, found `{key}`"))
                })?;
            if let Some(count) = access.next_value::<Option<u64>>()? {
                let _ = hits.insert(line, count);
            }
        }

        let source = source.ok_or_else(|| de::Error::missing_field("source"))?;
        Ok(RawFileCoverage { source, hits })
    }
}

/// Raw coverage keyed by file path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawCoverageMap {
    files: BTreeMap<String, RawFileCoverage>,
}

impl RawCoverageMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse coverage JSON; `null` parses as an empty map
    pub fn from_json_str(json: &str) -> ReportResult<Self> {
        let parsed: Option<Self> = serde_json::from_str(json)?;
        Ok(parsed.unwrap_or_default())
    }

    /// Parse coverage JSON from a reader; `null` parses as an empty map
    pub fn from_reader<R: Read>(reader: R) -> ReportResult<Self> {
        let parsed: Option<Self> = serde_json::from_reader(reader)?;
        Ok(parsed.unwrap_or_default())
    }

    /// Add or replace coverage for a file
    pub fn insert(&mut self, filename: impl Into<String>, coverage: RawFileCoverage) {
        let _ = self.files.insert(filename.into(), coverage);
    }

    /// Add or replace coverage for a file
    #[must_use]
    pub fn with_file(mut self, filename: impl Into<String>, coverage: RawFileCoverage) -> Self {
        self.insert(filename, coverage);
        self
    }

    /// Coverage for a single file
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&RawFileCoverage> {
        self.files.get(filename)
    }

    /// Number of instrumented files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if no file was instrumented
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate files and their coverage
    pub fn iter(&self) -> btree_map::Iter<'_, String, RawFileCoverage> {
        self.files.iter()
    }
}

impl<'a> IntoIterator for &'a RawCoverageMap {
    type Item = (&'a String, &'a RawFileCoverage);
    type IntoIter = btree_map::Iter<'a, String, RawFileCoverage>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, RawFileCoverage)> for RawCoverageMap {
    fn from_iter<I: IntoIterator<Item = (K, RawFileCoverage)>>(iter: I) -> Self {
        Self {
            files: iter
                .into_iter()
                .map(|(filename, coverage)| (filename.into(), coverage))
                .collect(),
        }
    }
}

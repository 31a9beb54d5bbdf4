//! Serializable test records

use crate::runnable::Runnable;
use serde::{Deserialize, Serialize};

/// Flat, cycle-free copy of a test for the report
///
/// `duration` is in milliseconds and is left out of the JSON when the test
/// never ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    /// Time taken in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Retries spent before the recorded outcome
    pub current_retry: u32,
    /// Title prefixed by every ancestor suite title
    pub full_title: String,
    /// Test's own title
    pub title: String,
}

impl TestRecord {
    /// Copy the reportable fields out of a runner-owned test
    #[must_use]
    pub fn from_runnable<R: Runnable + ?Sized>(test: &R) -> Self {
        Self {
            duration: test
                .duration()
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            current_retry: test.current_retry(),
            full_title: test.full_title(),
            title: test.title().to_string(),
        }
    }
}

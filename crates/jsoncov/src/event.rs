//! Run lifecycle events and the collector that buffers them.
//!
//! The host runner delivers every event of one run, in order, to a single
//! [`RunListener`]. Delivery is synchronous; a channel can stand in for
//! direct calls via [`dispatch`], which drains any iterator of events
//! (including an `mpsc::Receiver`).

use crate::coverage::RawCoverageMap;
use crate::result::ReportResult;
use serde_json::{Map, Value};
use tracing::debug;

/// What the host hands over when the whole run is done
#[derive(Debug, Clone, PartialEq)]
pub struct RunEnd {
    /// Raw coverage collected during the run, `None` if nothing was instrumented
    pub coverage: Option<RawCoverageMap>,
    /// Summary statistics kept by the runner, copied into the report as-is
    pub stats: Value,
}

impl Default for RunEnd {
    fn default() -> Self {
        Self {
            coverage: None,
            stats: Value::Object(Map::new()),
        }
    }
}

impl RunEnd {
    /// Run end with no coverage and empty stats
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the raw coverage map
    #[must_use]
    pub fn with_coverage(mut self, coverage: RawCoverageMap) -> Self {
        self.coverage = Some(coverage);
        self
    }

    /// Attach the runner's statistics
    #[must_use]
    pub fn with_stats(mut self, stats: Value) -> Self {
        self.stats = stats;
        self
    }
}

/// Test lifecycle event
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent<T> {
    /// A test finished, whatever its outcome
    TestEnd(T),
    /// A test passed
    Pass(T),
    /// A test failed
    Fail(T),
    /// The run is complete; fires once, after every test event
    End(RunEnd),
}

impl<T> RunEvent<T> {
    /// Event name as the runner spells it
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TestEnd(_) => "test end",
            Self::Pass(_) => "pass",
            Self::Fail(_) => "fail",
            Self::End(_) => "end",
        }
    }
}

/// Receives the events of one run
pub trait RunListener<T> {
    /// Handle one event
    fn on_event(&mut self, event: RunEvent<T>) -> ReportResult<()>;
}

/// Feed events to a listener in order, stopping at the first error
pub fn dispatch<T, L, I>(listener: &mut L, events: I) -> ReportResult<()>
where
    L: RunListener<T> + ?Sized,
    I: IntoIterator<Item = RunEvent<T>>,
{
    for event in events {
        listener.on_event(event)?;
    }
    Ok(())
}

/// Buffers tests by outcome in arrival order
#[derive(Debug, Clone)]
pub struct EventCollector<T> {
    tests: Vec<T>,
    passes: Vec<T>,
    failures: Vec<T>,
}

impl<T> Default for EventCollector<T> {
    fn default() -> Self {
        Self {
            tests: Vec::new(),
            passes: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> EventCollector<T> {
    /// Create an empty collector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished test
    pub fn record_test_end(&mut self, test: T) {
        self.tests.push(test);
        debug!(count = self.tests.len(), "test end");
    }

    /// Record a passing test
    pub fn record_pass(&mut self, test: T) {
        self.passes.push(test);
        debug!(count = self.passes.len(), "pass");
    }

    /// Record a failing test
    pub fn record_fail(&mut self, test: T) {
        self.failures.push(test);
        debug!(count = self.failures.len(), "fail");
    }

    /// Every finished test
    #[must_use]
    pub fn tests(&self) -> &[T] {
        &self.tests
    }

    /// Tests that passed
    #[must_use]
    pub fn passes(&self) -> &[T] {
        &self.passes
    }

    /// Tests that failed
    #[must_use]
    pub fn failures(&self) -> &[T] {
        &self.failures
    }
}

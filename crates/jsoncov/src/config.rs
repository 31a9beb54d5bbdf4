//! Reporter configuration

use serde::{Deserialize, Serialize};

/// Instrumentation tag written at the top of every report
pub const DEFAULT_INSTRUMENTATION: &str = "node-jscoverage";

/// Reporter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Write the finished report to the output sink
    pub emit_output: bool,
    /// Identifier of the tool that produced the raw coverage
    pub instrumentation: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            emit_output: true,
            instrumentation: DEFAULT_INSTRUMENTATION.to_string(),
        }
    }
}

impl ReporterConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the report without writing it anywhere
    #[must_use]
    pub fn silent() -> Self {
        Self::default().with_emit_output(false)
    }

    /// Set whether the report is written on completion
    #[must_use]
    pub const fn with_emit_output(mut self, emit_output: bool) -> Self {
        self.emit_output = emit_output;
        self
    }

    /// Set the instrumentation tag
    #[must_use]
    pub fn with_instrumentation(mut self, instrumentation: impl Into<String>) -> Self {
        self.instrumentation = instrumentation.into();
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_emits_output() {
        let config = ReporterConfig::default();
        assert!(config.emit_output);
        assert_eq!(config.instrumentation, "node-jscoverage");
    }

    #[test]
    fn test_silent() {
        assert!(!ReporterConfig::silent().emit_output);
    }

    #[test]
    fn test_builder_chain() {
        let config = ReporterConfig::new()
            .with_emit_output(false)
            .with_instrumentation("istanbul");
        assert!(!config.emit_output);
        assert_eq!(config.instrumentation, "istanbul");
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ReporterConfig = serde_json::from_str(r#"{"emit_output": false}"#).unwrap();
        assert!(!config.emit_output);
        assert_eq!(config.instrumentation, DEFAULT_INSTRUMENTATION);
    }
}

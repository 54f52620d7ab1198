//! Runner configuration
//!
//! Settings come from three layers, lowest priority first: built-in
//! defaults, an optional TOML file (`--config`), then command-line flags.
//!
//! # Example
//!
//! ```toml
//! filter = "split"
//! verbose = true
//! fail_fast = false
//! format = "json"
//! suite_extension = "toml"
//! ```

use crate::error::RunnerError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Output format for run summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `name ... ok` lines plus a summary
    #[default]
    Text,
    /// One JSON document (requires the `report-json` feature)
    Json,
}

/// Configuration for a suite run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Only run cases whose name contains this substring
    pub filter: Option<String>,
    /// Show per-case timing
    pub verbose: bool,
    /// Stop at the first failing case
    pub fail_fast: bool,
    pub format: ReportFormat,
    /// File extension that marks a suite file during discovery
    pub suite_extension: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            filter: None,
            verbose: false,
            fail_fast: false,
            format: ReportFormat::Text,
            suite_extension: "toml".to_string(),
        }
    }
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, RunnerError> {
        toml::from_str(toml_str).map_err(|e| RunnerError::parse("", e))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, RunnerError> {
        let content = fs::read_to_string(path).map_err(|source| RunnerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|e| e.at(path))
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_suite_extension(mut self, extension: impl Into<String>) -> Self {
        self.suite_extension = extension.into();
        self
    }

    /// Whether a case name passes the filter
    pub fn matches_filter(&self, name: &str) -> bool {
        match &self.filter {
            Some(pattern) => name.contains(pattern.as_str()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::default();
        assert_eq!(config.filter, None);
        assert!(!config.verbose);
        assert!(!config.fail_fast);
        assert_eq!(config.format, ReportFormat::Text);
        assert_eq!(config.suite_extension, "toml");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RunnerConfig::from_toml("verbose = true\nformat = \"json\"\n").unwrap();
        assert!(config.verbose);
        assert_eq!(config.format, ReportFormat::Json);
        assert_eq!(config.suite_extension, "toml");
        assert!(!config.fail_fast);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = RunnerConfig::from_toml("colour = true\n").unwrap_err();
        assert!(matches!(err, RunnerError::Parse { .. }));
    }

    #[test]
    fn test_builder_overrides() {
        let config = RunnerConfig::new()
            .with_filter("split")
            .with_verbose(true)
            .with_fail_fast(true)
            .with_format(ReportFormat::Json)
            .with_suite_extension("suite");
        assert_eq!(config.filter.as_deref(), Some("split"));
        assert!(config.verbose && config.fail_fast);
        assert_eq!(config.format, ReportFormat::Json);
        assert_eq!(config.suite_extension, "suite");
    }

    #[test]
    fn test_matches_filter() {
        let config = RunnerConfig::new().with_filter("strip");
        assert!(config.matches_filter("strip-stars"));
        assert!(config.matches_filter("lstrip"));
        assert!(!config.matches_filter("split-comma"));
        assert!(RunnerConfig::new().matches_filter("anything"));
    }
}

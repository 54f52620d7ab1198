//! Test runner for suite files
//!
//! Discovers suite files, runs every case against the runtime and collects
//! the results. Printing is left to `report`.

use crate::config::RunnerConfig;
use crate::suite::Suite;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of running a single case
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    /// Case name
    pub name: String,
    /// Whether the case passed
    pub passed: bool,
    /// Duration in microseconds
    pub duration_us: u64,
    /// Failure detail if the case failed
    pub error_output: Option<String>,
}

/// Summary of all test results
#[derive(Debug, Default)]
pub struct TestSummary {
    /// Total cases run
    pub total: usize,
    /// Cases passed
    pub passed: usize,
    /// Cases failed
    pub failed: usize,
    /// Results by file
    pub file_results: Vec<FileTestResults>,
}

impl TestSummary {
    /// Suite files that could not be loaded
    pub fn load_errors(&self) -> usize {
        self.file_results
            .iter()
            .filter(|fr| fr.load_error.is_some())
            .count()
    }

    /// True when every case passed and every suite loaded
    pub fn success(&self) -> bool {
        self.failed == 0 && self.load_errors() == 0
    }
}

/// Results for a single suite file
#[derive(Debug)]
pub struct FileTestResults {
    /// Path to the suite file
    pub path: PathBuf,
    /// Individual case results
    pub tests: Vec<TestResult>,
    /// Load error if the file could not be read or parsed
    pub load_error: Option<String>,
}

/// Suite runner
pub struct TestRunner {
    pub config: RunnerConfig,
}

impl TestRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Discover suite files in the given paths
    pub fn discover_suite_files(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut suite_files = Vec::new();

        for path in paths {
            if path.is_file() {
                if self.is_suite_file(path) {
                    suite_files.push(path.clone());
                }
            } else if path.is_dir() {
                self.discover_in_directory(path, &mut suite_files);
            } else {
                warn!(path = %path.display(), "path does not exist");
            }
        }

        suite_files.sort();
        suite_files
    }

    fn is_suite_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.config.suite_extension)
    }

    fn discover_in_directory(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() && self.is_suite_file(&path) {
                    files.push(path);
                } else if path.is_dir() {
                    self.discover_in_directory(&path, files);
                }
            }
        }
    }

    /// Run all matching cases in a file
    ///
    /// With `fail_fast`, cases after the first failure are not run.
    pub fn run_file(&self, path: &Path) -> FileTestResults {
        let suite = match Suite::load(path) {
            Ok(suite) => suite,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load suite");
                return FileTestResults {
                    path: path.to_path_buf(),
                    tests: vec![],
                    load_error: Some(e.to_string()),
                };
            }
        };

        let mut tests = Vec::new();
        for case in suite
            .cases
            .iter()
            .filter(|case| self.config.matches_filter(&case.name))
        {
            let start = Instant::now();
            let outcome = case.check();
            let duration_us = start.elapsed().as_micros() as u64;
            debug!(case = %case.name, passed = outcome.is_ok(), "case finished");

            let failed = outcome.is_err();
            tests.push(TestResult {
                name: case.name.clone(),
                passed: !failed,
                duration_us,
                error_output: outcome.err(),
            });
            if failed && self.config.fail_fast {
                break;
            }
        }

        FileTestResults {
            path: path.to_path_buf(),
            tests,
            load_error: None,
        }
    }

    /// Run suites and return summary
    pub fn run(&self, paths: &[PathBuf]) -> TestSummary {
        let suite_files = self.discover_suite_files(paths);
        info!(files = suite_files.len(), "running suites");
        let mut summary = TestSummary::default();

        for path in suite_files {
            let file_results = self.run_file(&path);

            for test in &file_results.tests {
                summary.total += 1;
                if test.passed {
                    summary.passed += 1;
                } else {
                    summary.failed += 1;
                }
            }

            summary.file_results.push(file_results);
            if self.config.fail_fast && !summary.success() {
                break;
            }
        }

        summary
    }
}

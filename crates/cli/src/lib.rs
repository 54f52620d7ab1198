//! Tessera conformance runner
//!
//! Runs declarative TOML suites of scenarios against the runtime and
//! reports which cases pass.
//!
//! ```rust,ignore
//! use tessera_cli::{RunnerConfig, TestRunner};
//!
//! let runner = TestRunner::new(RunnerConfig::new().with_filter("split"));
//! let summary = runner.run(&[PathBuf::from("suites")]);
//! assert!(summary.success());
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod scenario;
pub mod suite;
pub mod test_runner;

pub use config::{ReportFormat, RunnerConfig};
pub use error::RunnerError;
pub use scenario::{EvalError, evaluate};
pub use suite::{Case, Expectation, Operation, Suite};
pub use test_runner::{FileTestResults, TestResult, TestRunner, TestSummary};

//! Run reports
//!
//! The text report prints one `name ... ok` / `name ... FAILED` line per
//! case, a summary line, and a FAILURES section. Load errors and failure
//! details go to the error stream. The JSON report (feature `report-json`)
//! is a single document for CI.

use crate::test_runner::TestSummary;
use std::io::{self, Write};

/// Write the text report
pub fn write_text(
    out: &mut impl Write,
    err: &mut impl Write,
    summary: &TestSummary,
    verbose: bool,
) -> io::Result<()> {
    for file_result in &summary.file_results {
        if let Some(ref error) = file_result.load_error {
            writeln!(err, "\nFailed to load {}:", file_result.path.display())?;
            writeln!(err, "  {}", error)?;
            continue;
        }

        if file_result.tests.is_empty() {
            continue;
        }

        writeln!(out, "\nRunning cases in {}...", file_result.path.display())?;

        for test in &file_result.tests {
            let status = if test.passed { "ok" } else { "FAILED" };
            if verbose {
                writeln!(out, "  {} ... {} ({}us)", test.name, status, test.duration_us)?;
            } else {
                writeln!(out, "  {} ... {}", test.name, status)?;
            }
        }
    }

    writeln!(out, "\n========================================")?;
    writeln!(
        out,
        "Results: {} passed, {} failed",
        summary.passed, summary.failed
    )?;

    let failures: Vec<_> = summary
        .file_results
        .iter()
        .flat_map(|fr| fr.tests.iter().filter(|t| !t.passed).map(|t| (&fr.path, t)))
        .collect();

    if !failures.is_empty() {
        writeln!(err, "\nFAILURES:\n")?;
        for (path, test) in failures {
            writeln!(err, "{}::{}", path.display(), test.name)?;
            if let Some(ref detail) = test.error_output {
                for line in detail.lines() {
                    writeln!(err, "  {}", line)?;
                }
            }
            writeln!(err)?;
        }
    }

    Ok(())
}

/// Print the text report to stdout/stderr
pub fn print_text(summary: &TestSummary, verbose: bool) -> io::Result<()> {
    write_text(&mut io::stdout().lock(), &mut io::stderr().lock(), summary, verbose)
}

/// Build the JSON report
#[cfg(feature = "report-json")]
pub fn to_json(summary: &TestSummary) -> serde_json::Value {
    use serde_json::json;

    let files: Vec<serde_json::Value> = summary
        .file_results
        .iter()
        .map(|fr| {
            let cases: Vec<serde_json::Value> = fr
                .tests
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "passed": t.passed,
                        "duration_us": t.duration_us,
                        "error": t.error_output,
                    })
                })
                .collect();
            json!({
                "path": fr.path.display().to_string(),
                "load_error": fr.load_error,
                "cases": cases,
            })
        })
        .collect();

    json!({
        "total": summary.total,
        "passed": summary.passed,
        "failed": summary.failed,
        "load_errors": summary.load_errors(),
        "files": files,
    })
}

/// Print the JSON report to stdout
#[cfg(feature = "report-json")]
pub fn print_json(summary: &TestSummary) -> io::Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &to_json(summary))?;
    writeln!(out)
}

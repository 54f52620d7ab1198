//! Runner error types

use std::fmt;
use std::path::PathBuf;

/// Failure to load a suite or configuration file
///
/// These are reported per file; a suite that fails to load contributes no
/// results, and the run as a whole is marked as failed.
#[derive(Debug)]
pub enum RunnerError {
    /// Reading the file failed
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file is not valid TOML or does not match the schema
    Parse { path: PathBuf, message: String },
    /// A case is structurally unusable (e.g. both `expect` and `error`)
    InvalidCase { case: String, message: String },
}

impl RunnerError {
    pub(crate) fn parse(path: impl Into<PathBuf>, err: toml::de::Error) -> Self {
        RunnerError::Parse {
            path: path.into(),
            message: err.message().to_string(),
        }
    }

    /// Attach a file path to an error raised before the path was known
    pub(crate) fn at(self, file: &std::path::Path) -> Self {
        match self {
            RunnerError::Parse { path, message } if path.as_os_str().is_empty() => {
                RunnerError::Parse {
                    path: file.to_path_buf(),
                    message,
                }
            }
            other => other,
        }
    }
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            RunnerError::Parse { path, message } if path.as_os_str().is_empty() => {
                write!(f, "parse error: {}", message)
            }
            RunnerError::Parse { path, message } => {
                write!(f, "parse error in {}: {}", path.display(), message)
            }
            RunnerError::InvalidCase { case, message } => {
                write!(f, "invalid case '{}': {}", case, message)
            }
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunnerError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

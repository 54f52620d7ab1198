//! Suite files
//!
//! A suite is a TOML document made of `[[case]]` tables. Each case names an
//! operation (`run`, an inline table tagged by `op`) and exactly one
//! expectation: a value (`expect`) or an error category (`error`).
//!
//! ```toml
//! [[case]]
//! name = "slice-middle"
//! run = { op = "slice", text = "football", start = 1, stop = 4 }
//! expect = "oot"
//!
//! [[case]]
//! name = "call-too-few"
//! run = { op = "call", params = { fixed = ["a", "b"] }, args = [{ positional = 1 }] }
//! error = "name"
//! ```
//!
//! Binding scenarios describe their arguments as a list of single-key
//! tables: `{ positional = v }`, `{ spread = [..] }`, `{ spread-lazy = [..] }`
//! or `{ keyword = { name = "c", value = v } }`.

use crate::error::RunnerError;
use crate::scenario::{EvalError, evaluate};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tessera_runtime::ErrorKind;

/// A parsed suite file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Suite {
    #[serde(default, rename = "case")]
    pub cases: Vec<Case>,
}

/// One named scenario
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Case {
    pub name: String,
    pub run: Operation,
    #[serde(default)]
    pub expect: Option<toml::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// What a case must produce
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    Value(toml::Value),
    Error(ErrorKind),
}

/// Operations a case can run
///
/// Text arguments are plain TOML strings. `lazy = true` feeds the items
/// through a generator instead of a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Operation {
    Len {
        text: String,
    },
    Index {
        text: String,
        index: i64,
    },
    Slice {
        text: String,
        start: Option<i64>,
        stop: Option<i64>,
        step: Option<i64>,
    },
    Concat {
        left: String,
        right: String,
    },
    Repeat {
        text: String,
        times: i64,
    },
    /// -1, 0 or 1
    Compare {
        left: String,
        right: String,
    },
    /// `str(value)`
    Str {
        value: toml::Value,
    },
    Split {
        text: String,
        sep: String,
    },
    SplitWhitespace {
        text: String,
    },
    Strip {
        text: String,
        chars: Option<String>,
    },
    Lstrip {
        text: String,
        chars: Option<String>,
    },
    Rstrip {
        text: String,
        chars: Option<String>,
    },
    Join {
        sep: String,
        items: Vec<toml::Value>,
        #[serde(default)]
        lazy: bool,
    },
    Replace {
        text: String,
        old: String,
        new: String,
    },
    Startswith {
        text: String,
        prefix: String,
    },
    Endswith {
        text: String,
        suffix: String,
    },
    Contains {
        text: String,
        sub: String,
    },
    Find {
        text: String,
        sub: String,
    },
    Count {
        text: String,
        sub: String,
    },
    /// Bind only; the result is a table of parameter values
    Bind {
        params: Params,
        #[serde(default)]
        args: Vec<ArgSpec>,
    },
    /// Bind and run a body that sums every bound integer
    ///
    /// With `forward = true` the call goes through `g(*args)`, which
    /// spreads its own variadic tuple into the function.
    Call {
        params: Params,
        #[serde(default)]
        args: Vec<ArgSpec>,
        #[serde(default)]
        forward: bool,
    },
    /// `targets = values`; the result is a table of bindings
    Unpack {
        targets: String,
        values: Vec<toml::Value>,
        #[serde(default)]
        lazy: bool,
    },
    /// `targets = rhs[0], rhs[1], ...` evaluated in a scope seeded by `locals`
    Assign {
        targets: String,
        #[serde(default)]
        locals: toml::Table,
        rhs: Vec<String>,
    },
}

/// Parameter declaration of a scenario function
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Params {
    #[serde(default = "default_function_name")]
    pub name: String,
    #[serde(default)]
    pub fixed: Vec<String>,
    #[serde(default)]
    pub variadic: Option<String>,
    #[serde(default)]
    pub defaults: Vec<DefaultParam>,
}

fn default_function_name() -> String {
    "f".to_string()
}

/// Keyword-defaulted parameter
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultParam {
    pub name: String,
    pub value: toml::Value,
}

/// One call argument
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArgSpec {
    Positional(toml::Value),
    Spread(toml::Value),
    /// Spread of a generator yielding these values
    SpreadLazy(Vec<toml::Value>),
    Keyword { name: String, value: toml::Value },
}

impl Case {
    /// Resolve `expect`/`error` into an expectation
    pub fn expectation(&self) -> Result<Expectation, RunnerError> {
        let invalid = |message: String| RunnerError::InvalidCase {
            case: self.name.clone(),
            message,
        };
        match (&self.expect, &self.error) {
            (Some(value), None) => Ok(Expectation::Value(value.clone())),
            (None, Some(label)) => ErrorKind::from_label(label)
                .map(Expectation::Error)
                .ok_or_else(|| invalid(format!("unknown error category '{}'", label))),
            (Some(_), Some(_)) => Err(invalid("has both `expect` and `error`".to_string())),
            (None, None) => Err(invalid("needs `expect` or `error`".to_string())),
        }
    }

    /// Run the case; `Err` carries the failure detail
    pub fn check(&self) -> Result<(), String> {
        let expectation = self.expectation().map_err(|e| e.to_string())?;
        match (evaluate(&self.run), expectation) {
            (Ok(actual), Expectation::Value(expected)) if actual == expected => Ok(()),
            (Ok(actual), Expectation::Value(expected)) => {
                Err(format!("expected {}, got {}", expected, actual))
            }
            (Ok(actual), Expectation::Error(kind)) => {
                Err(format!("expected {} error, got {}", kind, actual))
            }
            (Err(EvalError::Runtime(err)), Expectation::Error(kind)) if err.kind() == kind => {
                Ok(())
            }
            (Err(EvalError::Runtime(err)), Expectation::Error(kind)) => Err(format!(
                "expected {} error, got {} error: {}",
                kind,
                err.kind(),
                err
            )),
            (Err(err), _) => Err(err.to_string()),
        }
    }
}

impl Suite {
    /// Parse and validate a suite
    ///
    /// Every case must carry exactly one expectation and case names must be
    /// unique within the file.
    pub fn from_toml(toml_str: &str) -> Result<Self, RunnerError> {
        let suite: Suite = toml::from_str(toml_str).map_err(|e| RunnerError::parse("", e))?;
        let mut seen = HashSet::new();
        for case in &suite.cases {
            case.expectation()?;
            if !seen.insert(case.name.as_str()) {
                return Err(RunnerError::InvalidCase {
                    case: case.name.clone(),
                    message: "duplicate case name".to_string(),
                });
            }
        }
        Ok(suite)
    }

    pub fn load(path: &Path) -> Result<Self, RunnerError> {
        let content = fs::read_to_string(path).map_err(|source| RunnerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|e| e.at(path))
    }
}

//! Runtime Error Handling
//!
//! Every fallible operation in the runtime returns `Result<T, RuntimeError>`.
//! Errors are local and deterministic: an operation that fails never leaves a
//! partially built result behind, and nothing in the runtime recovers from an
//! error internally. Callers decide what to do with it.
//!
//! Errors are grouped into the categories a script would observe:
//!
//! | Kind    | Raised by                                             |
//! |---------|-------------------------------------------------------|
//! | `Index` | direct indexing outside `[-len, len-1]`               |
//! | `Arity` | unpack count mismatch, too many positional arguments  |
//! | `Name`  | unexpected/missing/duplicated arguments, unknown names, |
//! |         | malformed assignment targets                          |
//! | `Type`  | spreading a non-iterable, joining non-text, empty sep  |
//! | `Value` | zero slice step, oversized repeat, re-entered generator |

use std::fmt;
use std::sync::Arc;

/// Error category, as observed by a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Index,
    Arity,
    Name,
    Type,
    Value,
}

impl ErrorKind {
    /// Lowercase label used in reports and suite files
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Index => "index",
            ErrorKind::Arity => "arity",
            ErrorKind::Name => "name",
            ErrorKind::Type => "type",
            ErrorKind::Value => "value",
        }
    }

    /// Parse a label produced by [`ErrorKind::as_str`]
    pub fn from_label(label: &str) -> Option<ErrorKind> {
        match label {
            "index" => Some(ErrorKind::Index),
            "arity" => Some(ErrorKind::Arity),
            "name" => Some(ErrorKind::Name),
            "type" => Some(ErrorKind::Type),
            "value" => Some(ErrorKind::Value),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised by a runtime operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Direct index outside the sequence (index as written, before normalization)
    IndexOutOfRange { index: i64, len: usize },

    /// Destructuring source has the wrong number of values
    UnpackMismatch {
        /// Values the pattern needs (a minimum when `starred` is set)
        expected: usize,
        got: usize,
        starred: bool,
    },
    /// More positional values than fixed parameters and no variadic capture
    TooManyPositional {
        function: Arc<str>,
        expected: usize,
        given: usize,
    },
    /// Pattern declares more than one starred target
    MultipleStarred,

    /// Keyword names no fixed or keyword-defaulted parameter
    UnexpectedKeyword { function: Arc<str>, name: Arc<str> },
    /// Fixed parameter left unfilled after positionals and keywords
    MissingArgument { function: Arc<str>, name: Arc<str> },
    /// Parameter supplied twice (positional + keyword, or repeated keyword)
    MultipleValues { function: Arc<str>, name: Arc<str> },
    /// Parameter name declared twice in one signature
    DuplicateParameter { function: Arc<str>, name: Arc<str> },
    /// Load of a name that was never bound
    UndefinedName(Arc<str>),

    /// Spread or unpack source cannot be iterated
    NotIterable { type_name: &'static str },
    /// Item produced for join is not text
    JoinItemNotText {
        position: usize,
        type_name: &'static str,
    },
    /// Split called with an empty separator
    EmptySeparator,

    /// Slice step of zero
    ZeroSliceStep,
    /// Repeat result would exceed [`crate::text::MAX_TEXT_LEN`]
    RepeatTooLarge { len: usize, times: i64 },
    /// A generator was pulled from inside its own step
    GeneratorRunning,

    /// Assignment target that is not an identifier (or a starred one)
    InvalidTarget(Arc<str>),
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::IndexOutOfRange { .. } => ErrorKind::Index,
            RuntimeError::UnpackMismatch { .. }
            | RuntimeError::TooManyPositional { .. }
            | RuntimeError::MultipleStarred => ErrorKind::Arity,
            RuntimeError::UnexpectedKeyword { .. }
            | RuntimeError::MissingArgument { .. }
            | RuntimeError::MultipleValues { .. }
            | RuntimeError::DuplicateParameter { .. }
            | RuntimeError::UndefinedName(_)
            | RuntimeError::InvalidTarget(_) => ErrorKind::Name,
            RuntimeError::NotIterable { .. }
            | RuntimeError::JoinItemNotText { .. }
            | RuntimeError::EmptySeparator => ErrorKind::Type,
            RuntimeError::ZeroSliceStep
            | RuntimeError::RepeatTooLarge { .. }
            | RuntimeError::GeneratorRunning => ErrorKind::Value,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::IndexOutOfRange { index, len } => {
                write!(f, "index {} out of range for length {}", index, len)
            }
            RuntimeError::UnpackMismatch {
                expected,
                got,
                starred,
            } => {
                if *starred {
                    write!(
                        f,
                        "wrong number of values to unpack (expected at least {}, got {})",
                        expected, got
                    )
                } else {
                    write!(
                        f,
                        "wrong number of values to unpack (expected {}, got {})",
                        expected, got
                    )
                }
            }
            RuntimeError::TooManyPositional {
                function,
                expected,
                given,
            } => write!(
                f,
                "too many positional arguments: {}() takes {} but {} were given",
                function, expected, given
            ),
            RuntimeError::MultipleStarred => {
                write!(f, "multiple starred expressions in assignment")
            }
            RuntimeError::UnexpectedKeyword { function, name } => {
                write!(
                    f,
                    "unexpected keyword argument '{}' for {}()",
                    name, function
                )
            }
            RuntimeError::MissingArgument { function, name } => {
                write!(f, "missing required argument '{}' for {}()", name, function)
            }
            RuntimeError::MultipleValues { function, name } => {
                write!(f, "{}() got multiple values for argument '{}'", function, name)
            }
            RuntimeError::DuplicateParameter { function, name } => {
                write!(f, "duplicate parameter '{}' in {}()", name, function)
            }
            RuntimeError::UndefinedName(name) => write!(f, "name '{}' is not defined", name),
            RuntimeError::NotIterable { type_name } => {
                write!(f, "'{}' object is not iterable", type_name)
            }
            RuntimeError::JoinItemNotText {
                position,
                type_name,
            } => write!(
                f,
                "sequence item {}: expected str instance, {} found",
                position, type_name
            ),
            RuntimeError::EmptySeparator => write!(f, "empty separator"),
            RuntimeError::ZeroSliceStep => write!(f, "slice step cannot be zero"),
            RuntimeError::RepeatTooLarge { len, times } => write!(
                f,
                "repeated text too large: {} codepoints * {}",
                len, times
            ),
            RuntimeError::GeneratorRunning => write!(f, "generator already executing"),
            RuntimeError::InvalidTarget(target) => {
                write!(f, "invalid assignment target '{}'", target)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Result alias used throughout the runtime
pub type Result<T> = std::result::Result<T, RuntimeError>;

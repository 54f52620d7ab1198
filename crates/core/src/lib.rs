//! Tessera Core: value types shared by the runtime subsystems
//!
//! Key design principles:
//! - Value: What the runtime talks about (Int, Str, List, Tuple, Lazy, ...)
//! - Text: Immutable codepoint sequence with content equality and ordering
//! - LazySequence: Single-pass producer pulled by spreads, unpacking and join
//!
//! # Modules
//!
//! - `error`: `RuntimeError` and its `ErrorKind` categories
//! - `text`: `Text` and slice bound resolution
//! - `lazy`: `LazySequence` producers (eager or generator-backed)
//! - `value`: Core `Value` enum

pub mod error;
pub mod lazy;
pub mod text;
pub mod value;

pub use error::{ErrorKind, Result, RuntimeError};
pub use lazy::LazySequence;
pub use text::{MAX_TEXT_LEN, SliceBounds, Text};
pub use value::Value;

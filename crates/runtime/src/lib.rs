//! Tessera Runtime: text operations, call binding and destructuring
//!
//! Key design principles:
//! - Every operation is synchronous and returns `Result<_, RuntimeError>`
//! - Results are built completely before they are returned; a failure never
//!   leaves a partial environment, binding set or text behind
//! - Spreads, unpacking and join pull from `LazySequence` producers and
//!   drain them in production order
//!
//! # Modules
//!
//! - `string_ops`: split, strip, join, replace, prefix/suffix tests
//! - `binder`: `ParameterSpec` + `ArgumentList` → `BoundEnvironment`
//! - `function`: native functions that bind before running
//! - `destructure`: starred unpacking and `Scope` assignment

pub mod binder;
pub mod destructure;
pub mod function;
pub mod string_ops;

// Re-export key types
pub use binder::{
    Argument, ArgumentList, BoundEnvironment, ParameterSpec, ParameterSpecBuilder, bind,
};
pub use destructure::{Pattern, Scope, Target, unpack, unpack_value};
pub use function::{Function, NativeBody};

// Core types, so callers need only this crate
pub use tessera_core::{ErrorKind, LazySequence, Result, RuntimeError, SliceBounds, Text, Value};

// String operations
pub use string_ops::{
    contains as string_contains, count as string_count, ends_with as string_ends_with,
    find as string_find, join as string_join, join_value as string_join_value,
    lstrip as string_lstrip, replace as string_replace, rstrip as string_rstrip,
    split as string_split, split_whitespace as string_split_whitespace,
    starts_with as string_starts_with, strip as string_strip,
};

//! Destructuring assignment
//!
//! Unpacks an ordered source into a target pattern such as `a, *b, c`.
//! Patterns hold at most one starred target, which captures whatever the
//! plain targets before and after it do not claim, as a list.
//!
//! ## Evaluation order
//!
//! The source is fully materialized before any target is written. `Scope`
//! builds on that: the right-hand side of `a, b = b, a` is loaded into a
//! source vector first, then every binding is applied at once, so the swap
//! observes the pre-assignment values of both names.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tessera_core::{Result, RuntimeError, Value};
use tracing::debug;

/// One assignment target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Name(Arc<str>),
    /// `*name`: captures the variable-length remainder
    Starred(Arc<str>),
}

impl Target {
    pub fn name(&self) -> &str {
        match self {
            Target::Name(name) | Target::Starred(name) => &**name,
        }
    }

    pub fn is_starred(&self) -> bool {
        matches!(self, Target::Starred(_))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

impl FromStr for Target {
    type Err = RuntimeError;

    /// `"*rest"` is starred, a bare identifier is a plain name
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, starred) = match s.strip_prefix('*') {
            Some(name) => (name.trim(), true),
            None => (s, false),
        };
        if !is_identifier(name) {
            debug!(text = s, "invalid assignment target");
            return Err(RuntimeError::InvalidTarget(s.into()));
        }
        Ok(if starred {
            Target::Starred(name.into())
        } else {
            Target::Name(name.into())
        })
    }
}

/// Ordered assignment targets with at most one starred slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    targets: Vec<Target>,
    star: Option<usize>,
}

impl Pattern {
    pub fn new(targets: Vec<Target>) -> Result<Pattern> {
        let mut star = None;
        for (i, target) in targets.iter().enumerate() {
            if target.is_starred() {
                if star.is_some() {
                    return Err(RuntimeError::MultipleStarred);
                }
                star = Some(i);
            }
        }
        Ok(Pattern { targets, star })
    }

    /// Build from target text, e.g. `"a, *b"`
    ///
    /// A single trailing comma is allowed (`"a,"` is a one-target pattern);
    /// any other empty slot is an invalid target.
    pub fn parse(text: &str) -> Result<Pattern> {
        let mut parts: Vec<&str> = text.split(',').map(str::trim).collect();
        if parts.len() > 1 && parts.last().is_some_and(|last| last.is_empty()) {
            parts.pop();
        }
        let mut targets = Vec::with_capacity(parts.len());
        for part in parts {
            targets.push(part.parse::<Target>()?);
        }
        Pattern::new(targets)
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Position of the starred target, if any
    pub fn star_index(&self) -> Option<usize> {
        self.star
    }

    /// Minimum number of source values (exact count without a star)
    pub fn required(&self) -> usize {
        match self.star {
            Some(_) => self.targets.len() - 1,
            None => self.targets.len(),
        }
    }
}

/// Unpack `source` into `pattern`, returning bindings in target order
///
/// The source is drained completely before any binding is produced.
pub fn unpack<I>(pattern: &Pattern, source: I) -> Result<Vec<(Arc<str>, Value)>>
where
    I: IntoIterator<Item = Value>,
{
    let values: Vec<Value> = source.into_iter().collect();
    let got = values.len();
    let required = pattern.required();

    let Some(star) = pattern.star else {
        if got != required {
            debug!(expected = required, got, "unpack count mismatch");
            return Err(RuntimeError::UnpackMismatch {
                expected: required,
                got,
                starred: false,
            });
        }
        return Ok(pattern
            .targets
            .iter()
            .map(|target| Arc::from(target.name()))
            .zip(values)
            .collect());
    };

    if got < required {
        debug!(expected = required, got, "unpack count mismatch (starred)");
        return Err(RuntimeError::UnpackMismatch {
            expected: required,
            got,
            starred: true,
        });
    }

    let before = &pattern.targets[..star];
    let after = &pattern.targets[star + 1..];
    let middle_end = got - after.len();

    let mut values = values.into_iter();
    let mut bindings = Vec::with_capacity(pattern.targets.len());
    for target in before {
        if let Some(value) = values.next() {
            bindings.push((Arc::from(target.name()), value));
        }
    }
    let middle: Vec<Value> = values.by_ref().take(middle_end - before.len()).collect();
    bindings.push((Arc::from(pattern.targets[star].name()), Value::list(middle)));
    for (target, value) in after.iter().zip(values) {
        bindings.push((Arc::from(target.name()), value));
    }
    Ok(bindings)
}

/// Unpack any iterable value
pub fn unpack_value(pattern: &Pattern, source: &Value) -> Result<Vec<(Arc<str>, Value)>> {
    unpack(pattern, source.materialize()?)
}

/// Name-to-value mapping that assignment statements write into
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    names: HashMap<Arc<str>, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.names.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.names.get(name)
    }

    /// Read a name, failing if it was never bound
    pub fn load(&self, name: &str) -> Result<Value> {
        self.names
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedName(name.into()))
    }

    /// `pattern = source`
    ///
    /// Either every target is written or, on failure, none is.
    pub fn assign<I>(&mut self, pattern: &Pattern, source: I) -> Result<()>
    where
        I: IntoIterator<Item = Value>,
    {
        for (name, value) in unpack(pattern, source)? {
            self.names.insert(name, value);
        }
        Ok(())
    }

    /// `pattern = name1, name2, ...` where the right-hand side reads this scope
    ///
    /// Every right-hand name is loaded before anything is written.
    pub fn assign_names(&mut self, pattern: &Pattern, sources: &[&str]) -> Result<()> {
        let values = sources
            .iter()
            .map(|name| self.load(name))
            .collect::<Result<Vec<_>>>()?;
        self.assign(pattern, values)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

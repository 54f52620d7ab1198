//! Lazy sequences: single-pass, consumer-driven value producers
//!
//! A `LazySequence` is what spreads, unpacking and `join` pull from. It is
//! backed either by an eager slice of values with a cursor, or by a generator
//! state machine that computes each value on demand.
//!
//! ## Contract
//!
//! - `next_value()` returns `Some(value)` or `None` (exhausted)
//! - After the first `None` every later call returns `None`; a generator is
//!   dropped at that point and never invoked again
//! - Values are produced in order and never delivered twice, even through
//!   clones: clones share one cursor (the handle has reference semantics,
//!   like a generator object)
//!
//! Nothing runs in the background. Each pull runs the producer for exactly
//! one step on the caller's thread. The lock is released while a generator
//! step runs; a pull that arrives meanwhile (from inside the step, through
//! any clone) gets `GeneratorRunning` from [`LazySequence::try_next`] and
//! `None` from [`LazySequence::next_value`], and does not fuse the sequence.

use crate::error::{Result, RuntimeError};
use crate::value::Value;
use std::fmt;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Step = Box<dyn FnMut() -> Option<Value> + Send>;

enum Source {
    Eager { items: Arc<[Value]>, cursor: usize },
    Generator(Step),
    /// Generator step in progress; the closure is held by the puller
    Running,
    Exhausted,
}

/// Shared handle to a single-pass producer
#[derive(Clone)]
pub struct LazySequence {
    source: Arc<Mutex<Source>>,
}

impl LazySequence {
    fn with_source(source: Source) -> Self {
        LazySequence {
            source: Arc::new(Mutex::new(source)),
        }
    }

    /// Producer over an already materialized sequence
    pub fn from_values(items: impl Into<Arc<[Value]>>) -> Self {
        Self::with_source(Source::Eager {
            items: items.into(),
            cursor: 0,
        })
    }

    /// Generator driven by a closure; `None` ends the sequence
    pub fn from_fn<F>(step: F) -> Self
    where
        F: FnMut() -> Option<Value> + Send + 'static,
    {
        Self::with_source(Source::Generator(Box::new(step)))
    }

    /// Generator as an explicit state machine
    ///
    /// `step` receives the state on every pull and returns the next value,
    /// or `None` once the machine has reached its final state.
    pub fn unfold<S, F>(state: S, mut step: F) -> Self
    where
        S: Send + 'static,
        F: FnMut(&mut S) -> Option<Value> + Send + 'static,
    {
        let mut state = state;
        Self::from_fn(move || step(&mut state))
    }

    fn lock(&self) -> MutexGuard<'_, Source> {
        self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pull one value, failing if a generator step is already in progress
    pub fn try_next(&self) -> Result<Option<Value>> {
        let mut source = self.lock();
        let mut step = match mem::replace(&mut *source, Source::Running) {
            Source::Generator(step) => step,
            Source::Eager { items, cursor } => {
                let item = items.get(cursor).cloned();
                // Fuse: drop the backing storage once it runs out
                *source = match item {
                    Some(_) => Source::Eager {
                        items,
                        cursor: cursor + 1,
                    },
                    None => Source::Exhausted,
                };
                return Ok(item);
            }
            Source::Running => return Err(RuntimeError::GeneratorRunning),
            Source::Exhausted => {
                *source = Source::Exhausted;
                return Ok(None);
            }
        };
        drop(source);

        let produced = step();

        let mut source = self.lock();
        *source = match produced {
            Some(_) => Source::Generator(step),
            None => Source::Exhausted,
        };
        Ok(produced)
    }

    /// Pull one value; a re-entrant pull yields `None`
    pub fn next_value(&self) -> Option<Value> {
        self.try_next().ok().flatten()
    }

    /// Pull every remaining value in production order
    pub fn drain(&self) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        while let Some(value) = self.try_next()? {
            values.push(value);
        }
        Ok(values)
    }

    /// True once the producer has signalled exhaustion
    pub fn is_exhausted(&self) -> bool {
        matches!(*self.lock(), Source::Exhausted)
    }

    /// Identity comparison: do both handles share one producer?
    pub fn ptr_eq(&self, other: &LazySequence) -> bool {
        Arc::ptr_eq(&self.source, &other.source)
    }
}

impl Iterator for LazySequence {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.next_value()
    }
}

// PartialEq by identity (Arc pointer comparison)
impl PartialEq for LazySequence {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for LazySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.lock() {
            Source::Eager { items, cursor } => {
                write!(f, "LazySequence(eager {}/{})", cursor, items.len())
            }
            Source::Generator(_) => write!(f, "LazySequence(generator)"),
            Source::Running => write!(f, "LazySequence(running)"),
            Source::Exhausted => write!(f, "LazySequence(exhausted)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_eager_in_order_then_exhausted() {
        let seq = LazySequence::from_values(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(seq.next_value(), Some(Value::Int(1)));
        assert_eq!(seq.next_value(), Some(Value::Int(2)));
        assert_eq!(seq.next_value(), None);
        assert!(seq.is_exhausted());
        assert_eq!(seq.next_value(), None);
    }

    #[test]
    fn test_unfold_state_machine() {
        let seq = LazySequence::unfold(0i64, |i| {
            if *i < 5 {
                *i += 1;
                Some(Value::Int(*i - 1))
            } else {
                None
            }
        });
        let values: Vec<Value> = seq.collect();
        assert_eq!(values, (0..5).map(Value::Int).collect::<Vec<_>>());
    }

    #[test]
    fn test_generator_not_called_after_exhaustion() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let seq = LazySequence::from_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        });
        assert_eq!(seq.next_value(), None);
        assert_eq!(seq.next_value(), None);
        assert_eq!(seq.next_value(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clones_share_one_cursor() {
        let a = LazySequence::from_values(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let b = a.clone();
        assert_eq!(a.next_value(), Some(Value::Int(1)));
        assert_eq!(b.next_value(), Some(Value::Int(2)));
        assert_eq!(a.drain().unwrap(), vec![Value::Int(3)]);
        assert!(b.drain().unwrap().is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn test_identity_equality() {
        let a = LazySequence::from_values(Vec::<Value>::new());
        let b = LazySequence::from_values(Vec::<Value>::new());
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_reports_state() {
        let seq = LazySequence::from_values(vec![Value::Int(1)]);
        assert_eq!(format!("{:?}", seq), "LazySequence(eager 0/1)");
        seq.drain().unwrap();
        assert_eq!(format!("{:?}", seq), "LazySequence(exhausted)");
    }

    #[test]
    fn test_reentrant_pull_is_rejected() {
        let own: Arc<OnceLock<LazySequence>> = Arc::new(OnceLock::new());
        let inner = Arc::clone(&own);
        let seq = LazySequence::unfold(0i64, move |i| {
            if *i >= 2 {
                return None;
            }
            *i += 1;
            let handle = inner.get()?;
            let rejected = matches!(handle.try_next(), Err(RuntimeError::GeneratorRunning))
                && handle.next_value().is_none()
                && format!("{:?}", handle) == "LazySequence(running)";
            Some(Value::Bool(rejected))
        });
        own.set(seq.clone()).unwrap();

        assert_eq!(seq.try_next(), Ok(Some(Value::Bool(true))));
        assert!(!seq.is_exhausted());
        assert_eq!(seq.drain().unwrap(), vec![Value::Bool(true)]);
        assert!(seq.is_exhausted());
        assert_eq!(seq.try_next(), Ok(None));
    }
}

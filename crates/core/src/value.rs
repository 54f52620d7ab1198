use crate::error::{Result, RuntimeError};
use crate::lazy::LazySequence;
use crate::text::Text;
use std::fmt;
use std::sync::Arc;

/// Value: What the runtime talks about
///
/// Everything here is immutable once built. Containers share their storage
/// through `Arc`, so cloning a value is O(1) and two clones can never observe
/// each other's mutations (there are none). `Lazy` is the one exception to
/// value semantics: it is a handle to a single-pass producer and compares by
/// identity.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),

    /// Text (immutable codepoint sequence)
    Str(Text),

    /// Ordered values; what a starred unpack target receives
    List(Arc<[Value]>),

    /// Ordered values; what a variadic parameter receives
    Tuple(Arc<[Value]>),

    /// Single-pass producer (generator-like)
    Lazy(LazySequence),
}

// Compile-time check: values may cross threads
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Value>();
};

impl Value {
    pub fn list(items: impl Into<Arc<[Value]>>) -> Value {
        Value::List(items.into())
    }

    pub fn tuple(items: impl Into<Arc<[Value]>>) -> Value {
        Value::Tuple(items.into())
    }

    pub fn str(s: &str) -> Value {
        Value::Str(Text::from(s))
    }

    /// Type name as reported in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Lazy(_) => "generator",
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Elements of a list or tuple
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(&items[..]),
            _ => None,
        }
    }

    /// Producer over this value's elements
    ///
    /// Text yields one-codepoint texts, lists and tuples yield their
    /// elements, and a lazy value yields itself (sharing its cursor).
    pub fn iterate(&self) -> Result<LazySequence> {
        match self {
            Value::Str(s) => {
                let items: Vec<Value> = s.chars().map(|c| Value::Str(Text::from(c))).collect();
                Ok(LazySequence::from_values(items))
            }
            Value::List(items) | Value::Tuple(items) => {
                Ok(LazySequence::from_values(Arc::clone(items)))
            }
            Value::Lazy(seq) => Ok(seq.clone()),
            other => Err(RuntimeError::NotIterable {
                type_name: other.type_name(),
            }),
        }
    }

    /// Fully materialize the elements of an iterable value
    pub fn materialize(&self) -> Result<Vec<Value>> {
        match self {
            Value::List(items) | Value::Tuple(items) => Ok(items.to_vec()),
            other => other.iterate()?.drain(),
        }
    }

    /// The `repr()` form: like `Display` but text is quoted
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => quote(s),
            other => other.to_string(),
        }
    }
}

fn quote(s: &Text) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str(&item.repr())?;
    }
    Ok(())
}

/// The `str()` form
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::Lazy(_) => f.write_str("<generator object>"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Text::from(s))
    }
}

impl From<Text> for Value {
    fn from(s: Text) -> Self {
        Value::Str(s)
    }
}

impl From<LazySequence> for Value {
    fn from(seq: LazySequence) -> Self {
        Value::Lazy(seq)
    }
}

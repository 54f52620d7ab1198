//! Scenario evaluation
//!
//! Turns one `Operation` from a suite into runtime calls and converts the
//! result back to a TOML value so it can be compared with `expect`.
//!
//! Conversions:
//! - TOML integers, booleans and strings become `Int`, `Bool` and `Str`
//! - TOML arrays become lists
//! - on the way back, lists and tuples both become arrays, lazy values are
//!   drained into arrays, and bindings become tables
//!
//! Floats, datetimes and tables have no runtime counterpart and make the
//! case invalid.

use crate::suite::{ArgSpec, Operation, Params};
use std::cmp::Ordering;
use std::fmt;
use tessera_runtime::string_ops;
use tessera_runtime::{
    Argument, ArgumentList, Function, LazySequence, ParameterSpec, Pattern, RuntimeError, Scope,
    Text, Value, unpack,
};
use tracing::trace;

/// Why a scenario produced no value
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The runtime raised an error (may be the expected outcome)
    Runtime(RuntimeError),
    /// The scenario itself cannot be expressed
    Invalid(String),
}

impl From<RuntimeError> for EvalError {
    fn from(err: RuntimeError) -> Self {
        EvalError::Runtime(err)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Runtime(err) => write!(f, "{} error: {}", err.kind(), err),
            EvalError::Invalid(msg) => write!(f, "invalid scenario: {}", msg),
        }
    }
}

impl std::error::Error for EvalError {}

type EvalResult<T> = Result<T, EvalError>;

/// Run one operation against the runtime
pub fn evaluate(op: &Operation) -> EvalResult<toml::Value> {
    trace!(?op, "evaluating");
    let t = |s: &String| Text::from(s.as_str());

    let value = match op {
        Operation::Len { text } => int(t(text).len()),
        Operation::Index { text, index } => Value::Str(t(text).index(*index)?),
        Operation::Slice {
            text,
            start,
            stop,
            step,
        } => Value::Str(t(text).slice(*start, *stop, *step)?),
        Operation::Concat { left, right } => Value::Str(&t(left) + &t(right)),
        Operation::Repeat { text, times } => Value::Str(t(text).repeat(*times)?),
        Operation::Compare { left, right } => Value::Int(match t(left).cmp(&t(right)) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }),
        Operation::Str { value } => Value::str(&to_value(value)?.to_string()),
        Operation::Split { text, sep } => texts(string_ops::split(&t(text), &t(sep))?),
        Operation::SplitWhitespace { text } => texts(string_ops::split_whitespace(&t(text))),
        Operation::Strip { text, chars } => {
            Value::Str(string_ops::strip(&t(text), chars.as_ref().map(t).as_ref()))
        }
        Operation::Lstrip { text, chars } => {
            Value::Str(string_ops::lstrip(&t(text), chars.as_ref().map(t).as_ref()))
        }
        Operation::Rstrip { text, chars } => {
            Value::Str(string_ops::rstrip(&t(text), chars.as_ref().map(t).as_ref()))
        }
        Operation::Join { sep, items, lazy } => {
            let items = sequence(items, *lazy)?;
            Value::Str(string_ops::join_value(&t(sep), &items)?)
        }
        Operation::Replace { text, old, new } => {
            Value::Str(string_ops::replace(&t(text), &t(old), &t(new)))
        }
        Operation::Startswith { text, prefix } => {
            Value::Bool(string_ops::starts_with(&t(text), &t(prefix)))
        }
        Operation::Endswith { text, suffix } => {
            Value::Bool(string_ops::ends_with(&t(text), &t(suffix)))
        }
        Operation::Contains { text, sub } => Value::Bool(string_ops::contains(&t(text), &t(sub))),
        Operation::Find { text, sub } => Value::Int(string_ops::find(&t(text), &t(sub))),
        Operation::Count { text, sub } => int(string_ops::count(&t(text), &t(sub))),
        Operation::Bind { params, args } => {
            let env = spec(params)?.bind(&arguments(args)?)?;
            return bindings(env.iter());
        }
        Operation::Call {
            params,
            args,
            forward,
        } => {
            let f = summing_function(spec(params)?);
            let f = if *forward { forwarder(f)? } else { f };
            f.call(&arguments(args)?)?
        }
        Operation::Unpack {
            targets,
            values,
            lazy,
        } => {
            let pattern = Pattern::parse(targets)?;
            let source = sequence(values, *lazy)?;
            let bound = unpack(&pattern, source.materialize()?)?;
            return bindings(bound.iter().map(|(name, value)| (&**name, value)));
        }
        Operation::Assign {
            targets,
            locals,
            rhs,
        } => {
            let pattern = Pattern::parse(targets)?;
            let mut scope = Scope::new();
            for (name, value) in locals {
                scope.set(name, to_value(value)?);
            }
            let rhs: Vec<&str> = rhs.iter().map(String::as_str).collect();
            scope.assign_names(&pattern, &rhs)?;
            let mut written = Vec::new();
            for target in pattern.targets() {
                written.push((target.name(), scope.load(target.name())?));
            }
            return bindings(written.iter().map(|(name, value)| (*name, value)));
        }
    };
    from_value(&value)
}

/// Convert a TOML value from a suite into a runtime value
pub fn to_value(value: &toml::Value) -> EvalResult<Value> {
    match value {
        toml::Value::Integer(n) => Ok(Value::Int(*n)),
        toml::Value::Boolean(b) => Ok(Value::Bool(*b)),
        toml::Value::String(s) => Ok(Value::str(s)),
        toml::Value::Array(items) => Ok(Value::list(
            items.iter().map(to_value).collect::<EvalResult<Vec<_>>>()?,
        )),
        other => Err(EvalError::Invalid(format!(
            "{} values have no runtime form",
            other.type_str()
        ))),
    }
}

/// Convert a runtime result into a TOML value for comparison
pub fn from_value(value: &Value) -> EvalResult<toml::Value> {
    match value {
        Value::Int(n) => Ok(toml::Value::Integer(*n)),
        Value::Bool(b) => Ok(toml::Value::Boolean(*b)),
        Value::Str(s) => Ok(toml::Value::String(s.to_string())),
        Value::List(items) | Value::Tuple(items) => array(items),
        Value::Lazy(seq) => array(&seq.drain()?),
        Value::None => Err(EvalError::Invalid("None has no TOML form".to_string())),
    }
}

fn array(items: &[Value]) -> EvalResult<toml::Value> {
    Ok(toml::Value::Array(
        items.iter().map(from_value).collect::<EvalResult<Vec<_>>>()?,
    ))
}

fn bindings<'a>(pairs: impl Iterator<Item = (&'a str, &'a Value)>) -> EvalResult<toml::Value> {
    let mut table = toml::Table::new();
    for (name, value) in pairs {
        table.insert(name.to_string(), from_value(value)?);
    }
    Ok(toml::Value::Table(table))
}

fn int(n: usize) -> Value {
    Value::Int(n as i64)
}

fn texts(parts: Vec<Text>) -> Value {
    Value::list(parts.into_iter().map(Value::Str).collect::<Vec<_>>())
}

/// Items as a list, or as a generator yielding them when `lazy` is set
fn sequence(items: &[toml::Value], lazy: bool) -> EvalResult<Value> {
    let values = items.iter().map(to_value).collect::<EvalResult<Vec<_>>>()?;
    Ok(if lazy {
        Value::Lazy(generator(values))
    } else {
        Value::list(values)
    })
}

/// A producer that hands out `values` one pull at a time
fn generator(values: Vec<Value>) -> LazySequence {
    LazySequence::unfold(values.into_iter(), |rest| rest.next())
}

fn spec(params: &Params) -> EvalResult<ParameterSpec> {
    let mut builder = ParameterSpec::builder(&params.name);
    for name in &params.fixed {
        builder = builder.fixed(name);
    }
    if let Some(name) = &params.variadic {
        builder = builder.variadic(name);
    }
    for default in &params.defaults {
        builder = builder.keyword(&default.name, to_value(&default.value)?);
    }
    Ok(builder.build()?)
}

fn arguments(args: &[ArgSpec]) -> EvalResult<ArgumentList> {
    let mut list = ArgumentList::new();
    for arg in args {
        list.push(match arg {
            ArgSpec::Positional(value) => Argument::Positional(to_value(value)?),
            ArgSpec::Spread(value) => Argument::Spread(to_value(value)?),
            ArgSpec::SpreadLazy(values) => Argument::Spread(sequence(values, true)?),
            ArgSpec::Keyword { name, value } => {
                Argument::Keyword(name.as_str().into(), to_value(value)?)
            }
        });
    }
    Ok(list)
}

/// Function whose body returns the sum of every integer it was bound,
/// counting the elements of container parameters
fn summing_function(spec: ParameterSpec) -> Function {
    Function::new(spec, |env| {
        let total = env
            .iter()
            .flat_map(|(_, value)| match value.as_slice() {
                Some(items) => items.to_vec(),
                None => vec![value.clone()],
            })
            .filter_map(|value| value.as_int())
            .sum();
        Ok(Value::Int(total))
    })
}

/// `def g(*args): return f(*args)`
fn forwarder(f: Function) -> EvalResult<Function> {
    let spec = ParameterSpec::builder("g").variadic("args").build()?;
    Ok(Function::new(spec, move |env| {
        let args = env.get("args").cloned().unwrap_or(Value::None);
        f.call(&ArgumentList::new().spread(args))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::DefaultParam;
    use tessera_runtime::ErrorKind;

    fn s(text: &str) -> String {
        text.to_string()
    }

    fn params() -> Params {
        Params {
            name: s("f"),
            fixed: vec![s("a"), s("b")],
            variadic: Some(s("args")),
            defaults: vec![DefaultParam {
                name: s("c"),
                value: toml::Value::Integer(16),
            }],
        }
    }

    fn positional(values: &[i64]) -> Vec<ArgSpec> {
        values
            .iter()
            .map(|n| ArgSpec::Positional(toml::Value::Integer(*n)))
            .collect()
    }

    #[test]
    fn test_slice_and_compare() {
        let op = Operation::Slice {
            text: s("football"),
            start: Some(1),
            stop: Some(4),
            step: None,
        };
        assert_eq!(evaluate(&op).unwrap(), toml::Value::String(s("oot")));

        let op = Operation::Compare {
            left: s("football"),
            right: s("abcd"),
        };
        assert_eq!(evaluate(&op).unwrap(), toml::Value::Integer(1));
    }

    #[test]
    fn test_index_error_is_runtime() {
        let op = Operation::Index {
            text: s("abc"),
            index: 3,
        };
        match evaluate(&op).unwrap_err() {
            EvalError::Runtime(err) => assert_eq!(err.kind(), ErrorKind::Index),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_huge_repeat_is_value_error() {
        let op = Operation::Repeat {
            text: s("abc"),
            times: i64::MAX,
        };
        match evaluate(&op).unwrap_err() {
            EvalError::Runtime(err) => assert_eq!(err.kind(), ErrorKind::Value),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_join_lazy_generator() {
        let op = Operation::Join {
            sep: s("|"),
            items: ["0", "1", "2"]
                .iter()
                .map(|v| toml::Value::String(s(v)))
                .collect(),
            lazy: true,
        };
        assert_eq!(evaluate(&op).unwrap(), toml::Value::String(s("0|1|2")));
    }

    #[test]
    fn test_call_sums_bindings() {
        let op = Operation::Call {
            params: params(),
            args: positional(&[1, 2, 3, 4]),
            forward: false,
        };
        assert_eq!(evaluate(&op).unwrap(), toml::Value::Integer(26));

        let op = Operation::Call {
            params: params(),
            args: vec![
                ArgSpec::Spread(toml::Value::Array(vec![
                    toml::Value::Integer(5),
                    toml::Value::Integer(6),
                    toml::Value::Integer(7),
                    toml::Value::Integer(8),
                ])),
                ArgSpec::Keyword {
                    name: s("c"),
                    value: toml::Value::Integer(-26),
                },
            ],
            forward: false,
        };
        assert_eq!(evaluate(&op).unwrap(), toml::Value::Integer(0));
    }

    #[test]
    fn test_forwarded_call() {
        let op = Operation::Call {
            params: params(),
            args: positional(&[1, 2, 3, 4]),
            forward: true,
        };
        assert_eq!(evaluate(&op).unwrap(), toml::Value::Integer(26));
    }

    #[test]
    fn test_bind_returns_table() {
        let op = Operation::Bind {
            params: params(),
            args: positional(&[1, 2, 3]),
        };
        let toml::Value::Table(table) = evaluate(&op).unwrap() else {
            panic!("expected a table");
        };
        assert_eq!(table["a"], toml::Value::Integer(1));
        assert_eq!(
            table["args"],
            toml::Value::Array(vec![toml::Value::Integer(3)])
        );
        assert_eq!(table["c"], toml::Value::Integer(16));
    }

    #[test]
    fn test_assign_swap() {
        let mut locals = toml::Table::new();
        locals.insert(s("a"), toml::Value::Integer(1));
        locals.insert(s("b"), toml::Value::Integer(2));
        let op = Operation::Assign {
            targets: s("a, b"),
            locals,
            rhs: vec![s("b"), s("a")],
        };
        let toml::Value::Table(table) = evaluate(&op).unwrap() else {
            panic!("expected a table");
        };
        assert_eq!(table["a"], toml::Value::Integer(2));
        assert_eq!(table["b"], toml::Value::Integer(1));
    }

    #[test]
    fn test_unsupported_toml_values() {
        assert!(matches!(
            to_value(&toml::Value::Float(1.5)),
            Err(EvalError::Invalid(_))
        ));
        assert!(matches!(
            from_value(&Value::None),
            Err(EvalError::Invalid(_))
        ));
    }

    #[test]
    fn test_str_of_values() {
        let op = Operation::Str {
            value: toml::Value::Integer(6),
        };
        assert_eq!(evaluate(&op).unwrap(), toml::Value::String(s("6")));
        let op = Operation::Str {
            value: toml::Value::Array(vec![
                toml::Value::Integer(1),
                toml::Value::String(s("a")),
            ]),
        };
        assert_eq!(evaluate(&op).unwrap(), toml::Value::String(s("[1, 'a']")));
    }
}

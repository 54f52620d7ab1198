//! Call-argument binding
//!
//! Resolves a call's `ArgumentList` against a function's `ParameterSpec`,
//! producing a `BoundEnvironment`.
//!
//! # Binding Algorithm
//!
//! 1. Expand positionals: literal positionals and `*spread` expansions are
//!    appended to one buffer in the order they appear in the call
//! 2. Fill fixed parameters from the front of the buffer
//! 3. Capture the overflow in the variadic parameter (as a tuple), or fail
//!    with too-many-positional if there is none
//! 4. Apply keywords: each must name an unfilled fixed parameter or a
//!    keyword-defaulted parameter
//! 5. Fail on the first fixed parameter that is still unfilled
//! 6. Give every remaining keyword-defaulted parameter its default
//!
//! The environment is assembled only after every check has passed, so a
//! failed call never exposes a partial binding.
//!
//! # Defaults
//!
//! Defaults are fixed when the `ParameterSpec` is built and cloned into each
//! environment. Values are immutable, so a default can never carry state
//! from one call into the next.

use std::sync::Arc;
use tessera_core::{Result, RuntimeError, Value};
use tracing::{debug, trace};

/// Formal parameters of a function
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    name: Arc<str>,
    fixed: Vec<Arc<str>>,
    variadic: Option<Arc<str>>,
    defaults: Vec<(Arc<str>, Value)>,
}

impl ParameterSpec {
    /// Start declaring the parameters of function `name`
    pub fn builder(name: &str) -> ParameterSpecBuilder {
        ParameterSpecBuilder {
            name: name.into(),
            fixed: Vec::new(),
            variadic: None,
            defaults: Vec::new(),
        }
    }

    /// Function name used in error messages
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fixed(&self) -> &[Arc<str>] {
        &self.fixed
    }

    pub fn variadic(&self) -> Option<&str> {
        self.variadic.as_deref()
    }

    pub fn defaults(&self) -> &[(Arc<str>, Value)] {
        &self.defaults
    }

    /// Bind a call's arguments
    pub fn bind(&self, args: &ArgumentList) -> Result<BoundEnvironment> {
        bind(self, args)
    }
}

/// Builder for [`ParameterSpec`]
///
/// Declaration order is preserved for each parameter group.
#[derive(Debug, Clone)]
pub struct ParameterSpecBuilder {
    name: Arc<str>,
    fixed: Vec<Arc<str>>,
    variadic: Option<Arc<str>>,
    defaults: Vec<(Arc<str>, Value)>,
}

impl ParameterSpecBuilder {
    pub fn fixed(mut self, name: &str) -> Self {
        self.fixed.push(name.into());
        self
    }

    pub fn variadic(mut self, name: &str) -> Self {
        self.variadic = Some(name.into());
        self
    }

    /// Keyword-defaulted parameter; `default` is captured now
    pub fn keyword(mut self, name: &str, default: impl Into<Value>) -> Self {
        self.defaults.push((name.into(), default.into()));
        self
    }

    /// Finish the declaration, rejecting duplicate parameter names
    pub fn build(self) -> Result<ParameterSpec> {
        let mut seen: Vec<&Arc<str>> = Vec::new();
        let names = self
            .fixed
            .iter()
            .chain(self.variadic.iter())
            .chain(self.defaults.iter().map(|(name, _)| name));
        for name in names {
            if seen.contains(&name) {
                return Err(RuntimeError::DuplicateParameter {
                    function: Arc::clone(&self.name),
                    name: Arc::clone(name),
                });
            }
            seen.push(name);
        }
        Ok(ParameterSpec {
            name: self.name,
            fixed: self.fixed,
            variadic: self.variadic,
            defaults: self.defaults,
        })
    }
}

/// One slot of a call's argument list
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// `f(value)`
    Positional(Value),
    /// `f(*iterable)`
    Spread(Value),
    /// `f(name=value)`
    Keyword(Arc<str>, Value),
}

/// Actual arguments of one call, in call order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentList {
    slots: Vec<Argument>,
}

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional(mut self, value: impl Into<Value>) -> Self {
        self.slots.push(Argument::Positional(value.into()));
        self
    }

    pub fn spread(mut self, iterable: impl Into<Value>) -> Self {
        self.slots.push(Argument::Spread(iterable.into()));
        self
    }

    pub fn keyword(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.slots.push(Argument::Keyword(name.into(), value.into()));
        self
    }

    pub fn push(&mut self, argument: Argument) {
        self.slots.push(argument);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl FromIterator<Argument> for ArgumentList {
    fn from_iter<I: IntoIterator<Item = Argument>>(iter: I) -> Self {
        ArgumentList {
            slots: iter.into_iter().collect(),
        }
    }
}

/// Parameter values for one call, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundEnvironment {
    bindings: Vec<(Arc<str>, Value)>,
}

impl BoundEnvironment {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .find(|(bound, _)| &**bound == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(name, value)| (&**name, value))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn into_bindings(self) -> Vec<(Arc<str>, Value)> {
        self.bindings
    }
}

/// Bind `args` against `spec`
pub fn bind(spec: &ParameterSpec, args: &ArgumentList) -> Result<BoundEnvironment> {
    let result = bind_arguments(spec, args);
    match &result {
        Ok(env) => trace!(function = %spec.name, bound = env.len(), "bound call"),
        Err(err) => debug!(function = %spec.name, error = %err, "binding failed"),
    }
    result
}

fn bind_arguments(spec: &ParameterSpec, args: &ArgumentList) -> Result<BoundEnvironment> {
    // 1. Expand positionals and spreads into one buffer; collect keywords
    let mut buffer: Vec<Value> = Vec::new();
    let mut keywords: Vec<(&Arc<str>, &Value)> = Vec::new();
    for slot in args.iter() {
        match slot {
            Argument::Positional(value) => buffer.push(value.clone()),
            Argument::Spread(iterable) => buffer.extend(iterable.materialize()?),
            Argument::Keyword(name, value) => {
                if keywords.iter().any(|(seen, _)| *seen == name) {
                    return Err(RuntimeError::MultipleValues {
                        function: Arc::clone(&spec.name),
                        name: Arc::clone(name),
                    });
                }
                keywords.push((name, value));
            }
        }
    }

    // 2. Fixed parameters take the front of the buffer
    let given = buffer.len();
    let mut positionals = buffer.into_iter();
    let mut fixed: Vec<Option<Value>> = spec
        .fixed
        .iter()
        .map(|_| positionals.next())
        .collect();

    // 3. Overflow
    let overflow: Vec<Value> = positionals.collect();
    let variadic = match &spec.variadic {
        Some(_) => Some(Value::tuple(overflow)),
        None if !overflow.is_empty() => {
            return Err(RuntimeError::TooManyPositional {
                function: Arc::clone(&spec.name),
                expected: spec.fixed.len(),
                given,
            });
        }
        None => None,
    };

    // 4. Keywords
    let mut supplied: Vec<Option<Value>> = vec![None; spec.defaults.len()];
    for (name, value) in keywords {
        if let Some(i) = spec.fixed.iter().position(|p| p == name) {
            if fixed[i].is_some() {
                return Err(RuntimeError::MultipleValues {
                    function: Arc::clone(&spec.name),
                    name: Arc::clone(name),
                });
            }
            fixed[i] = Some(value.clone());
        } else if let Some(i) = spec.defaults.iter().position(|(p, _)| p == name) {
            supplied[i] = Some(value.clone());
        } else {
            return Err(RuntimeError::UnexpectedKeyword {
                function: Arc::clone(&spec.name),
                name: Arc::clone(name),
            });
        }
    }

    // 5. Underflow
    let mut bindings = Vec::with_capacity(spec.fixed.len() + 1 + spec.defaults.len());
    for (name, value) in spec.fixed.iter().zip(fixed) {
        match value {
            Some(value) => bindings.push((Arc::clone(name), value)),
            None => {
                return Err(RuntimeError::MissingArgument {
                    function: Arc::clone(&spec.name),
                    name: Arc::clone(name),
                });
            }
        }
    }
    if let (Some(name), Some(rest)) = (&spec.variadic, variadic) {
        bindings.push((Arc::clone(name), rest));
    }

    // 6. Defaults (clone-on-bind)
    for ((name, default), value) in spec.defaults.iter().zip(supplied) {
        bindings.push((Arc::clone(name), value.unwrap_or_else(|| default.clone())));
    }

    Ok(BoundEnvironment { bindings })
}

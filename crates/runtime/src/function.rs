//! Native functions with declared parameters
//!
//! A `Function` pairs a `ParameterSpec` with a native body. Calling it binds
//! the arguments first and runs the body only on a complete environment, so
//! the body never sees a partial binding. Bodies may call other functions,
//! which is how argument forwarding (`g(*args)` calling `f(*args)`) is
//! exercised.

use crate::binder::{ArgumentList, BoundEnvironment, ParameterSpec};
use std::fmt;
use std::sync::Arc;
use tessera_core::{Result, Value};

/// Native function body
pub type NativeBody = dyn Fn(&BoundEnvironment) -> Result<Value> + Send + Sync;

/// Callable value: parameters plus body
///
/// Cloning shares both the spec and the body (Arc).
#[derive(Clone)]
pub struct Function {
    spec: Arc<ParameterSpec>,
    body: Arc<NativeBody>,
}

impl Function {
    pub fn new<F>(spec: ParameterSpec, body: F) -> Self
    where
        F: Fn(&BoundEnvironment) -> Result<Value> + Send + Sync + 'static,
    {
        Function {
            spec: Arc::new(spec),
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        self.spec.name()
    }

    pub fn spec(&self) -> &ParameterSpec {
        &self.spec
    }

    /// Bind `args` and run the body
    pub fn call(&self, args: &ArgumentList) -> Result<Value> {
        let env = self.spec.bind(args)?;
        (self.body)(&env)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.spec.name())
    }
}

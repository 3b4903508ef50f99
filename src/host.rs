//! The host environment a module imports from.
//!
//! This is the consumer side of the boundary: the harness supplies named
//! functions and constants for the module under test to call and read. Every
//! call from the module is validated against the registered signature and
//! recorded in a log, so checks can assert that a callback fired and what an
//! observer saw.

use crate::interface::Signature;
use crate::value::Value;
use crate::ContractError;
use std::collections::HashMap;

/// A host function callable from the module under test.
pub struct HostFunction {
    signature: Signature,
    func: Box<dyn FnMut(&[Value]) -> Result<Vec<Value>, ContractError>>,
}

/// One recorded call from the module into the host.
#[derive(Debug, Clone)]
pub struct HostCall {
    pub function: String,
    pub args: Vec<Value>,
}

/// Named host functions and constants, plus the call log.
#[derive(Default)]
pub struct HostEnv {
    functions: HashMap<String, HostFunction>,
    constants: HashMap<String, Value>,
    calls: Vec<HostCall>,
}

impl HostEnv {
    /// Create a new empty host environment
    pub fn new() -> Self {
        HostEnv::default()
    }

    /// Register a host function under `name`.
    pub fn register_function<F>(&mut self, name: impl Into<String>, signature: Signature, func: F)
    where
        F: FnMut(&[Value]) -> Result<Vec<Value>, ContractError> + 'static,
    {
        self.functions.insert(
            name.into(),
            HostFunction {
                signature,
                func: Box::new(func),
            },
        );
    }

    /// Register a host constant under `name`.
    pub fn register_constant(&mut self, name: impl Into<String>, value: Value) {
        self.constants.insert(name.into(), value);
    }

    /// Look up a host constant.
    ///
    /// # Errors
    /// Returns `UnknownConstant` if nothing was registered under `name`.
    pub fn constant(&self, name: &str) -> Result<&Value, ContractError> {
        self.constants
            .get(name)
            .ok_or_else(|| ContractError::UnknownConstant(name.to_string()))
    }

    /// Call a host function from the module under test.
    ///
    /// Arguments are validated against the registered signature, the call is
    /// recorded, then the function runs.
    ///
    /// # Errors
    /// Returns `UnknownHostFunction` if nothing was registered under `name`.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Vec<Value>, ContractError> {
        {
            let host_fn = self
                .functions
                .get(name)
                .ok_or_else(|| ContractError::UnknownHostFunction(name.to_string()))?;
            crate::interface::check_types(name, &host_fn.signature.params, args)?;
        }

        self.calls.push(HostCall {
            function: name.to_string(),
            args: args.to_vec(),
        });
        #[cfg(feature = "log")]
        log::debug!("host call {name} recorded ({} total)", self.calls.len());

        let host_fn = self
            .functions
            .get_mut(name)
            .ok_or_else(|| ContractError::UnknownHostFunction(name.to_string()))?;
        (host_fn.func)(args)
    }

    /// Number of recorded calls to `name`.
    pub fn calls_to(&self, name: &str) -> usize {
        self.calls.iter().filter(|call| call.function == name).count()
    }

    /// Most recent recorded call to `name`.
    pub fn last_call(&self, name: &str) -> Option<&HostCall> {
        self.calls.iter().rev().find(|call| call.function == name)
    }

    /// All recorded calls, oldest first.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueType;

    fn env_with_doubler() -> HostEnv {
        let mut host = HostEnv::new();
        host.register_function(
            "double",
            Signature::new(vec![ValueType::I32], vec![ValueType::I32]),
            |args| {
                let v = args[0].as_i32().unwrap();
                Ok(vec![Value::I32(v * 2)])
            },
        );
        host
    }

    #[test]
    fn calls_run_and_are_recorded() {
        let mut host = env_with_doubler();
        assert_eq!(host.call("double", &[Value::I32(21)]).unwrap(), vec![Value::I32(42)]);
        assert_eq!(host.call("double", &[Value::I32(3)]).unwrap(), vec![Value::I32(6)]);

        assert_eq!(host.calls_to("double"), 2);
        assert_eq!(host.calls_to("missing"), 0);
        assert_eq!(host.calls().len(), 2);

        let last = host.last_call("double").unwrap();
        assert_eq!(last.args, vec![Value::I32(3)]);
    }

    #[test]
    fn unknown_functions_are_errors() {
        let mut host = HostEnv::new();
        let err = host.call("nope", &[]).unwrap_err();
        assert!(matches!(err, ContractError::UnknownHostFunction(_)));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn bad_arguments_are_rejected_before_recording() {
        let mut host = env_with_doubler();
        let err = host.call("double", &[]).unwrap_err();
        assert!(matches!(err, ContractError::ArityMismatch { .. }));
        let err = host.call("double", &[Value::F64(1.0)]).unwrap_err();
        assert!(matches!(err, ContractError::TypeMismatch { .. }));
        assert_eq!(host.calls_to("double"), 0);
    }

    #[test]
    fn constants() {
        let mut host = HostEnv::new();
        host.register_constant("host_version", Value::F64(1.0));
        assert_eq!(host.constant("host_version").unwrap(), &Value::F64(1.0));
        assert!(matches!(
            host.constant("missing"),
            Err(ContractError::UnknownConstant(_))
        ));
    }
}

//! In-process reference guest implementing the smoke contract.
//!
//! Plays the role a compiled module does in a real embedding: accumulator
//! state addressed by opaque handles, a three-variant cycling function, and
//! an entry point that calls back into the host before anything else runs.

use super::Guest;
use crate::handle::{HandleId, HandleTable};
use crate::host::HostEnv;
use crate::value::Value;
use crate::ContractError;

const EXPORTS: &[&str] = &[
    "start",
    "counter_new",
    "counter_with_base",
    "counter_add",
    "counter_release",
    "light_cycle",
    "blend",
];

const LIGHT_VARIANTS: i32 = 3;

/// Reference implementation of the smoke contract.
pub struct FixtureGuest {
    counters: HandleTable<i32>,
}

impl FixtureGuest {
    pub fn new() -> Self {
        FixtureGuest {
            counters: HandleTable::new(),
        }
    }
}

impl Default for FixtureGuest {
    fn default() -> Self {
        FixtureGuest::new()
    }
}

impl Guest for FixtureGuest {
    fn invoke(
        &mut self,
        host: &mut HostEnv,
        export: &str,
        args: &[Value],
    ) -> Result<Vec<Value>, ContractError> {
        match export {
            "start" => {
                host.call("hit", &[])?;
                let version = host.constant("host_version")?.clone();
                if !version.bits_eq(&Value::F64(1.0)) {
                    return Err(ContractError::Trap(format!(
                        "unsupported {version} (need f64:1.0)"
                    )));
                }
                Ok(vec![])
            }
            "counter_new" => {
                let id = self.counters.allocate(0);
                Ok(vec![Value::Handle(Some(id))])
            }
            "counter_with_base" => {
                let base = arg_i32(export, args, 0)?;
                let id = self.counters.allocate(base);
                Ok(vec![Value::Handle(Some(id))])
            }
            "counter_add" => {
                let id = arg_handle(export, args, 0)?;
                let delta = arg_i32(export, args, 1)?;
                let total = self.counters.get_mut(id)?;
                *total = total.wrapping_add(delta);
                Ok(vec![Value::I32(*total)])
            }
            "counter_release" => {
                let id = arg_handle(export, args, 0)?;
                self.counters.release(id)?;
                Ok(vec![])
            }
            "light_cycle" => {
                let ordinal = arg_i32(export, args, 0)?;
                if !(0..LIGHT_VARIANTS).contains(&ordinal) {
                    return Err(ContractError::Trap(format!(
                        "ordinal {ordinal} is not a light"
                    )));
                }
                Ok(vec![Value::I32((ordinal + 1) % LIGHT_VARIANTS)])
            }
            "blend" => {
                let a = arg_f64(export, args, 0)?;
                let b = arg_f64(export, args, 1)?;
                host.call("observe_blend", &[Value::F64(a), Value::F64(b)])?;
                Ok(vec![])
            }
            _ => Err(ContractError::UnknownExport(export.to_string())),
        }
    }

    fn has_export(&self, export: &str) -> bool {
        EXPORTS.contains(&export)
    }

    fn live_handles(&self) -> usize {
        self.counters.live()
    }
}

fn missing_arg(export: &str, args: &[Value], index: usize) -> ContractError {
    ContractError::ArityMismatch {
        name: export.to_string(),
        expected: index + 1,
        actual: args.len(),
    }
}

fn arg_i32(export: &str, args: &[Value], index: usize) -> Result<i32, ContractError> {
    match args.get(index) {
        Some(value) => value.as_i32().ok_or_else(|| ContractError::TypeMismatch {
            expected: format!("i32 for value {index} of {export}"),
            actual: value.typ().to_string(),
        }),
        None => Err(missing_arg(export, args, index)),
    }
}

fn arg_f64(export: &str, args: &[Value], index: usize) -> Result<f64, ContractError> {
    match args.get(index) {
        Some(value) => value.as_f64().ok_or_else(|| ContractError::TypeMismatch {
            expected: format!("f64 for value {index} of {export}"),
            actual: value.typ().to_string(),
        }),
        None => Err(missing_arg(export, args, index)),
    }
}

fn arg_handle(export: &str, args: &[Value], index: usize) -> Result<HandleId, ContractError> {
    match args.get(index) {
        Some(Value::Handle(Some(id))) => Ok(*id),
        Some(Value::Handle(None)) => Err(ContractError::NullHandle),
        Some(value) => Err(ContractError::TypeMismatch {
            expected: format!("handle for value {index} of {export}"),
            actual: value.typ().to_string(),
        }),
        None => Err(missing_arg(export, args, index)),
    }
}

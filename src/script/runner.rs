//! Sequential check execution against a guest and its host environment.

use super::command::{Check, Slot};
use crate::guest::Guest;
use crate::host::HostEnv;
use crate::interface::Interface;
use crate::value::{match_results, Value};
use crate::ContractError;
use std::collections::HashMap;
use std::fmt;

/// The first failing check of a run.
#[derive(Debug)]
pub struct RunFailure {
    /// Zero-based index of the failing check.
    pub index: usize,
    /// Description of the failing check.
    pub check: String,
    /// What went wrong.
    pub error: ContractError,
}

/// Outcome of a script run.
///
/// A mismatch aborts the run, so `executed` counts the checks that ran,
/// including the failing one.
#[derive(Debug)]
pub struct RunReport {
    pub total: usize,
    pub executed: usize,
    pub failure: Option<RunFailure>,
}

impl RunReport {
    pub fn ok(&self) -> bool {
        self.failure.is_none()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            None => write!(f, "{} check(s), all passed", self.total),
            Some(failure) => write!(
                f,
                "check {} of {} failed: {}: {}",
                failure.index + 1,
                self.total,
                failure.check,
                failure.error
            ),
        }
    }
}

/// Drives a guest through a check script.
///
/// Holds the declared interface, the host environment, the guest, and the
/// handle bindings accumulated by `construct` checks.
pub struct Runner<G> {
    interface: Interface,
    host: HostEnv,
    guest: G,
    bindings: HashMap<String, Value>,
}

impl<G: Guest> Runner<G> {
    pub fn new(interface: Interface, host: HostEnv, guest: G) -> Self {
        Runner {
            interface,
            host,
            guest,
            bindings: HashMap::new(),
        }
    }

    /// The host environment, for inspecting the call log.
    pub fn host(&self) -> &HostEnv {
        &self.host
    }

    /// Invoke a nullary entry point on the guest (the module's `start`).
    pub fn run_entry(&mut self, export: &str) -> Result<(), ContractError> {
        self.invoke_checked(export, &[])?;
        Ok(())
    }

    /// Execute checks in order, stopping at the first failure.
    pub fn run(&mut self, checks: &[Check]) -> RunReport {
        let mut executed = 0;
        for (index, check) in checks.iter().enumerate() {
            executed += 1;
            #[cfg(feature = "log")]
            log::debug!("check {index}: {}", check.describe());
            if let Err(error) = self.execute(check) {
                return RunReport {
                    total: checks.len(),
                    executed,
                    failure: Some(RunFailure {
                        index,
                        check: check.describe(),
                        error,
                    }),
                };
            }
        }
        RunReport {
            total: checks.len(),
            executed,
            failure: None,
        }
    }

    /// End-of-run handle accounting: every handle must have been released.
    pub fn finish(self) -> Result<(), ContractError> {
        let live = self.guest.live_handles();
        if live != 0 {
            return Err(ContractError::HandleLeak(live));
        }
        Ok(())
    }

    fn execute(&mut self, check: &Check) -> Result<(), ContractError> {
        match check {
            Check::Invoke {
                export,
                args,
                expect,
            } => {
                let args = self.resolve_all(args)?;
                let results = self.invoke_checked(export, &args)?;
                let expected = self.resolve_all(expect)?;
                match_results(&results, &expected)
            }

            Check::InvokeError {
                export,
                args,
                message,
            } => {
                let args = self.resolve_all(args)?;
                match self.invoke_checked(export, &args) {
                    Ok(results) => Err(ContractError::Mismatch(format!(
                        "expected failure containing {message:?}, got {} result(s)",
                        results.len()
                    ))),
                    Err(error) => {
                        let text = error.to_string();
                        if text.contains(message.as_str()) {
                            Ok(())
                        } else {
                            Err(ContractError::Mismatch(format!(
                                "expected failure containing {message:?}, got {text:?}"
                            )))
                        }
                    }
                }
            }

            Check::Construct { bind, export, args } => {
                let args = self.resolve_all(args)?;
                let results = self.invoke_checked(export, &args)?;
                match results.as_slice() {
                    [handle @ Value::Handle(Some(_))] => {
                        self.bindings.insert(bind.clone(), handle.clone());
                        Ok(())
                    }
                    other => Err(ContractError::Mismatch(format!(
                        "constructor {export} returned {} value(s), expected one handle",
                        other.len()
                    ))),
                }
            }

            Check::Release { export, var } => {
                let handle = self.binding(var)?.clone();
                self.invoke_checked(export, &[handle])?;
                self.bindings.remove(var);
                Ok(())
            }

            Check::HostCalled { function, times } => {
                let actual = self.host.calls_to(function);
                if actual == *times {
                    Ok(())
                } else {
                    Err(ContractError::Mismatch(format!(
                        "host {function} called {actual} time(s), expected {times}"
                    )))
                }
            }

            Check::HostObserved { function, args } => {
                let expected = self.resolve_all(args)?;
                let call = self.host.last_call(function).ok_or_else(|| {
                    ContractError::Mismatch(format!("host {function} was never called"))
                })?;
                match_results(&call.args, &expected)
            }

            Check::EnumForward {
                name,
                variant,
                ordinal,
            } => {
                let actual = self.interface.enum_decl(name)?.ordinal_of(variant)?;
                if actual == *ordinal {
                    Ok(())
                } else {
                    Err(ContractError::Mismatch(format!(
                        "{name}.{variant} is {actual}, expected {ordinal}"
                    )))
                }
            }

            Check::EnumBackward {
                name,
                ordinal,
                variant,
            } => {
                let actual = self.interface.enum_decl(name)?.name_of(*ordinal)?;
                if actual == variant {
                    Ok(())
                } else {
                    Err(ContractError::Mismatch(format!(
                        "{name}[{ordinal}] is {actual}, expected {variant}"
                    )))
                }
            }

            Check::EnumKeys { name, total } => {
                let actual = self.interface.enum_decl(name)?.key_count();
                if actual == *total {
                    Ok(())
                } else {
                    Err(ContractError::Mismatch(format!(
                        "{name} exposes {actual} keys, expected {total}"
                    )))
                }
            }
        }
    }

    /// Invoke an export with interface validation on both sides of the call.
    fn invoke_checked(&mut self, export: &str, args: &[Value]) -> Result<Vec<Value>, ContractError> {
        self.interface.check_args(export, args)?;
        let results = self.guest.invoke(&mut self.host, export, args)?;
        self.interface.check_results(export, &results)?;
        Ok(results)
    }

    fn binding(&self, var: &str) -> Result<&Value, ContractError> {
        self.bindings
            .get(var)
            .ok_or_else(|| ContractError::UnboundVariable(var.to_string()))
    }

    fn resolve_all(&self, slots: &[Slot]) -> Result<Vec<Value>, ContractError> {
        slots.iter().map(|slot| self.resolve(slot)).collect()
    }

    /// Resolve a script slot to a runtime value.
    fn resolve(&self, slot: &Slot) -> Result<Value, ContractError> {
        match slot.typ.as_str() {
            "var" => self.binding(&slot.value).cloned(),
            "variant" => {
                let (enum_name, variant) = slot.value.split_once('.').ok_or_else(|| {
                    ContractError::InvalidLiteral(format!(
                        "variant path '{}': expected Enum.Variant",
                        slot.value
                    ))
                })?;
                let ordinal = self.interface.enum_decl(enum_name)?.ordinal_of(variant)?;
                Ok(Value::I32(ordinal as i32))
            }
            _ => Value::from_strings(&slot.typ, &slot.value),
        }
    }
}

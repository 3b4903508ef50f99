//! The declared export surface a module must satisfy.
//!
//! An [`Interface`] is the harness-side description of what a generated
//! binding exposes: function signatures and fixed enumerations. Every invoke
//! is validated against it before reaching the module and after results come
//! back, so a shape mismatch is reported at the boundary rather than as a
//! confusing downstream failure.

use crate::value::{Value, ValueType};
use crate::ContractError;
use std::collections::HashMap;

/// Parameter and result types of a function crossing the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<ValueType>,
    pub results: Vec<ValueType>,
}

impl Signature {
    pub fn new(params: Vec<ValueType>, results: Vec<ValueType>) -> Self {
        Signature { params, results }
    }
}

/// A fixed enumeration exposed with dual-direction lookup.
///
/// A generated binding publishes each variant under two keys: its name
/// (mapping to the ordinal) and its ordinal (mapping back to the name).
#[derive(Debug, Clone)]
pub struct EnumDecl {
    name: String,
    variants: Vec<String>,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>, variants: &[&str]) -> Self {
        EnumDecl {
            name: name.into(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name → ordinal lookup.
    pub fn ordinal_of(&self, variant: &str) -> Result<u32, ContractError> {
        self.variants
            .iter()
            .position(|v| v == variant)
            .map(|i| i as u32)
            .ok_or_else(|| ContractError::UnknownVariant {
                name: self.name.clone(),
                variant: variant.to_string(),
            })
    }

    /// Ordinal → name lookup.
    pub fn name_of(&self, ordinal: u32) -> Result<&str, ContractError> {
        self.variants
            .get(ordinal as usize)
            .map(String::as_str)
            .ok_or_else(|| ContractError::UnknownVariant {
                name: self.name.clone(),
                variant: format!("#{ordinal}"),
            })
    }

    /// Total lookup keys the binding exposes: one forward and one backward
    /// key per variant.
    pub fn key_count(&self) -> usize {
        self.variants.len() * 2
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }
}

/// The full declared surface: functions and enumerations.
#[derive(Debug, Clone, Default)]
pub struct Interface {
    functions: HashMap<String, Signature>,
    enums: HashMap<String, EnumDecl>,
}

impl Interface {
    pub fn new() -> Self {
        Interface::default()
    }

    /// Declare an exported function.
    pub fn declare_function(&mut self, name: impl Into<String>, signature: Signature) {
        self.functions.insert(name.into(), signature);
    }

    /// Declare an exported enumeration.
    pub fn declare_enum(&mut self, decl: EnumDecl) {
        self.enums.insert(decl.name().to_string(), decl);
    }

    /// Look up a function signature.
    ///
    /// # Errors
    /// Returns `UnknownExport` if no function was declared under `name`.
    pub fn signature(&self, name: &str) -> Result<&Signature, ContractError> {
        self.functions
            .get(name)
            .ok_or_else(|| ContractError::UnknownExport(name.to_string()))
    }

    /// Look up an enumeration declaration.
    ///
    /// # Errors
    /// Returns `UnknownEnum` if no enumeration was declared under `name`.
    pub fn enum_decl(&self, name: &str) -> Result<&EnumDecl, ContractError> {
        self.enums
            .get(name)
            .ok_or_else(|| ContractError::UnknownEnum(name.to_string()))
    }

    /// Validate argument count and types against the declared signature.
    pub fn check_args(&self, name: &str, args: &[Value]) -> Result<(), ContractError> {
        let signature = self.signature(name)?;
        check_types(name, &signature.params, args)
    }

    /// Validate result count and types against the declared signature.
    pub fn check_results(&self, name: &str, results: &[Value]) -> Result<(), ContractError> {
        let signature = self.signature(name)?;
        check_types(name, &signature.results, results)
    }
}

/// Validate a value list against a type list.
pub(crate) fn check_types(
    name: &str,
    expected: &[ValueType],
    values: &[Value],
) -> Result<(), ContractError> {
    if values.len() != expected.len() {
        return Err(ContractError::ArityMismatch {
            name: name.to_string(),
            expected: expected.len(),
            actual: values.len(),
        });
    }
    for (i, (value, expected_type)) in values.iter().zip(expected).enumerate() {
        if value.typ() != *expected_type {
            return Err(ContractError::TypeMismatch {
                expected: format!("{expected_type} for value {i} of {name}"),
                actual: value.typ().to_string(),
            });
        }
    }
    Ok(())
}

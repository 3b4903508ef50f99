//! Declarative contract checks and their runner.
//!
//! A script is a sequence of checks executed in order against a guest and its
//! host environment: invoke-and-compare assertions, handle construction and
//! release with named bindings, host call-log assertions, and dual-lookup
//! assertions on enumerations. A mismatch aborts the run; the report records
//! which check failed and why.
//!
//! Scripts can be built in code (see [`crate::smoke`]) or loaded from JSON,
//! using the same typed `{ "type", "value" }` literal shape engine spec-test
//! fixtures use.
//!
//! # Example
//!
//! ```
//! use bindcheck::script::parse_script;
//!
//! let script = parse_script(r#"{
//!     "name": "minimal",
//!     "checks": [
//!         { "check": "invoke", "export": "light_cycle",
//!           "args": [ { "type": "i32", "value": "0" } ],
//!           "expect": [ { "type": "i32", "value": "1" } ] }
//!     ]
//! }"#).unwrap();
//! assert_eq!(script.checks.len(), 1);
//! ```

mod command;
mod runner;

pub use command::{Check, Script, Slot};
pub use runner::{RunFailure, RunReport, Runner};

use crate::ContractError;

/// Parse a JSON check script.
pub fn parse_script(source: &str) -> Result<Script, ContractError> {
    serde_json::from_str(source).map_err(|e| ContractError::MalformedScript(e.to_string()))
}

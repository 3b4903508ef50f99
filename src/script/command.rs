//! Check types for contract scripts.
//!
//! A script is a flat list of checks; there is no control flow. Handle-valued
//! results are carried between checks through named bindings (`construct`
//! binds, `release` forgets).

use serde::Deserialize;

/// A parsed check script.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub name: Option<String>,
    pub checks: Vec<Check>,
}

/// A typed literal, variable reference, or enum variant path.
///
/// Literal floats accept raw bit patterns (decimal or `0x` hex), falling back
/// to decimal float notation. `var` slots name a handle binding; `variant`
/// slots name an enumeration variant as `"Enum.Variant"` and resolve to its
/// ordinal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Slot {
    #[serde(rename = "type")]
    pub typ: String,
    pub value: String,
}

impl Slot {
    pub fn i32(value: i32) -> Self {
        Slot {
            typ: "i32".to_string(),
            value: value.to_string(),
        }
    }

    pub fn i64(value: i64) -> Self {
        Slot {
            typ: "i64".to_string(),
            value: value.to_string(),
        }
    }

    pub fn f32(value: f32) -> Self {
        Slot {
            typ: "f32".to_string(),
            value: value.to_bits().to_string(),
        }
    }

    pub fn f64(value: f64) -> Self {
        Slot {
            typ: "f64".to_string(),
            value: value.to_bits().to_string(),
        }
    }

    /// Reference to a handle bound by a `construct` check.
    pub fn var(name: &str) -> Self {
        Slot {
            typ: "var".to_string(),
            value: name.to_string(),
        }
    }

    /// Enum variant path, `"Enum.Variant"`.
    pub fn variant(path: &str) -> Self {
        Slot {
            typ: "variant".to_string(),
            value: path.to_string(),
        }
    }
}

/// One assertion in a contract script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Check {
    /// Invoke an export and compare its results against literals.
    Invoke {
        export: String,
        #[serde(default)]
        args: Vec<Slot>,
        #[serde(default)]
        expect: Vec<Slot>,
    },

    /// Invoke an export and expect it to fail with a matching message.
    InvokeError {
        export: String,
        #[serde(default)]
        args: Vec<Slot>,
        message: String,
    },

    /// Invoke a constructor export and bind the returned handle.
    Construct {
        bind: String,
        export: String,
        #[serde(default)]
        args: Vec<Slot>,
    },

    /// Release a bound handle through an export and forget the binding.
    Release { export: String, var: String },

    /// Assert how many times a host function was called.
    HostCalled { function: String, times: usize },

    /// Assert the arguments of the most recent call to a host function.
    HostObserved { function: String, args: Vec<Slot> },

    /// Assert name → ordinal lookup on an enumeration.
    EnumForward {
        name: String,
        variant: String,
        ordinal: u32,
    },

    /// Assert ordinal → name lookup on an enumeration.
    EnumBackward {
        name: String,
        ordinal: u32,
        variant: String,
    },

    /// Assert the total key count an enumeration binding exposes.
    EnumKeys { name: String, total: usize },
}

impl Check {
    /// Short description used in reports and for CLI filtering.
    pub fn describe(&self) -> String {
        match self {
            Check::Invoke { export, .. } => format!("invoke {export}"),
            Check::InvokeError { export, .. } => format!("invoke {export} (expecting failure)"),
            Check::Construct { bind, export, .. } => format!("construct ${bind} via {export}"),
            Check::Release { export, var } => format!("release ${var} via {export}"),
            Check::HostCalled { function, times } => {
                format!("host {function} called {times} time(s)")
            }
            Check::HostObserved { function, .. } => format!("host {function} observed arguments"),
            Check::EnumForward {
                name,
                variant,
                ordinal,
            } => format!("enum {name}.{variant} == {ordinal}"),
            Check::EnumBackward {
                name,
                ordinal,
                variant,
            } => format!("enum {name}[{ordinal}] == {variant}"),
            Check::EnumKeys { name, total } => format!("enum {name} exposes {total} keys"),
        }
    }
}

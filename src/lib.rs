//! A consumer-side conformance harness for compiled-module export surfaces.
//!
//! bindcheck drives the boundary between a host and a compiled module from
//! the host side: it registers the imports the module consumes (callbacks,
//! constants, observers), invokes the module's exported functions, follows
//! opaque handles across the boundary, and asserts literal expected results.
//!
//! # Modules
//!
//! - [`value`] -- Typed boundary values and literal-equality comparison.
//! - [`interface`] -- The declared export surface: signatures and dual-lookup
//!   enumerations.
//! - [`host`] -- The host environment a module imports from, with a call log.
//! - [`handle`] -- Opaque handle table enforcing release-exactly-once.
//! - [`guest`] -- The module-under-test abstraction and the reference guest.
//! - [`script`] -- Declarative checks, the runner, and run reports.
//! - [`smoke`] -- The built-in contract: interface, host set, and check list.
//!
//! # Example
//!
//! Run the built-in contract against the reference guest:
//!
//! ```
//! use bindcheck::guest::FixtureGuest;
//! use bindcheck::script::Runner;
//! use bindcheck::smoke;
//!
//! let mut runner = Runner::new(smoke::interface(), smoke::host(), FixtureGuest::new());
//! runner.run_entry("start").unwrap();
//! let report = runner.run(smoke::checks());
//! assert!(report.ok(), "{report}");
//! runner.finish().unwrap();
//! ```

pub mod guest;
pub mod handle;
pub mod host;
pub mod interface;
pub mod script;
pub mod smoke;
pub mod value;

pub use guest::Guest;
pub use handle::HandleId;
pub use script::{RunReport, Runner};
pub use value::{Value, ValueType};

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("unknown export: {0}")]
    UnknownExport(String),
    #[error("unknown host function: {0}")]
    UnknownHostFunction(String),
    #[error("unknown host constant: {0}")]
    UnknownConstant(String),
    #[error("unknown enumeration: {0}")]
    UnknownEnum(String),
    #[error("unknown variant {variant} in enumeration {name}")]
    UnknownVariant { name: String, variant: String },
    #[error("unbound variable: ${0}")]
    UnboundVariable(String),
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },
    #[error("arity mismatch for {name}: expected {expected} value(s), got {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("stale handle: {0}")]
    StaleHandle(HandleId),
    #[error("double release: {0}")]
    DoubleRelease(HandleId),
    #[error("null handle")]
    NullHandle,
    #[error("{0} handle(s) still live at end of run")]
    HandleLeak(usize),
    #[error("result mismatch: {0}")]
    Mismatch(String),
    #[error("invalid literal: {0}")]
    InvalidLiteral(String),
    #[error("malformed script: {0}")]
    MalformedScript(String),
    #[error("guest trap: {0}")]
    Trap(String),
}

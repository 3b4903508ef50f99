//! The module under test.
//!
//! The harness drives any compiled module through the [`Guest`] trait; what
//! sits behind it (an interpreter instance, an engine binding, or the
//! in-process [`FixtureGuest`]) is the embedder's choice.

mod fixture;

pub use fixture::FixtureGuest;

use crate::host::HostEnv;
use crate::value::Value;
use crate::ContractError;

/// A compiled module's exported surface, invocable by name.
pub trait Guest {
    /// Invoke an exported function.
    ///
    /// The host environment is passed in because exported code may call back
    /// into the host before returning.
    fn invoke(
        &mut self,
        host: &mut HostEnv,
        export: &str,
        args: &[Value],
    ) -> Result<Vec<Value>, ContractError>;

    /// Whether the module exposes an export under `name`.
    fn has_export(&self, export: &str) -> bool;

    /// Handles the module still owns on behalf of the harness.
    ///
    /// Feeds the end-of-run leak check; a guest without handle state can
    /// leave the default.
    fn live_handles(&self) -> usize {
        0
    }
}

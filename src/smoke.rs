//! The built-in smoke contract for generated-binding surfaces.
//!
//! This is the standard fixture the harness ships: the declared interface of
//! the module under test, the host environment it imports from, and the check
//! list asserting its fixture values. The reference implementation lives in
//! [`crate::guest::FixtureGuest`]; a real embedding points the same interface
//! and checks at a compiled module instead.

use crate::host::HostEnv;
use crate::interface::{EnumDecl, Interface, Signature};
use crate::script::{Check, Slot};
use crate::value::{Value, ValueType};
use once_cell::sync::Lazy;

/// Name of the enumeration exposed by the smoke surface.
pub const LIGHT: &str = "Light";

/// Declared export surface of the smoke module.
pub fn interface() -> Interface {
    let mut interface = Interface::new();
    interface.declare_function("start", Signature::new(vec![], vec![]));
    interface.declare_function("counter_new", Signature::new(vec![], vec![ValueType::Handle]));
    interface.declare_function(
        "counter_with_base",
        Signature::new(vec![ValueType::I32], vec![ValueType::Handle]),
    );
    interface.declare_function(
        "counter_add",
        Signature::new(vec![ValueType::Handle, ValueType::I32], vec![ValueType::I32]),
    );
    interface.declare_function(
        "counter_release",
        Signature::new(vec![ValueType::Handle], vec![]),
    );
    interface.declare_function(
        "light_cycle",
        Signature::new(vec![ValueType::I32], vec![ValueType::I32]),
    );
    interface.declare_function(
        "blend",
        Signature::new(vec![ValueType::F64, ValueType::F64], vec![]),
    );
    interface.declare_enum(EnumDecl::new(LIGHT, &["Green", "Yellow", "Red"]));
    interface
}

/// Host environment the smoke module imports from.
///
/// `hit` and `observe_blend` are no-ops; the call log is the observable side
/// effect. `host_version` is the constant the module's entry point consumes.
pub fn host() -> HostEnv {
    let mut host = HostEnv::new();
    host.register_function("hit", Signature::new(vec![], vec![]), |_args| Ok(vec![]));
    host.register_function(
        "observe_blend",
        Signature::new(vec![ValueType::F64, ValueType::F64], vec![]),
        |_args| Ok(vec![]),
    );
    host.register_constant("host_version", Value::F64(1.0));
    host
}

/// Built-in check list: the expected fixture values for the smoke surface.
///
/// Assumes the module's `start` entry point already ran (it fires `hit`).
pub fn checks() -> &'static [Check] {
    &CHECKS
}

static CHECKS: Lazy<Vec<Check>> = Lazy::new(|| {
    let mut checks = vec![
        Check::HostCalled {
            function: "hit".to_string(),
            times: 1,
        },
        Check::Construct {
            bind: "counter".to_string(),
            export: "counter_new".to_string(),
            args: vec![],
        },
    ];

    for (delta, total) in [(0, 0), (1, 1), (2, 3)] {
        checks.push(Check::Invoke {
            export: "counter_add".to_string(),
            args: vec![Slot::var("counter"), Slot::i32(delta)],
            expect: vec![Slot::i32(total)],
        });
    }
    checks.push(Check::Release {
        export: "counter_release".to_string(),
        var: "counter".to_string(),
    });

    checks.push(Check::Construct {
        bind: "seeded".to_string(),
        export: "counter_with_base".to_string(),
        args: vec![Slot::i32(10)],
    });
    for (delta, total) in [(0, 10), (1, 11), (2, 13)] {
        checks.push(Check::Invoke {
            export: "counter_add".to_string(),
            args: vec![Slot::var("seeded"), Slot::i32(delta)],
            expect: vec![Slot::i32(total)],
        });
    }
    checks.push(Check::Release {
        export: "counter_release".to_string(),
        var: "seeded".to_string(),
    });

    for (ordinal, variant) in ["Green", "Yellow", "Red"].into_iter().enumerate() {
        checks.push(Check::EnumForward {
            name: LIGHT.to_string(),
            variant: variant.to_string(),
            ordinal: ordinal as u32,
        });
    }
    for (ordinal, variant) in ["Green", "Yellow", "Red"].into_iter().enumerate() {
        checks.push(Check::EnumBackward {
            name: LIGHT.to_string(),
            ordinal: ordinal as u32,
            variant: variant.to_string(),
        });
    }
    checks.push(Check::EnumKeys {
        name: LIGHT.to_string(),
        total: 6,
    });

    checks.push(Check::Invoke {
        export: "light_cycle".to_string(),
        args: vec![Slot::variant("Light.Green")],
        expect: vec![Slot::variant("Light.Yellow")],
    });

    checks.push(Check::Invoke {
        export: "blend".to_string(),
        args: vec![Slot::f64(1.0), Slot::f64(2.0)],
        expect: vec![],
    });
    checks.push(Check::HostObserved {
        function: "observe_blend".to_string(),
        args: vec![Slot::f64(1.0), Slot::f64(2.0)],
    });

    checks
});

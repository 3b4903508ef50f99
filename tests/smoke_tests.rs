//! End-to-end runs of the built-in smoke contract.

use bindcheck::guest::{FixtureGuest, Guest};
use bindcheck::script::{Check, Runner, Slot};
use bindcheck::smoke;
use bindcheck::value::Value;
use bindcheck::ContractError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;

fn runner() -> Runner<FixtureGuest> {
    Runner::new(smoke::interface(), smoke::host(), FixtureGuest::new())
}

#[test]
fn smoke_contract_passes() {
    let mut runner = runner();
    runner.run_entry("start").unwrap();
    let report = runner.run(smoke::checks());
    assert!(report.ok(), "{report}");
    runner.finish().unwrap();
}

#[test]
fn entry_point_records_host_callback() {
    let mut runner = runner();
    runner.run_entry("start").unwrap();
    assert_eq!(runner.host().calls_to("hit"), 1);
}

#[test]
fn checks_fail_without_entry_point() {
    // hit never fires if start is skipped; the first check must catch that
    let mut runner = runner();
    let report = runner.run(smoke::checks());
    assert!(!report.ok());
    let failure = report.failure.unwrap();
    assert_eq!(failure.index, 0);
    assert!(failure.error.to_string().contains("called 0 time(s)"));
}

#[rstest]
#[case::default_counter(None, vec![(0, 0), (1, 1), (2, 3)])]
#[case::seeded_counter(Some(10), vec![(0, 10), (1, 11), (2, 13)])]
#[case::negative_deltas(Some(5), vec![(-2, 3), (-3, 0)])]
fn accumulator_running_sums(#[case] base: Option<i32>, #[case] steps: Vec<(i32, i32)>) {
    let mut runner = runner();
    let (export, args) = match base {
        None => ("counter_new", vec![]),
        Some(base) => ("counter_with_base", vec![Slot::i32(base)]),
    };

    let mut checks = vec![Check::Construct {
        bind: "c".to_string(),
        export: export.to_string(),
        args,
    }];
    for (delta, total) in steps {
        checks.push(Check::Invoke {
            export: "counter_add".to_string(),
            args: vec![Slot::var("c"), Slot::i32(delta)],
            expect: vec![Slot::i32(total)],
        });
    }
    checks.push(Check::Release {
        export: "counter_release".to_string(),
        var: "c".to_string(),
    });

    let report = runner.run(&checks);
    assert!(report.ok(), "{report}");
    runner.finish().unwrap();
}

#[test]
fn random_deltas_accumulate() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut runner = runner();

    let mut checks = vec![Check::Construct {
        bind: "c".to_string(),
        export: "counter_new".to_string(),
        args: vec![],
    }];
    let mut total: i32 = 0;
    for _ in 0..64 {
        let delta: i32 = rng.gen_range(-1000..=1000);
        total = total.wrapping_add(delta);
        checks.push(Check::Invoke {
            export: "counter_add".to_string(),
            args: vec![Slot::var("c"), Slot::i32(delta)],
            expect: vec![Slot::i32(total)],
        });
    }
    checks.push(Check::Release {
        export: "counter_release".to_string(),
        var: "c".to_string(),
    });

    let report = runner.run(&checks);
    assert!(report.ok(), "{report}");
    runner.finish().unwrap();
}

#[test]
fn released_handles_fail_later_checks() {
    let mut runner = runner();
    let checks = vec![
        Check::Construct {
            bind: "c".to_string(),
            export: "counter_new".to_string(),
            args: vec![],
        },
        // release through a plain invoke so the binding survives for the next check
        Check::Invoke {
            export: "counter_release".to_string(),
            args: vec![Slot::var("c")],
            expect: vec![],
        },
        Check::InvokeError {
            export: "counter_add".to_string(),
            args: vec![Slot::var("c"), Slot::i32(1)],
            message: "stale handle".to_string(),
        },
        Check::InvokeError {
            export: "counter_release".to_string(),
            args: vec![Slot::var("c")],
            message: "double release".to_string(),
        },
    ];
    let report = runner.run(&checks);
    assert!(report.ok(), "{report}");
    runner.finish().unwrap();
}

#[test]
fn double_release_surfaces_from_the_guest() {
    let mut guest = FixtureGuest::new();
    let mut host = smoke::host();
    let handle = guest
        .invoke(&mut host, "counter_new", &[])
        .unwrap()
        .remove(0);

    guest
        .invoke(&mut host, "counter_release", &[handle.clone()])
        .unwrap();
    let err = guest
        .invoke(&mut host, "counter_release", &[handle.clone()])
        .unwrap_err();
    assert!(matches!(err, ContractError::DoubleRelease(_)));

    let err = guest
        .invoke(&mut host, "counter_add", &[handle, Value::I32(1)])
        .unwrap_err();
    assert!(matches!(err, ContractError::StaleHandle(_)));
}

#[test]
fn leaked_handles_fail_finish() {
    let mut runner = runner();
    let checks = vec![Check::Construct {
        bind: "c".to_string(),
        export: "counter_new".to_string(),
        args: vec![],
    }];
    assert!(runner.run(&checks).ok());
    let err = runner.finish().unwrap_err();
    assert!(matches!(err, ContractError::HandleLeak(1)));
}

#[test]
fn cycle_wraps_around() {
    let mut runner = runner();
    let checks = vec![Check::Invoke {
        export: "light_cycle".to_string(),
        args: vec![Slot::variant("Light.Red")],
        expect: vec![Slot::variant("Light.Green")],
    }];
    let report = runner.run(&checks);
    assert!(report.ok(), "{report}");
}

#[test]
fn report_pinpoints_first_mismatch() {
    let mut runner = runner();
    runner.run_entry("start").unwrap();
    let checks = vec![
        Check::HostCalled {
            function: "hit".to_string(),
            times: 1,
        },
        // deliberately wrong: Green cycles to Yellow, not Red
        Check::Invoke {
            export: "light_cycle".to_string(),
            args: vec![Slot::i32(0)],
            expect: vec![Slot::i32(2)],
        },
        Check::HostCalled {
            function: "hit".to_string(),
            times: 1,
        },
    ];
    let report = runner.run(&checks);
    assert_eq!(report.total, 3);
    assert_eq!(report.executed, 2);
    let failure = report.failure.unwrap();
    assert_eq!(failure.index, 1);
    assert!(failure.check.contains("light_cycle"));
}

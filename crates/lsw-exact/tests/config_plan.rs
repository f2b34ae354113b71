use std::fs;

use lsw_core::{LswError, PotentialKind};
use lsw_exact::serde::{from_yaml_slice, to_yaml_string};
use lsw_exact::{
    load_plan, SolverConfig, SweepPlan, TemperatureRange, TemperatureSpec, MAX_RANGE_POINTS,
};
use tempfile::tempdir;

const RANGE_PLAN: &str = r#"
potential: DIFF_WIDTH
temperatures:
  type: range
  start: 0.1
  stop: 1.1
  step: 0.1
parallelism: 4
solver:
  rel_tolerance: 1.0e-9
"#;

#[test]
fn range_plan_parses_with_defaults() {
    let plan: SweepPlan = from_yaml_slice(RANGE_PLAN.as_bytes()).expect("plan");
    assert_eq!(plan.potential, PotentialKind::DiffWidth);
    assert_eq!(plan.parallelism, 4);
    assert_eq!(plan.output, None);
    assert_eq!(plan.solver.rel_tolerance, 1e-9);
    assert_eq!(plan.solver.abs_tolerance, SolverConfig::default().abs_tolerance);
    assert_eq!(plan.solver.max_subdivisions, 500);
    assert_eq!(plan.temperatures.values().expect("values").len(), 10);
}

#[test]
fn minimal_plan_uses_the_default_range() {
    let plan: SweepPlan = from_yaml_slice(b"potential: KT\n").expect("plan");
    assert_eq!(plan, SweepPlan::new(PotentialKind::Kt));
    assert_eq!(plan.temperatures, TemperatureSpec::Range(TemperatureRange::default()));
}

#[test]
fn list_plan_keeps_given_order() {
    let yaml = "potential: QUARTIC\ntemperatures:\n  type: list\n  values: [2.0, 0.5, 1.0]\n";
    let plan: SweepPlan = from_yaml_slice(yaml.as_bytes()).expect("plan");
    assert_eq!(plan.temperatures.values().expect("values"), vec![2.0, 0.5, 1.0]);
}

#[test]
fn plan_survives_a_yaml_round_trip() {
    let plan: SweepPlan = from_yaml_slice(RANGE_PLAN.as_bytes()).expect("plan");
    let text = to_yaml_string(&plan).expect("yaml");
    let again: SweepPlan = from_yaml_slice(text.as_bytes()).expect("reparse");
    assert_eq!(plan, again);
}

#[test]
fn unknown_potential_in_plan_is_reported_as_such() {
    let err = SweepPlan::from_yaml(b"potential: BOGUS\n").expect_err("unknown");
    assert!(matches!(err, LswError::UnknownPotential(_)), "{err}");
    assert_eq!(err.info().context.get("name").map(String::as_str), Some("BOGUS"));

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bogus.yaml");
    fs::write(&path, "potential: BOGUS\nparallelism: 2\n").expect("seed");
    let err = load_plan(&path).expect_err("unknown");
    assert!(matches!(err, LswError::UnknownPotential(_)), "{err}");
    assert!(err.info().context.contains_key("path"));

    // a malformed document is still a parse error
    let err = SweepPlan::from_yaml(b"potential: KT\nparallelism: many\n").expect_err("bad field");
    assert!(matches!(err, LswError::Serde(_)));
}

#[test]
fn load_plan_validates_temperatures() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "potential: KT\ntemperatures:\n  type: list\n  values: [1.0, 0.0]\n")
        .expect("seed");
    let err = load_plan(&path).expect_err("zero kT");
    assert!(matches!(err, LswError::InvalidInput(_)));

    let good = dir.path().join("good.yaml");
    fs::write(&good, RANGE_PLAN).expect("seed");
    assert_eq!(load_plan(&good).expect("plan").potential, PotentialKind::DiffWidth);

    let err = load_plan(&dir.path().join("missing.yaml")).expect_err("missing");
    assert!(matches!(err, LswError::Io(_)));
}

#[test]
fn ranges_follow_half_open_semantics() {
    let values = |start, stop, step| TemperatureRange { start, stop, step }.values().expect("range");
    assert_eq!(values(0.5, 2.0, 0.5), vec![0.5, 1.0, 1.5]);
    assert_eq!(values(0.1, 1.05, 0.05).len(), 19);
    assert!(values(1.0, 1.0, 0.1).is_empty());
    assert!(values(2.0, 1.0, 0.1).is_empty());
    assert!(TemperatureRange { start: 0.1, stop: 1.0, step: 0.0 }.values().is_err());
    assert!(TemperatureRange { start: 0.1, stop: f64::INFINITY, step: 0.1 }.values().is_err());
    assert_eq!(values(0.0, 1.0, 0.001).len(), 1000);
}

#[test]
fn oversized_ranges_are_rejected_without_allocating() {
    for step in [1e-300, 1e-7, f64::MIN_POSITIVE] {
        let range = TemperatureRange { start: 0.1, stop: 1.1, step };
        let err = range.values().expect_err("too many points");
        assert!(matches!(err, LswError::InvalidInput(_)), "{err}");
        assert_eq!(err.info().code, "temperature-range");
        assert_eq!(
            err.info().context.get("limit").map(String::as_str),
            Some(MAX_RANGE_POINTS.to_string().as_str())
        );
    }

    let yaml = "potential: KT\ntemperatures:\n  type: range\n  start: 0.1\n  stop: 1.1\n  step: 1.0e-300\n";
    let plan = SweepPlan::from_yaml(yaml.as_bytes()).expect("parses");
    assert!(matches!(plan.validate(), Err(LswError::InvalidInput(_))));
}

#[test]
fn solver_settings_are_validated() {
    let bad = [
        SolverConfig { abs_tolerance: -1.0, ..SolverConfig::default() },
        SolverConfig { abs_tolerance: 0.0, rel_tolerance: 0.0, ..SolverConfig::default() },
        SolverConfig { max_subdivisions: 0, ..SolverConfig::default() },
        SolverConfig { rel_tolerance: f64::NAN, ..SolverConfig::default() },
    ];
    for config in bad {
        assert!(matches!(config.validate(), Err(LswError::InvalidInput(_))), "{config:?}");
    }
    assert!(SolverConfig::default().validate().is_ok());
}

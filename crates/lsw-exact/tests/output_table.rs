use std::fs;

use lsw_core::{LswError, PotentialKind};
use lsw_exact::{
    exact_table_file_name, format_scalar, read_exact_table, run_plan, sweep, write_density_table,
    write_exact_table, SolverConfig, SweepPlan, SweepPoint, TemperatureSpec,
};
use tempfile::tempdir;

#[test]
fn table_has_header_and_shortest_round_trip_numbers() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("KT_exact.csv");
    let points = [
        SweepPoint { kt: 0.1, energy_diff: 4.4 },
        SweepPoint { kt: 0.30000000000000004, energy_diff: 1.0 },
    ];
    let rows = write_exact_table(&path, points.iter().copied().map(Ok)).expect("write");
    assert_eq!(rows, 2);

    let text = fs::read_to_string(&path).expect("read");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, ["Temperature, Energy Diff", "0.1, 4.4", "0.30000000000000004, 1.0"]);

    let back = read_exact_table(&path).expect("read back");
    assert_eq!(back, points);
}

#[test]
fn failed_point_leaves_no_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("KT_exact.csv");
    let points = sweep("KT", [0.5, 0.0, 1.0], &SolverConfig::default()).expect("sweep");
    let err = write_exact_table(&path, points).expect_err("invalid kT");
    assert!(matches!(err, LswError::InvalidInput(_)));
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 0);
}

#[test]
fn existing_table_is_replaced_whole() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("table.csv");
    fs::write(&path, "stale\n").expect("seed");
    write_exact_table(&path, [Ok(SweepPoint { kt: 1.0, energy_diff: 2.0 })]).expect("write");
    let text = fs::read_to_string(&path).expect("read");
    assert_eq!(text, "Temperature, Energy Diff\n1.0, 2.0\n");
}

#[test]
fn legacy_tables_with_padding_are_readable() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("legacy.csv");
    fs::write(&path, "Temperature, Energy Diff\n0.1,  4.4\n 0.2 ,4.39\n").expect("seed");
    let points = read_exact_table(&path).expect("read");
    assert_eq!(points.len(), 2);
    assert_eq!(points[1], SweepPoint { kt: 0.2, energy_diff: 4.39 });
}

#[test]
fn density_table_lists_samples() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("density.csv");
    let rows = write_density_table(&path, &[(-1.0, 0.25), (0.0, 0.5)]).expect("write");
    assert_eq!(rows, 2);
    let text = fs::read_to_string(&path).expect("read");
    assert_eq!(text, "x, density\n-1.0, 0.25\n0.0, 0.5\n");
}

#[test]
fn scalars_use_shortest_representation() {
    assert_eq!(format_scalar(1.0), "1.0");
    assert_eq!(format_scalar(0.1 + 0.2), "0.30000000000000004");
    assert_eq!(format_scalar(-4.4), "-4.4");
    assert_eq!(exact_table_file_name(PotentialKind::DiffWidth), "DIFF_WIDTH_exact.csv");
}

#[test]
fn plan_writes_default_named_table() {
    let dir = tempdir().expect("tempdir");
    let mut plan = SweepPlan::new(PotentialKind::DiffWidth);
    plan.temperatures = TemperatureSpec::List {
        values: vec![0.2, 0.5],
    };
    let (points, report) = run_plan(&plan, Some(dir.path())).expect("run");
    let path = dir.path().join("DIFF_WIDTH_exact.csv");
    assert!(path.exists());
    assert_eq!(points.len(), 2);
    assert_eq!(report.rows, 2);
    assert_eq!(report.potential, "DIFF_WIDTH");
    assert_eq!(report.output.as_deref(), Some(path.display().to_string().as_str()));
    assert_eq!(read_exact_table(&path).expect("read back"), points);

    // identical plans hash identically; any change moves the hash
    let (_, again) = run_plan(&plan, Some(dir.path())).expect("rerun");
    assert_eq!(report.plan_hash, again.plan_hash);
    plan.parallelism = 2;
    let (parallel_points, changed) = run_plan(&plan, Some(dir.path())).expect("parallel run");
    assert_ne!(report.plan_hash, changed.plan_hash);
    assert_eq!(parallel_points, points);
}

#[test]
fn plan_output_overrides_the_default_name() {
    let dir = tempdir().expect("tempdir");
    let mut plan = SweepPlan::new(PotentialKind::Kt);
    plan.temperatures = TemperatureSpec::List { values: vec![1.0] };
    plan.output = Some(dir.path().join("custom.csv"));
    run_plan(&plan, None).expect("run");
    assert!(dir.path().join("custom.csv").exists());
    assert!(!dir.path().join("KT_exact.csv").exists());
}

use lsw_core::{Potential, PotentialDescriptor, PotentialKind, ShiftedPotential};
use lsw_exact::{equilibrium_density, equilibrium_density_by_name, SolverConfig};
use lsw_quad::{integrate, Tolerance};

const TEMPERATURES: [f64; 4] = [0.1, 0.5, 1.0, 5.0];

fn total_probability<P: Potential>(potential: P, kt: f64) -> f64 {
    let points = potential.feature_points();
    let density = equilibrium_density(potential, kt, &SolverConfig::default()).expect("density");
    let f = density.as_fn();
    integrate(&f, f64::NEG_INFINITY, f64::INFINITY, &points, &Tolerance::default())
        .expect("renormalise")
        .value
}

#[test]
fn densities_integrate_to_one() {
    for kind in PotentialKind::ALL {
        for kt in TEMPERATURES {
            let total = total_probability(PotentialDescriptor::of(kind), kt);
            assert!((total - 1.0).abs() < 1e-5, "{kind} at kT={kt}: {total}");
        }
    }
}

#[test]
fn shifted_densities_integrate_to_one() {
    for kind in PotentialKind::ALL {
        for kt in [0.5, 1.0] {
            let total = total_probability(ShiftedPotential { kind }, kt);
            assert!((total - 1.0).abs() < 1e-5, "shifted {kind} at kT={kt}: {total}");
        }
    }
}

#[test]
fn density_is_positive_and_peaks_in_the_deeper_well() {
    let density = equilibrium_density_by_name("KT", 0.5, &SolverConfig::default()).expect("density");
    let barrier = density.density(0.0);
    let left = density.density(-2.0);
    let right = density.density(2.4);
    assert!(barrier > 0.0);
    assert!(right > left);
    assert!(left > barrier);
    assert_eq!(density.kt(), 0.5);
    assert_eq!(density.potential().kind, PotentialKind::Kt);
}

#[test]
fn partition_function_stays_finite_in_log_space() {
    let density = equilibrium_density_by_name("KT", 0.01, &SolverConfig::default()).expect("density");
    // right well at -4.4 with curvature 10: ln Z ≈ 440 + ln sqrt(2π kT / 10)
    let expected = 4.4 / 0.01 + (2.0 * std::f64::consts::PI * 0.01 / 10.0).sqrt().ln();
    assert!((density.ln_partition_function() - expected).abs() < 1e-6);
    assert!(density.partition_function().is_finite());
    assert!(density.density(2.4).is_finite());
}

/// `10 (x² - 1)²` with no declared features.
struct UndeclaredWells;

impl Potential for UndeclaredWells {
    fn energy(&self, x: f64) -> f64 {
        let s = x * x - 1.0;
        10.0 * s * s
    }
}

#[test]
fn undeclared_wells_normalise_at_small_temperature() {
    let kt = 0.01;
    let density =
        equilibrium_density(UndeclaredWells, kt, &SolverConfig::default()).expect("density");
    // two harmonic wells of curvature 80
    let harmonic = (2.0 * (2.0 * std::f64::consts::PI * kt / 80.0).sqrt()).ln();
    assert!((density.ln_partition_function() - harmonic).abs() < 1e-2);

    let f = density.as_fn();
    let total = integrate(
        &f,
        f64::NEG_INFINITY,
        f64::INFINITY,
        &[-1.0, 1.0],
        &Tolerance::default(),
    )
    .expect("renormalise")
    .value;
    assert!((total - 1.0).abs() < 1e-5, "{total}");
}

#[test]
fn unknown_name_is_rejected() {
    let err = equilibrium_density_by_name("BOGUS", 1.0, &SolverConfig::default())
        .expect_err("unknown potential");
    assert_eq!(err.info().code, "unknown-potential");
}

#[test]
fn non_positive_temperature_is_rejected() {
    for kt in [0.0, -1.0, f64::NAN] {
        let err = equilibrium_density(PotentialKind::Quartic, kt, &SolverConfig::default())
            .expect_err("invalid kT");
        assert!(matches!(err, lsw_core::LswError::InvalidInput(_)), "{err}");
    }
}

#[test]
fn sampling_covers_the_grid() {
    let density = equilibrium_density_by_name("DIFF_WIDTH", 1.0, &SolverConfig::default()).expect("density");
    let samples = density.sample(-3.0, 3.0, 61).expect("samples");
    assert_eq!(samples.len(), 61);
    assert_eq!(samples[0].0, -3.0);
    assert!((samples[60].0 - 3.0).abs() < 1e-12);
    assert!(samples.iter().all(|(_, p)| *p >= 0.0 && p.is_finite()));

    // trapezoid over a wide grid recovers most of the mass
    let h = 0.1;
    let mass: f64 = samples.windows(2).map(|w| 0.5 * h * (w[0].1 + w[1].1)).sum();
    assert!((mass - 1.0).abs() < 0.02, "{mass}");

    assert!(density.sample(1.0, 1.0, 10).is_err());
    assert!(density.sample(0.0, 1.0, 1).is_err());
}

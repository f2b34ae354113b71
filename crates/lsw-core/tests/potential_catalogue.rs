use lsw_core::{potential, LswError, Potential, PotentialDescriptor, PotentialKind};
use proptest::prelude::*;

#[test]
fn catalogue_names_round_trip() {
    for kind in PotentialKind::ALL {
        let parsed: PotentialKind = kind.name().parse().expect("parse name");
        assert_eq!(parsed, kind);
        assert_eq!(kind.to_string(), kind.name());
        let json = serde_json::to_string(&kind).expect("serialize");
        assert_eq!(json, format!("\"{}\"", kind.name()));
    }
}

#[test]
fn unknown_name_fails_loudly() {
    match potential("BOGUS") {
        Err(LswError::UnknownPotential(info)) => {
            assert_eq!(info.context.get("name").map(String::as_str), Some("BOGUS"));
            assert!(info.hint.unwrap_or_default().contains("DIFF_WIDTH"));
        }
        other => panic!("expected UnknownPotential, got {other:?}"),
    }
    // names are case sensitive
    assert!(potential("kt").is_err());
}

#[test]
fn descriptors_carry_shift_constants() {
    assert_eq!(potential("KT").unwrap().shift, 4.4);
    assert_eq!(potential("QUARTIC").unwrap().shift, 2.8256360858458973);
    assert_eq!(potential("DIFF_WIDTH").unwrap().shift, 2.0);
    let diff_width = potential("DIFF_WIDTH").unwrap();
    assert!((diff_width.minima[1] - 0.48_f64.sqrt()).abs() < 1e-15);
}

#[test]
fn shift_matches_well_depth_gap() {
    for kind in PotentialKind::ALL {
        let descriptor = PotentialDescriptor::of(kind);
        assert!(
            (descriptor.well_depth_gap() - descriptor.shift).abs() < 1e-6,
            "{kind}: gap {} vs shift {}",
            descriptor.well_depth_gap(),
            descriptor.shift
        );
    }
}

#[test]
fn left_minima_sit_at_zero_energy() {
    for kind in PotentialKind::ALL {
        let [left, _] = kind.well_minima();
        assert!(kind.energy(left).abs() < 1e-9, "{kind}: {}", kind.energy(left));
    }
}

#[test]
fn minima_have_vanishing_derivative() {
    for kind in PotentialKind::ALL {
        for x in kind.well_minima() {
            assert!(kind.derivative(x).abs() < 1e-6, "{kind} at {x}");
        }
    }
}

#[test]
fn piecewise_segments_are_continuous() {
    for kind in PotentialKind::ALL {
        for &b in kind.segment_breakpoints() {
            let below = kind.energy(b - 1e-9);
            let above = kind.energy(b + 1e-9);
            assert!((below - above).abs() < 1e-4, "{kind} jumps at {b}");
        }
    }
}

#[test]
fn derivative_matches_finite_difference() {
    let h = 1e-6;
    for kind in PotentialKind::ALL {
        for x in [-3.1, -1.7, -0.4, 0.2, 0.9, 2.0, 3.3] {
            let numeric = (kind.energy(x + h) - kind.energy(x - h)) / (2.0 * h);
            assert!((numeric - kind.derivative(x)).abs() < 1e-4, "{kind} at {x}");
        }
    }
}

#[test]
fn shifted_landscape_raises_right_half_only() {
    for kind in PotentialKind::ALL {
        let descriptor = PotentialDescriptor::of(kind);
        assert_eq!(descriptor.shifted_energy(-0.5), kind.energy(-0.5));
        assert!((descriptor.shifted_energy(0.5) - kind.energy(0.5) - descriptor.shift).abs() < 1e-12);
        let shifted = descriptor.shifted();
        let [left, right] = kind.well_minima();
        assert!((shifted.energy(left) - shifted.energy(right)).abs() < 1e-6);
        assert!(shifted.breakpoints().contains(&0.0));
    }
}

#[test]
fn feature_points_are_sorted_and_unique() {
    let points = PotentialKind::DiffWidth.feature_points();
    assert_eq!(points.len(), 5);
    assert!(points.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(PotentialKind::Quartic.feature_points().len(), 2);
}

proptest! {
    #[test]
    fn energies_are_finite_for_finite_inputs(x in -1.0e6f64..1.0e6) {
        for kind in PotentialKind::ALL {
            prop_assert!(kind.energy(x).is_finite());
            prop_assert!(kind.shifted_energy(x).is_finite());
            prop_assert!(kind.derivative(x).is_finite());
        }
    }

    #[test]
    fn energies_grow_in_the_tails(x in 10.0f64..1.0e4) {
        for kind in PotentialKind::ALL {
            prop_assert!(kind.energy(x) > 20.0);
            prop_assert!(kind.energy(-x) > 20.0);
        }
    }
}

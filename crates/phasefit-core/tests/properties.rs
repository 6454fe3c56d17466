//! Property-based tests for phasefit-core primitives.
//!
//! Tests wrapping, unaliasing, discrete derivative/integral inversion, and
//! unwrap recovery using proptest for randomized input generation.

use proptest::prelude::*;
use phasefit_core::{
    PhaseUnit, UnwrapConfig, alias_lattice, crb, disc_polyder, disc_polyint, phase_to_sig,
    poly_to_phase, polyval, sample_times, sig_to_phase, unalias_poly, unwrap, wrap,
};

/// Wrapped distance between two phases (cycles).
fn phase_distance(a: f64, b: f64) -> f64 {
    wrap(a - b).abs()
}

/// `poly + P·k` for the alias lattice basis `P`.
fn shift_by_lattice(poly: &[f64], k: &[i32]) -> Vec<f64> {
    let lattice = alias_lattice(poly.len());
    poly.iter()
        .enumerate()
        .map(|(row, &c)| {
            c + k
                .iter()
                .enumerate()
                .map(|(col, &m)| lattice[(row, col)] * f64::from(m))
                .sum::<f64>()
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any finite value, `wrap` lands in [-0.5, 0.5) and differs from
    /// the input by a whole number of cycles.
    #[test]
    fn wrap_range_and_integer_offset(x in -1.0e6f64..1.0e6f64) {
        let w = wrap(x);
        prop_assert!((-0.5..0.5).contains(&w), "wrap({}) = {}", x, w);
        let offset = x - w;
        prop_assert!(
            (offset - offset.round()).abs() < 1e-6,
            "wrap({}) = {} is not an integer shift", x, w
        );
    }

    /// Converting phase to a unit signal and back recovers the wrapped phase.
    #[test]
    fn phase_signal_round_trip(phase in prop::collection::vec(-3.0f64..3.0, 1..64)) {
        let back = sig_to_phase(&phase_to_sig(&phase));
        for (orig, rec) in phase.iter().zip(&back) {
            prop_assert!((-0.5..0.5).contains(rec));
            prop_assert!(phase_distance(*orig, *rec) < 1e-12, "{} -> {}", orig, rec);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Unaliasing never changes the wrapped phase at integer sample times.
    #[test]
    fn unalias_preserves_wrapped_samples(
        poly in prop::collection::vec(-1.0f64..1.0, 1..6),
    ) {
        let n = 40;
        let before = poly_to_phase(&poly, n, None, 1.0);
        let after = poly_to_phase(&unalias_poly(&poly), n, None, 1.0);
        for (b, a) in before.iter().zip(&after) {
            prop_assert!(phase_distance(*b, *a) < 1e-7, "{} vs {}", b, a);
        }
    }

    /// Unaliasing an already unaliased polynomial leaves it unchanged.
    #[test]
    fn unalias_idempotent(
        poly in prop::collection::vec(-50.0f64..50.0, 1..8),
    ) {
        let once = unalias_poly(&poly);
        let twice = unalias_poly(&once);
        prop_assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(&twice) {
            prop_assert!((a - b).abs() < 1e-9, "{:?} vs {:?}", once, twice);
        }
    }

    /// Polynomials that differ by an integer lattice combination unalias to
    /// the same representative.
    #[test]
    fn unalias_invariant_under_lattice_shift(
        poly in prop::collection::vec(-1.0f64..1.0, 2..6),
        k in prop::collection::vec(-3i32..=3, 5),
    ) {
        let k = &k[..poly.len()];
        let shifted = shift_by_lattice(&poly, k);
        let a = unalias_poly(&poly);
        let b = unalias_poly(&shifted);
        for (x, y) in a.iter().zip(&b) {
            prop_assert!((x - y).abs() < 1e-6, "{:?} vs {:?} (shift {:?})", a, b, k);
        }
    }

    /// The discrete integral inverts the discrete derivative up to the
    /// constant term, which comes back as zero.
    #[test]
    fn disc_polyint_inverts_disc_polyder(
        poly in prop::collection::vec(-1.0f64..1.0, 2..7),
    ) {
        let back = disc_polyint(&disc_polyder(&poly)).unwrap();
        prop_assert_eq!(back.len(), poly.len());
        let last = poly.len() - 1;
        for (k, (orig, rec)) in poly.iter().zip(&back).enumerate() {
            let expected = if k == last { 0.0 } else { *orig };
            prop_assert!((expected - rec).abs() < 1e-9, "coefficient {}: {} vs {}", k, expected, rec);
        }
    }

    /// A Nyquist-sampled polynomial phase with |f(0)| < 0.5 is recovered
    /// exactly by unwrapping its wrapped samples.
    #[test]
    fn unwrap_recovers_nyquist_polynomials(
        n in 16usize..200,
        cubic in -1.0e-6f64..1.0e-6,
        quadratic in -1.0e-3f64..1.0e-3,
        linear in -0.2f64..0.2,
        constant in -0.45f64..0.45,
    ) {
        let poly = [cubic, quadratic, linear, constant];
        let wrapped = poly_to_phase(&poly, n, None, 1.0);
        let unwrapped = unwrap(&wrapped, &UnwrapConfig::default()).unwrap();
        for (u, t) in unwrapped.iter().zip(sample_times(n, None, 1.0)) {
            let expected = polyval(&poly, t);
            prop_assert!((u - expected).abs() < 1e-8, "t={}: {} vs {}", t, u, expected);
        }
    }

    /// More samples never loosen the bound on any coefficient.
    #[test]
    fn crb_decreases_with_length(
        order in 0usize..5,
        n in 8usize..2000,
        snr_db in -10.0f64..40.0,
    ) {
        let short = crb(order, n, snr_db, PhaseUnit::Cycles, 1.0).unwrap();
        let long = crb(order, 2 * n, snr_db, PhaseUnit::Cycles, 1.0).unwrap();
        for (s, l) in short.iter().zip(&long) {
            prop_assert!(*l > 0.0 && l < s, "{} !< {}", l, s);
        }
    }
}

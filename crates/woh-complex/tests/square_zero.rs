use woh_complex::{run, Differential, GraphComplex, ParamRange, RunConfig, Session};
use woh_core::WohError;

#[test_log::test]
fn contraction_squares_to_zero_on_a_short_strand() -> Result<(), WohError> {
    let complex = GraphComplex::new(
        ParamRange::single(7),
        ParamRange::single(3),
        ParamRange::single(11),
        ParamRange::new(17, 21),
        vec![Differential::ContractEdges],
    );
    let session = Session::new();
    complex.build_basis(&session, false)?;
    let report = complex.square_zero_test(&session, Differential::ContractEdges)?;
    assert_eq!(report.tested, 3);
    assert!(report.is_success(), "{:?}", report.failures);
    Ok(())
}

#[test_log::test]
fn eps_to_omega_squares_to_zero_on_a_short_strand() -> Result<(), WohError> {
    let complex = GraphComplex::new(
        ParamRange::single(7),
        ParamRange::single(4),
        ParamRange::new(11, 13),
        ParamRange::new(17, 19),
        vec![Differential::EpsToOmega],
    );
    let session = Session::new();
    let report = complex.square_zero_test(&session, Differential::EpsToOmega)?;
    assert_eq!(report.tested, 1);
    assert!(report.is_success(), "{:?}", report.failures);
    Ok(())
}

#[test_log::test]
fn run_reports_dimensions_ranks_and_cohomology() -> Result<(), WohError> {
    let dir = tempfile::tempdir().expect("tmp dir");
    let mut config = RunConfig {
        genus: ParamRange::single(7),
        n_numbered: ParamRange::single(2),
        n_omega: ParamRange::single(11),
        degree: ParamRange::new(17, 21),
        threads: 2,
        ..RunConfig::default()
    };
    config.store.dir = Some(dir.path().to_path_buf());

    let report = run(&config)?;
    assert!(report.is_consistent());
    let row = report.dimensions.row(7, 2, 11).expect("strand row");
    assert_eq!(row.dimension(20), 1);
    assert_eq!(report.square_zero.len(), 2);
    assert_eq!(report.cohomology.len(), 2);
    assert!(report.ranks.iter().all(|entry| entry.moduli == config.rank_primes));
    assert!(report.cohomology.iter().all(|table| table.rank_moduli == config.rank_primes));
    for table in &report.cohomology {
        for entry in &table.entries {
            assert_eq!(
                entry.cohomology,
                entry.dimension as i64 - entry.rank_in as i64 - entry.rank_out as i64
            );
        }
    }

    // A second run is served from the store and reports the same values.
    let again = run(&config)?;
    assert_eq!(again, report);
    Ok(())
}

#[test_log::test]
fn genus_five_six_legs_contraction_is_non_trivially_zero() -> Result<(), WohError> {
    let config = RunConfig {
        genus: ParamRange::single(5),
        n_numbered: ParamRange::single(6),
        n_omega: ParamRange::new(11, 12),
        degree: ParamRange::new(15, 22),
        ..RunConfig::default()
    };
    let session = Session::new();
    let complex = GraphComplex::from_config(&config);
    let report = complex.square_zero_test(&session, Differential::ContractEdges)?;
    assert!(report.tested > 0);
    assert!(report.is_success(), "{:?}", report.failures);
    assert!(report.non_trivial_successes() > 0);

    // Two omega values admit no composable epsilon-to-omega pair.
    let eps = complex.square_zero_test(&session, Differential::EpsToOmega)?;
    assert_eq!(eps.tested, 0);
    Ok(())
}

/// Strands with excess at least four at the first omega, where both differentials
/// compose through non-empty spaces.
const WIDE_STRANDS: [(usize, usize); 3] = [(9, 1), (10, 0), (7, 4)];

#[test_log::test]
fn both_differentials_square_to_zero_across_three_omegas() -> Result<(), WohError> {
    let session = Session::new();
    for differential in Differential::ALL {
        let mut non_trivial = 0;
        for (genus, n_numbered) in WIDE_STRANDS {
            let complex = GraphComplex::new(
                ParamRange::single(genus),
                ParamRange::single(n_numbered),
                ParamRange::new(11, 13),
                ParamRange::new(15, 35),
                vec![differential],
            );
            let report = complex.square_zero_test(&session, differential)?;
            assert!(report.tested > 0, "{differential} on ({genus}, {n_numbered})");
            assert!(report.is_success(), "{differential}: {:?}", report.failures);
            non_trivial += report.non_trivial_successes();
        }
        assert!(non_trivial > 0, "{differential} only composed through empty spaces");
    }
    Ok(())
}

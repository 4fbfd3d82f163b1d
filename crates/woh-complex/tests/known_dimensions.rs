use woh_complex::{
    euler_characteristic_over_omega, AggregatedParams, ComponentParams, FinalParams, Session,
    SpaceKey,
};
use woh_core::WohError;

fn component_dim(session: &Session, params: ComponentParams) -> Result<usize, WohError> {
    Ok(session.basis(&SpaceKey::Component(params))?.dimension())
}

fn final_dim(session: &Session, genus: usize, n: usize, omega: usize, degree: usize) -> Result<usize, WohError> {
    let key = SpaceKey::Final(FinalParams::new(genus, n, omega, degree));
    Ok(session.basis(&key)?.dimension())
}

#[test]
fn double_legs() -> Result<(), WohError> {
    let session = Session::new();
    // Swapping two omegas on one edge is odd.
    assert_eq!(component_dim(&session, ComponentParams::new(0, 0, 0, 2, 0))?, 0);
    assert_eq!(component_dim(&session, ComponentParams::new(0, 0, 0, 0, 2))?, 1);
    assert_eq!(component_dim(&session, ComponentParams::new(0, 0, 1, 1, 0))?, 1);
    assert_eq!(component_dim(&session, ComponentParams::new(0, 0, 1, 0, 1))?, 1);
    Ok(())
}

#[test]
fn single_vertex() -> Result<(), WohError> {
    let session = Session::new();
    assert_eq!(component_dim(&session, ComponentParams::new(1, 0, 0, 3, 0))?, 1);
    assert_eq!(component_dim(&session, ComponentParams::new(1, 0, 0, 0, 3))?, 0);
    assert_eq!(component_dim(&session, ComponentParams::new(1, 0, 0, 1, 2))?, 0);
    Ok(())
}

#[test]
fn omega_trees() -> Result<(), WohError> {
    let session = Session::new();
    for (n_numbered, n_omega) in [(0, 3), (1, 2), (2, 1), (0, 5), (2, 4), (3, 3)] {
        let tree = AggregatedParams::new(1, 1, n_omega, n_numbered, n_omega, 0, 0);
        assert_eq!(tree.excess(), n_omega as i64 - 3 + 2 * n_numbered as i64);
        let basis = session.basis(&SpaceKey::Aggregated(tree))?;
        assert_eq!(basis.dimension(), 1, "{}", tree.file_stem());
    }
    Ok(())
}

#[test]
fn two_omega_legs() -> Result<(), WohError> {
    let session = Session::new();
    let legs = AggregatedParams::new(2, 0, 1, 2, 2, 0, 2);
    assert_eq!(session.basis(&SpaceKey::Aggregated(legs))?.dimension(), 1);
    Ok(())
}

#[test]
fn final_spaces_with_excess_zero() -> Result<(), WohError> {
    let session = Session::new();
    assert_eq!(final_dim(&session, 1, 11, 11, 11)?, 1);
    assert_eq!(final_dim(&session, 3, 8, 11, 14)?, 1);
    assert_eq!(final_dim(&session, 7, 2, 11, 20)?, 1);
    Ok(())
}

#[test]
fn final_spaces_with_positive_excess() -> Result<(), WohError> {
    let session = Session::new();
    assert_eq!(final_dim(&session, 2, 10, 11, 13)?, 10);
    assert_eq!(final_dim(&session, 6, 4, 11, 19)?, 5);
    assert_eq!(final_dim(&session, 7, 3, 11, 20)?, 16);
    assert_eq!(final_dim(&session, 5, 5, 11, 17)?, 1);
    Ok(())
}

#[test]
fn invalid_final_space_is_empty() -> Result<(), WohError> {
    let session = Session::new();
    assert_eq!(final_dim(&session, 7, 2, 11, 16)?, 0);
    assert_eq!(final_dim(&session, 1, 0, 11, 20)?, 0);
    Ok(())
}

#[test]
fn euler_characteristics_across_omega() -> Result<(), WohError> {
    let session = Session::new();
    assert_eq!(euler_characteristic_over_omega(&session, 7, 2)?, 1);
    assert_eq!(euler_characteristic_over_omega(&session, 5, 5)?, -1);
    // Negative excess from the first omega on.
    assert_eq!(euler_characteristic_over_omega(&session, 2, 3)?, 0);
    Ok(())
}

#[test]
fn euler_characteristic_table() -> Result<(), WohError> {
    let session = Session::new();
    let expected = [
        ((6, 4), -3),
        ((8, 1), 0),
        ((7, 3), -1),
        ((9, 0), 1),
        ((8, 2), 1),
        ((9, 1), 1),
        ((5, 6), 19),
        ((10, 0), -2),
        ((6, 5), 15),
    ];
    for ((genus, n_numbered), euler) in expected {
        assert_eq!(
            euler_characteristic_over_omega(&session, genus, n_numbered)?,
            euler,
            "genus {genus}, {n_numbered} numbered legs"
        );
    }
    Ok(())
}

use woh_complex::{Differential, FinalParams, GraphOperator, Session, SpaceKey};
use woh_core::WohError;

#[test]
fn operators_reject_non_adjacent_spaces() {
    let domain = FinalParams::new(3, 2, 11, 15);
    let err = GraphOperator::new(Differential::ContractEdges, domain, FinalParams::new(3, 2, 12, 14))
        .unwrap_err();
    assert!(matches!(err, WohError::Operator(_)));
    assert_eq!(err.info().code, "match-mismatch");

    let err = GraphOperator::new(Differential::EpsToOmega, domain, FinalParams::new(3, 2, 11, 14))
        .unwrap_err();
    assert_eq!(err.info().code, "match-mismatch");

    let err = GraphOperator::generate(Differential::ContractEdges, FinalParams::new(3, 2, 11, 0))
        .unwrap_err();
    assert_eq!(err.info().code, "no-target");
}

#[test]
fn matrix_stems_name_the_domain() {
    let op = GraphOperator::generate(Differential::EpsToOmega, FinalParams::new(5, 6, 11, 18)).unwrap();
    assert_eq!(op.target(), &FinalParams::new(5, 6, 12, 17));
    assert_eq!(op.key().file_stem(), "epstowD5_6_11_18");
    let op = GraphOperator::generate(Differential::ContractEdges, FinalParams::new(5, 6, 11, 18)).unwrap();
    assert_eq!(op.key().file_stem(), "contractD5_6_11_18");
}

#[test]
fn graphs_without_epsilons_have_no_eps_to_omega_image() -> Result<(), WohError> {
    let session = Session::new();
    let domain = FinalParams::new(3, 8, 11, 14);
    let basis = session.basis(&SpaceKey::Final(domain))?;
    assert_eq!(basis.dimension(), 1);
    let op = GraphOperator::generate(Differential::EpsToOmega, domain)?;
    for graph in basis.graphs()? {
        assert!(op.operate_on(&graph)?.is_empty());
    }
    Ok(())
}

#[test]
fn contraction_images_drop_one_edge_and_one_degree() -> Result<(), WohError> {
    let session = Session::new();
    let domain = FinalParams::new(7, 3, 11, 20);
    let basis = session.basis(&SpaceKey::Final(domain))?;
    let op = GraphOperator::generate(Differential::ContractEdges, domain)?;
    let target_vertices = op.target().n_vertices() as usize;
    for graph in basis.graphs()? {
        for (image, sign) in op.operate_on(&graph)? {
            assert!(sign == 1 || sign == -1);
            let layout = op.target().layout_for_order(image.order())?;
            assert_eq!(layout.n_internal, target_vertices);
            assert_eq!(image.size() + 1, graph.size());
        }
    }
    Ok(())
}

#[test]
fn matrices_are_deterministic() -> Result<(), WohError> {
    let domain = FinalParams::new(7, 3, 11, 20);
    let op = GraphOperator::generate(Differential::ContractEdges, domain)?;
    let first = Session::new().matrix(&op)?;
    let second = Session::new().matrix(&op)?;
    assert_eq!(first, second);
    assert_eq!(first.domain_dim(), 16);
    assert!(first
        .entries()
        .windows(2)
        .all(|pair| (pair[0].domain, pair[0].target) < (pair[1].domain, pair[1].target)));
    Ok(())
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use woh_complex::{build_matrix, rank, Differential, FinalParams, GraphOperator, Session, SpaceKey, DEFAULT_PRIMES};

fn final_basis_bench(c: &mut Criterion) {
    let key = SpaceKey::Final(FinalParams::new(7, 3, 11, 20));
    c.bench_function("final_basis_7_3_11_20", |b| {
        b.iter(|| black_box(Session::new().basis(&key).unwrap()));
    });
}

fn contraction_matrix_bench(c: &mut Criterion) {
    let session = Session::new();
    let op = GraphOperator::generate(Differential::ContractEdges, FinalParams::new(7, 3, 11, 20)).unwrap();
    let domain = session.basis(&SpaceKey::Final(*op.domain())).unwrap();
    let target = session.basis(&SpaceKey::Final(*op.target())).unwrap();
    c.bench_function("contract_matrix_7_3_11_20", |b| {
        b.iter(|| black_box(build_matrix(&op, &domain, &target).unwrap()));
    });
    let matrix = build_matrix(&op, &domain, &target).unwrap();
    c.bench_function("rank_contract_7_3_11_20", |b| {
        b.iter(|| black_box(rank(&matrix, &DEFAULT_PRIMES).unwrap()));
    });
}

criterion_group!(benches, final_basis_bench, contraction_matrix_bench);
criterion_main!(benches);

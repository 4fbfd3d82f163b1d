use criterion::{black_box, criterion_group, criterion_main, Criterion};
use woh_graph::{canonical_image, hairy_graphs, Layout};

fn canonical_form_bench(c: &mut Criterion) {
    let graphs = hairy_graphs(4, 1, 6).unwrap();
    let layout = Layout::new(4, 2, 3, 1);
    c.bench_function("canonical_image_hairy_4_1_6", |b| {
        b.iter(|| {
            for graph in &graphs {
                black_box(canonical_image(graph, &layout).unwrap());
            }
        });
    });
}

fn hairy_generation_bench(c: &mut Criterion) {
    c.bench_function("hairy_graphs_5_1_7", |b| {
        b.iter(|| black_box(hairy_graphs(5, 1, 7).unwrap()));
    });
}

criterion_group!(benches, canonical_form_bench, hairy_generation_bench);
criterion_main!(benches);

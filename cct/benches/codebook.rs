use cct::{scheme, Codebook};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_generate(c: &mut Criterion) {
    c.bench_function("generate_cct14", |b| {
        let cct14 = scheme::cct14();
        b.iter(|| Codebook::generate(&cct14))
    });

    c.bench_function("rotation_uniqueness_cct14", |b| {
        let book = Codebook::generate(&scheme::cct14());
        b.iter(|| book.check_rotation_uniqueness())
    });
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);

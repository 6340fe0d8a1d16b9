use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kinema_core::{CubicInterpolator, DirtMask, DirtReason};

fn bench_get_t(c: &mut Criterion) {
    let mut ease = CubicInterpolator::new(0.42, 0.0, 0.58, 1.0);
    ease.build_table();

    c.bench_function("get_t ease-in-out sweep", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..=100 {
                acc += ease.get_t(black_box(i as f32 / 100.0));
            }
            acc
        })
    });

    c.bench_function("build_table", |b| {
        b.iter(|| {
            ease.set_x1(black_box(0.42));
            ease.build_table();
        })
    });
}

fn bench_dirt(c: &mut Criterion) {
    c.bench_function("combine and test dirt", |b| {
        b.iter(|| {
            let mask = DirtMask::none() | black_box(DirtReason::Transform) | DirtReason::Paint;
            let cleared = mask.without(DirtReason::Paint);
            mask.has(DirtReason::Components) && !cleared.has(DirtReason::Paint)
        })
    });
}

criterion_group!(benches, bench_get_t, bench_dirt);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, Criterion};
use layopt_core::evaluator::{Evaluator, Sample};
use layopt_core::manager::Manager;
use layopt_core::pool::{Pool, PoolOptions};
use layopt_core::resources::Resources;
use std::hint::black_box;
use std::path::Path;

fn load_resources() -> Resources {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");
    Resources::load(&root).expect("bundled documents should load")
}

fn bench_evaluate(c: &mut Criterion) {
    let res = load_resources();
    let mut evaluator = Evaluator::new(&res);
    let mut mgr = Manager::new(&res.partition, Some(42));
    let mut sample = Sample::new(mgr.create());

    c.bench_function("evaluate_sample", |b| {
        b.iter(|| {
            evaluator.evaluate(black_box(&mut sample));
            sample.loss
        })
    });
}

fn bench_mutate(c: &mut Criterion) {
    let res = load_resources();
    let mut mgr = Manager::new(&res.partition, Some(42));
    let parent = mgr.create();
    let mut child = mgr.create();

    c.bench_function("mutate_layout", |b| {
        b.iter(|| {
            mgr.mutate(black_box(&mut child), black_box(&parent));
        })
    });
}

fn bench_pool_epochs(c: &mut Criterion) {
    let res = load_resources();

    c.bench_function("pool_search_64", |b| {
        b.iter(|| {
            let mut pool = Pool::new(
                &res,
                PoolOptions {
                    size: 64,
                    workers: 2,
                    seed: Some(7),
                },
            );
            pool.search()
        })
    });
}

criterion_group!(benches, bench_evaluate, bench_mutate, bench_pool_epochs);
criterion_main!(benches);

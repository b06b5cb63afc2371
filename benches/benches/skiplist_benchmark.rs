use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use zskiplist::{ScoreRange, SkipList};

fn populated(n: usize) -> SkipList {
    let mut rng = SmallRng::seed_from_u64(99);
    let mut list = SkipList::with_seed(42);

    for i in 0..n {
        let score: f64 = rng.gen_range(0.0..10_000.0);
        list.insert(score, format!("member-{i:06}"));
    }

    list
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("insert 1000 elements", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(99);
            let mut list = SkipList::with_seed(42);
            for i in 0..1000 {
                let score: f64 = rng.gen_range(0.0..10_000.0);
                list.insert(score, format!("member-{i:06}"));
            }
            black_box(list.len());
        })
    });
}

fn bench_rank(c: &mut Criterion) {
    c.bench_function("rank in 10000 elements", |b| {
        let list = populated(10_000);
        let (score, value) = list.last().map(|(s, v)| (s, v.to_string())).unwrap();
        b.iter(|| {
            black_box(list.rank(score, &value).unwrap());
        })
    });
}

fn bench_value_by_rank(c: &mut Criterion) {
    c.bench_function("value_by_rank in 10000 elements", |b| {
        let list = populated(10_000);
        b.iter(|| {
            black_box(list.value_by_rank(5_000).unwrap());
        })
    });
}

fn bench_remove_insert(c: &mut Criterion) {
    c.bench_function("remove + reinsert in 10000 elements", |b| {
        let mut list = populated(10_000);
        let (score, value) = list.first().map(|(s, v)| (s, v.to_string())).unwrap();
        b.iter(|| {
            list.remove(score, &value).unwrap();
            list.insert(score, value.clone());
        })
    });
}

fn bench_remove_range_by_score(c: &mut Criterion) {
    c.bench_function("remove_range_by_score, 10% of 10000", |b| {
        b.iter_batched(
            || populated(10_000),
            |mut list| {
                black_box(list.remove_range_by_score(&ScoreRange::new(0.0, 1_000.0)));
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_insert,
    bench_rank,
    bench_value_by_rank,
    bench_remove_insert,
    bench_remove_range_by_score
);

criterion_main!(benches);

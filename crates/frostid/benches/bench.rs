use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use frostid::{
    BasicSnowflakeGenerator, LockSnowflakeGenerator, SnowflakeGenerator, ThreadRandom, TimeSource,
    WallClock,
};
use std::time::Instant;

struct FixedMockTime {
    millis: u64,
}

impl TimeSource<u64> for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration. Matches the sequence
// space of one tick, so the mocked-clock benches never hit the spin wait.
const TOTAL_IDS: usize = 4096;

/// Benchmarks the hot path where every call lands in the current tick.
fn bench_generator<G, T>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: SnowflakeGenerator<T, ThreadRandom>,
    T: TimeSource<u64>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.try_next_id().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks generators that may spin on tick exhaustion (realistic
/// wall-clock behavior).
fn bench_generator_wall_clock<G>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    G: SnowflakeGenerator<WallClock, ThreadRandom>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let generator = generator_factory();
            let start = Instant::now();

            for _ in 0..iters {
                for _ in 0..TOTAL_IDS {
                    black_box(generator.try_next_id().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

fn bench_sample(c: &mut Criterion) {
    const REPEAT_RATE: usize = 100;

    let mut group = c.benchmark_group("sample/basic/wall");
    group.throughput(Throughput::Elements(REPEAT_RATE as u64));

    group.bench_function(format!("batch/{}", REPEAT_RATE), |b| {
        let generator =
            BasicSnowflakeGenerator::new(1, 1, WallClock::default(), ThreadRandom).unwrap();
        b.iter(|| black_box(generator.sample_n(REPEAT_RATE).unwrap()));
    });

    group.finish();
}

fn benches(c: &mut Criterion) {
    bench_generator(c, "generator/basic/mock", || {
        BasicSnowflakeGenerator::new(1, 1, FixedMockTime { millis: 42 }, ThreadRandom).unwrap()
    });
    bench_generator(c, "generator/lock/mock", || {
        LockSnowflakeGenerator::new(1, 1, FixedMockTime { millis: 42 }, ThreadRandom).unwrap()
    });
    bench_generator_wall_clock(c, "generator/basic/wall", || {
        BasicSnowflakeGenerator::new(1, 1, WallClock::default(), ThreadRandom).unwrap()
    });
    bench_generator_wall_clock(c, "generator/lock/wall", || {
        LockSnowflakeGenerator::new(1, 1, WallClock::default(), ThreadRandom).unwrap()
    });
    bench_sample(c);
}

criterion_group!(bench, benches);
criterion_main!(bench);

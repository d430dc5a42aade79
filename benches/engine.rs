//! Benchmarks for the smoke engine.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use smoke_sim::compute::Engine;

/// Square room walled on all sides with an escape in the middle of the east
/// wall.
fn room(size: usize) -> Vec<u8> {
    let mut codes = vec![b'0'; size * size];
    for i in 0..size {
        codes[i] = b'/';
        codes[(size - 1) * size + i] = b'/';
        codes[i * size] = b'/';
        codes[i * size + size - 1] = b'/';
    }
    codes[(size / 2) * size + size - 1] = b':';
    codes
}

fn bench_board_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("board_update");

    for size in [32, 64, 128, 256, 512] {
        let codes = room(size);

        for precalculated in [false, true] {
            let mut engine = Engine::new(size, size, &codes, size / 2, 1).unwrap();
            engine.config.use_precalculated_weights = precalculated;

            let label = if precalculated { "precalc" } else { "flat" };
            group.bench_with_input(
                BenchmarkId::new(label, format!("{}x{}", size, size)),
                &size,
                |b, _| {
                    b.iter(|| {
                        black_box(&mut engine).step().unwrap();
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_throttled_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("throttled_frames");
    let codes = room(128);

    for tick_rate in [1u32, 10, 50] {
        let mut engine = Engine::new(128, 128, &codes, 64, 1).unwrap();
        engine.config.tick_rate = tick_rate;
        engine.start();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("tick_rate_{}", tick_rate)),
            &tick_rate,
            |b, _| {
                b.iter(|| {
                    black_box(&mut engine).cycle().unwrap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_board_update, bench_throttled_frames);
criterion_main!(benches);

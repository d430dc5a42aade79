//! Property tests for the diffusion rule.

use proptest::prelude::*;

use super::{CellKind, Engine};

/// Random board: border-free layout of walls, floors and escapes with one
/// guaranteed floor cell for the emitter.
fn board() -> impl Strategy<Value = (usize, usize, Vec<u8>, usize, usize)> {
    (1usize..=8, 1usize..=8).prop_flat_map(|(width, height)| {
        let cells = width * height;
        (
            Just(width),
            Just(height),
            prop::collection::vec(
                prop_oneof![
                    1 => Just(b'/'),
                    6 => (b'0'..=b'9'),
                    1 => Just(b':'),
                ],
                cells,
            ),
            0..height,
            0..width,
        )
    })
}

fn engine_for(
    (width, height, mut codes, row, col): (usize, usize, Vec<u8>, usize, usize),
    emitter_rate: f32,
    escape_rate: f32,
    precalculated: bool,
) -> Engine {
    codes[row * width + col] = b'0';
    let mut engine = Engine::new(width, height, &codes, row, col).unwrap();
    engine.config.emitter_rate = emitter_rate;
    engine.config.escape_rate = escape_rate;
    engine.config.use_precalculated_weights = precalculated;
    engine
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn densities_stay_in_bounds(
        layout in board(),
        emitter_rate in 0.0f32..=1.0,
        escape_rate in 0.0f32..=1.0,
        precalculated in any::<bool>(),
        seeds in prop::collection::vec(0.0f32..=1.0, 64),
        ticks in 1usize..40,
    ) {
        let mut engine = engine_for(layout, emitter_rate, escape_rate, precalculated);
        let (width, height) = (engine.grid().width(), engine.grid().height());
        for (i, &d) in seeds.iter().enumerate().take(width * height) {
            engine.seed_floor(i / width, i % width, d);
        }
        let initial: Vec<f32> = engine.grid().cells().iter().map(|c| c.density()).collect();

        for _ in 0..ticks {
            engine.step().unwrap();
        }

        for (cell, &before) in engine.grid().cells().iter().zip(&initial) {
            match cell.kind() {
                CellKind::Wall => {
                    prop_assert_eq!(cell.density(), 0.0);
                    prop_assert_eq!(cell.intake(), 0.0);
                    prop_assert_eq!(cell.outtake(), 0.0);
                }
                CellKind::Emitter => prop_assert_eq!(cell.density(), 1.0),
                CellKind::Escape => prop_assert_eq!(cell.density(), before),
                CellKind::Floor => {
                    prop_assert!((0.0..=1.0).contains(&cell.density()));
                }
            }
        }
        prop_assert_eq!(engine.ticks(), ticks as u64);
        prop_assert!(!engine.is_running());
    }

    #[test]
    fn capacity_caps_bound_unclamped_density(
        layout in board(),
        emitter_rate in 0.0f32..=1.0,
        escape_rate in 0.0f32..=1.0,
        precalculated in any::<bool>(),
        seeds in prop::collection::vec(0.0f32..=1.0, 64),
        ticks in 1usize..40,
    ) {
        let mut engine = engine_for(layout, emitter_rate, escape_rate, precalculated);
        let width = engine.grid().width();
        let cells = width * engine.grid().height();
        for (i, &d) in seeds.iter().enumerate().take(cells) {
            engine.seed_floor(i / width, i % width, d);
        }

        // Rounding in the f32 sums may overshoot by a few ulps.
        const EPS: f32 = 1e-6;
        let mut out_of_range = Vec::new();
        for _ in 0..ticks {
            engine
                .step_observed(|idx, raw| {
                    if !(-EPS..=1.0 + EPS).contains(&raw) {
                        out_of_range.push((idx, raw));
                    }
                })
                .unwrap();
        }
        prop_assert!(out_of_range.is_empty(), "unclamped densities: {:?}", out_of_range);
    }

    #[test]
    fn step_is_one_update_for_any_tick_rate(
        layout in board(),
        tick_rate in 1u32..=50,
    ) {
        let mut engine = engine_for(layout, 1.0, 1.0, true);
        engine.config.tick_rate = tick_rate;
        engine.step().unwrap();
        prop_assert_eq!(engine.ticks(), 1);
        prop_assert!(!engine.is_running());
    }

    #[test]
    fn identical_runs_are_deterministic(layout in board(), ticks in 1usize..20) {
        let mut a = engine_for(layout.clone(), 0.7, 0.3, true);
        let mut b = engine_for(layout, 0.7, 0.3, true);
        a.start();
        b.start();
        for _ in 0..ticks {
            a.cycle().unwrap();
            b.cycle().unwrap();
        }
        prop_assert_eq!(a.grid().pixels(), b.grid().pixels());
        let da: Vec<f32> = a.grid().cells().iter().map(|c| c.density()).collect();
        let db: Vec<f32> = b.grid().cells().iter().map(|c| c.density()).collect();
        prop_assert_eq!(da, db);
    }
}

//! Board statistics for monitoring a run.

use super::{CellKind, Grid};

/// Density below this counts as clear air.
pub const ACTIVE_THRESHOLD: f32 = 1e-6;

/// Floor density statistics.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimulationStats {
    pub total_density: f32,
    pub max_density: f32,
    pub min_density: f32,
    pub mean_density: f32,
    /// Floor cells holding any smoke.
    pub active_cells: usize,
    pub floor_cells: usize,
}

impl SimulationStats {
    /// Compute statistics over the floor cells of a grid. A grid without floor
    /// reports zeros.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut total_density = 0.0f32;
        let mut max_density = f32::NEG_INFINITY;
        let mut min_density = f32::INFINITY;
        let mut active_cells = 0usize;
        let mut floor_cells = 0usize;

        for cell in grid.cells().iter().filter(|c| c.kind() == CellKind::Floor) {
            let d = cell.density();
            total_density += d;
            max_density = max_density.max(d);
            min_density = min_density.min(d);
            if d > ACTIVE_THRESHOLD {
                active_cells += 1;
            }
            floor_cells += 1;
        }

        if floor_cells == 0 {
            return Self {
                total_density: 0.0,
                max_density: 0.0,
                min_density: 0.0,
                mean_density: 0.0,
                active_cells: 0,
                floor_cells: 0,
            };
        }

        Self {
            total_density,
            max_density,
            min_density,
            mean_density: total_density / floor_cells as f32,
            active_cells,
            floor_cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Engine;

    #[test]
    fn test_fresh_board() {
        let engine = Engine::new(4, 1, b"000:", 0, 0).unwrap();
        let stats = SimulationStats::from_grid(engine.grid());
        assert_eq!(stats.floor_cells, 2);
        assert_eq!(stats.active_cells, 0);
        assert_eq!(stats.total_density, 0.0);
        assert_eq!(stats.max_density, 0.0);
    }

    #[test]
    fn test_after_one_tick() {
        let mut engine = Engine::new(4, 1, b"000:", 0, 0).unwrap();
        engine.config.use_precalculated_weights = true;
        engine.step().unwrap();

        // The first floor receives 0.5 from the emitter. Its neighbor later
        // pulls the same amount from it without draining it.
        let stats = SimulationStats::from_grid(engine.grid());
        assert_eq!(stats.active_cells, 2);
        assert_eq!(stats.total_density, 1.0);
        assert_eq!(stats.min_density, 0.5);
        assert_eq!(stats.max_density, 0.5);
        assert_eq!(stats.mean_density, 0.5);
    }

    #[test]
    fn test_no_floor() {
        let engine = Engine::new(2, 1, b"0:", 0, 0).unwrap();
        let stats = SimulationStats::from_grid(engine.grid());
        assert_eq!(stats.floor_cells, 0);
        assert_eq!(stats.mean_density, 0.0);

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"floor_cells\":0"));
    }
}

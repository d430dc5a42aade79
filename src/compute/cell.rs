//! Cell types for the smoke board.

use serde::{Deserialize, Serialize};

/// Layout byte that maps to cost 0.
pub const COST_BASE: u8 = b'0';

/// Cost reserved for walls.
pub const WALL_COST: i8 = -1;

/// Cost reserved for escape openings.
pub const ESCAPE_COST: i8 = 10;

/// What a cell does in the diffusion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Impermeable; never exchanges mass.
    Wall,
    /// Diffusing medium; the only kind whose density evolves.
    Floor,
    /// Fixed source at density 1.0.
    Emitter,
    /// Sink with unlimited capacity.
    Escape,
}

impl CellKind {
    /// Classify a cost: `<= -1` is a wall, `>= 10` an escape, anything else floor.
    #[inline]
    pub fn from_cost(cost: i16) -> Self {
        if cost <= WALL_COST as i16 {
            CellKind::Wall
        } else if cost >= ESCAPE_COST as i16 {
            CellKind::Escape
        } else {
            CellKind::Floor
        }
    }

    /// Whether a neighbor of this kind counts as an inflow source.
    #[inline]
    pub fn is_source(self) -> bool {
        match self {
            CellKind::Floor | CellKind::Emitter => true,
            CellKind::Wall | CellKind::Escape => false,
        }
    }

    /// Whether a neighbor of this kind counts as an outflow sink.
    #[inline]
    pub fn is_sink(self) -> bool {
        match self {
            CellKind::Floor | CellKind::Escape => true,
            CellKind::Wall | CellKind::Emitter => false,
        }
    }
}

/// Cardinal neighbor directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    /// Neighbor visiting order used by the update rule.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Apply a unit step to `(row, col)`. Returns `None` when the step would
    /// leave the non-negative quadrant; the upper bound is left to the grid.
    #[inline]
    pub fn offset(self, row: usize, col: usize) -> Option<(usize, usize)> {
        match self {
            Direction::North => Some((row.checked_sub(1)?, col)),
            Direction::South => Some((row.checked_add(1)?, col)),
            Direction::West => Some((row, col.checked_sub(1)?)),
            Direction::East => Some((row, col.checked_add(1)?)),
        }
    }
}

/// One board location.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub(crate) kind: CellKind,
    pub(crate) cost: i8,
    pub(crate) row: usize,
    pub(crate) col: usize,
    pub(crate) omega_in: f32,
    pub(crate) omega_out: f32,
    pub(crate) density: f32,
    pub(crate) intake: f32,
    pub(crate) outtake: f32,
}

impl Cell {
    /// Classify a layout byte at `(row, col)`.
    ///
    /// The cost is clamped to `[-1, 10]` so out-of-alphabet bytes still land on
    /// a wall or an escape.
    pub fn from_code(code: u8, row: usize, col: usize) -> Self {
        let raw = code as i16 - COST_BASE as i16;
        let kind = CellKind::from_cost(raw);
        let cost = raw.clamp(WALL_COST as i16, ESCAPE_COST as i16) as i8;
        Self {
            kind,
            cost,
            row,
            col,
            omega_in: 0.0,
            omega_out: 0.0,
            density: 0.0,
            intake: 0.0,
            outtake: 0.0,
        }
    }

    #[inline]
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Height for floor cells, -1 for walls, 10 for escapes.
    #[inline]
    pub fn cost(&self) -> i8 {
        self.cost
    }

    /// True when the cost is a floor height (0-9).
    #[inline]
    pub fn has_floor_cost(&self) -> bool {
        (0..=9).contains(&self.cost)
    }

    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    #[inline]
    pub fn col(&self) -> usize {
        self.col
    }

    /// Precomputed inflow weight (1 / number of source neighbors, or 0).
    #[inline]
    pub fn omega_in(&self) -> f32 {
        self.omega_in
    }

    /// Precomputed outflow weight (1 / number of sink neighbors, or 0).
    #[inline]
    pub fn omega_out(&self) -> f32 {
        self.omega_out
    }

    #[inline]
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Mass received during the last update touching this cell.
    #[inline]
    pub fn intake(&self) -> f32 {
        self.intake
    }

    /// Mass released during the last update touching this cell.
    #[inline]
    pub fn outtake(&self) -> f32 {
        self.outtake
    }
}

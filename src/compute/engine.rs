//! Smoke engine - run state, tick throttling and the diffusion rule.
//!
//! Each full board update walks the grid row-major. When the cell being
//! updated is floor, its four neighbors are visited in North, South, West,
//! East order and each exchange is written into the neighbor's scratch
//! fields before being folded into the current cell. Densities are updated
//! in place, so cells later in the scan see the new values of earlier cells.

use log::{debug, trace, warn};

use super::color::{density_lightness, emitter_tint, escape_tint};
use super::{Cell, CellKind, Direction, Grid, Rgba};
use crate::schema::{ApplyMode, EngineConfig};

/// Flat weight used when precalculated weights are disabled.
pub const FLAT_WEIGHT: f32 = 0.25;

/// Engine errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Emitter coordinates ({row}, {col}) out of bounds for a {width}x{height} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },
    #[error("Emitter not on floor tile at ({row}, {col}) (cost {cost})")]
    InvalidEmitterPlacement { row: usize, col: usize, cost: i8 },
    #[error("Unexpected missing cell in valid location ({row}, {col})")]
    MissingCell { row: usize, col: usize },
}

/// Run state of an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
    /// Transient state held for the duration of [`Engine::step`].
    SteppingOnce,
}

/// Rates and weight mode seen by one full board update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveConfig {
    pub emitter_rate: f32,
    pub escape_rate: f32,
    pub use_precalculated_weights: bool,
}

impl From<&EngineConfig> for EffectiveConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            emitter_rate: config.emitter_rate,
            escape_rate: config.escape_rate,
            use_precalculated_weights: config.use_precalculated_weights,
        }
    }
}

/// Inflow/outflow weights of one cell for the current update.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Weights {
    inflow: f32,
    outflow: f32,
}

impl Weights {
    #[inline]
    fn of(cell: &Cell, precalculated: bool) -> Self {
        if precalculated {
            Self {
                inflow: cell.omega_in,
                outflow: cell.omega_out,
            }
        } else {
            Self {
                inflow: FLAT_WEIGHT,
                outflow: FLAT_WEIGHT,
            }
        }
    }
}

/// Tick-driven smoke propagation engine.
///
/// Host usage, once per frame:
/// ```
/// use smoke_sim::compute::Engine;
///
/// let mut engine = Engine::new(3, 1, b"00:", 0, 0).unwrap();
/// engine.config.use_precalculated_weights = true;
/// engine.start();
/// for _ in 0..4 {
///     if engine.cycle().is_err() {
///         engine.stop();
///     }
/// }
/// assert_eq!(engine.ticks(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    grid: Grid,
    state: RunState,
    ticks: u64,
    /// Host-editable configuration.
    pub config: EngineConfig,
    /// Host frames left before the next update while running.
    frame_skip_counter: u32,
    /// Values latched after the previous update; `None` until the first cycle.
    effective: Option<EffectiveConfig>,
}

impl Engine {
    /// Build a board from layout codes and place the emitter.
    ///
    /// `codes` must hold `width * height` row-major layout bytes.
    ///
    /// # Panics
    ///
    /// Panics if `codes.len() != width * height`.
    pub fn new(
        width: usize,
        height: usize,
        codes: &[u8],
        emitter_row: usize,
        emitter_col: usize,
    ) -> Result<Self, EngineError> {
        Self::with_config(
            width,
            height,
            codes,
            emitter_row,
            emitter_col,
            EngineConfig::default(),
        )
    }

    /// Like [`Engine::new`] with an explicit configuration.
    ///
    /// # Panics
    ///
    /// Panics if `codes.len() != width * height`.
    pub fn with_config(
        width: usize,
        height: usize,
        codes: &[u8],
        emitter_row: usize,
        emitter_col: usize,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        if let Err(e) = config.validate() {
            warn!("Engine configuration out of range: {e}");
        }
        let mut grid = Grid::new(width, height, codes);

        let emitter = grid
            .cell_at_mut(emitter_row, emitter_col)
            .ok_or(EngineError::OutOfBounds {
                row: emitter_row,
                col: emitter_col,
                width,
                height,
            })?;
        if emitter.kind != CellKind::Floor || !emitter.has_floor_cost() {
            return Err(EngineError::InvalidEmitterPlacement {
                row: emitter_row,
                col: emitter_col,
                cost: emitter.cost,
            });
        }
        emitter.kind = CellKind::Emitter;
        emitter.density = 1.0;
        grid.write_color(emitter_row, emitter_col, Rgba::EMITTER);
        debug!("Placed emitter at ({emitter_row}, {emitter_col}) on a {width}x{height} grid");

        precompute_weights(&mut grid);

        Ok(Self {
            grid,
            state: RunState::Stopped,
            ticks: 0,
            config,
            frame_skip_counter: 0,
            effective: None,
        })
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn start(&mut self) {
        self.state = RunState::Running;
    }

    pub fn stop(&mut self) {
        self.state = RunState::Stopped;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Completed full board updates.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Configuration the next update will use in latched mode.
    pub fn effective_config(&self) -> EffectiveConfig {
        self.effective
            .unwrap_or_else(|| EffectiveConfig::from(&self.config))
    }

    /// Perform exactly one full board update and leave the engine stopped.
    pub fn step(&mut self) -> Result<(), EngineError> {
        self.step_observed(|_, _| {})
    }

    /// [`Engine::step`], reporting every floor cell's new density before it
    /// is clamped as `(index, density)`.
    pub(crate) fn step_observed(
        &mut self,
        observe: impl FnMut(usize, f32),
    ) -> Result<(), EngineError> {
        self.state = RunState::SteppingOnce;
        let result = self.cycle_observed(observe);
        self.state = RunState::Stopped;
        result
    }

    /// Advance by one host frame.
    ///
    /// Stopped: no-op. Running: counts down `tick_rate` frames, then updates
    /// the board. Stepping: updates the board unconditionally.
    pub fn cycle(&mut self) -> Result<(), EngineError> {
        self.cycle_observed(|_, _| {})
    }

    fn cycle_observed(&mut self, observe: impl FnMut(usize, f32)) -> Result<(), EngineError> {
        let latched = self.prime();

        match self.state {
            RunState::Stopped => return Ok(()),
            RunState::Running => {
                self.frame_skip_counter = self.frame_skip_counter.saturating_sub(1);
                if self.frame_skip_counter != 0 {
                    return Ok(());
                }
            }
            RunState::SteppingOnce => {}
        }

        let effective = match self.config.apply {
            ApplyMode::Latched => latched,
            ApplyMode::Immediate => EffectiveConfig::from(&self.config),
        };
        self.update_board(effective, observe)?;

        self.ticks += 1;
        if self.state == RunState::Running {
            self.frame_skip_counter = self.config.frame_skip();
        }
        self.effective = Some(EffectiveConfig::from(&self.config));
        trace!("Tick {} complete", self.ticks);
        Ok(())
    }

    /// Set the density of a floor cell, clamped to `[0, 1]`, and refresh its
    /// color. Returns `false` if `(row, col)` is not a floor cell.
    pub fn seed_floor(&mut self, row: usize, col: usize, density: f32) -> bool {
        let Some(cell) = self.grid.cell_at_mut(row, col) else {
            return false;
        };
        if cell.kind != CellKind::Floor {
            return false;
        }
        cell.density = density.clamp(0.0, 1.0);
        let l = density_lightness(cell.density);
        self.grid.write_pixel(row, col, l, l, l);
        true
    }

    /// Latch the configuration and frame-skip counter on the first call.
    fn prime(&mut self) -> EffectiveConfig {
        if let Some(effective) = self.effective {
            return effective;
        }
        let effective = EffectiveConfig::from(&self.config);
        self.frame_skip_counter = self.config.frame_skip();
        self.effective = Some(effective);
        effective
    }

    fn update_board(
        &mut self,
        fx: EffectiveConfig,
        mut observe: impl FnMut(usize, f32),
    ) -> Result<(), EngineError> {
        for row in 0..self.grid.height() {
            for col in 0..self.grid.width() {
                let idx = self
                    .grid
                    .index_of(row, col)
                    .filter(|&idx| idx < self.grid.cells.len())
                    .ok_or(EngineError::MissingCell { row, col })?;

                let cur = &mut self.grid.cells[idx];
                let weights = Weights::of(cur, fx.use_precalculated_weights);
                cur.intake = 0.0;
                cur.outtake = 0.0;
                let kind = cur.kind;

                match kind {
                    CellKind::Wall => {}
                    CellKind::Floor => {
                        let raw = self.update_floor(idx, row, col, weights, fx);
                        observe(idx, raw);
                    }
                    CellKind::Emitter => {
                        self.grid.set_pixel(idx, emitter_tint(fx.emitter_rate));
                    }
                    CellKind::Escape => {
                        self.grid.set_pixel(idx, escape_tint(fx.escape_rate));
                    }
                }
            }
        }
        Ok(())
    }

    fn update_floor(
        &mut self,
        idx: usize,
        row: usize,
        col: usize,
        cur_w: Weights,
        fx: EffectiveConfig,
    ) -> f32 {
        let cur_density = self.grid.cells[idx].density;
        let mut intake = 0.0f32;
        let mut outtake = 0.0f32;

        for dir in Direction::ALL {
            let Some(adj_idx) = self.grid.neighbor_index(dir, row, col) else {
                continue;
            };
            let adj = &mut self.grid.cells[adj_idx];
            let adj_w = Weights::of(adj, fx.use_precalculated_weights);
            adj.intake = 0.0;
            adj.outtake = 0.0;

            match adj.kind {
                CellKind::Wall => {}
                CellKind::Floor => {
                    adj.intake =
                        (cur_w.outflow * cur_density).min(adj_w.inflow * (1.0 - adj.density));
                    adj.outtake =
                        (adj_w.outflow * adj.density).min(cur_w.inflow * (1.0 - cur_density));
                }
                CellKind::Emitter => {
                    adj.outtake = fx.emitter_rate
                        * (adj_w.outflow * adj.density).min(cur_w.inflow * (1.0 - cur_density));
                }
                CellKind::Escape => {
                    adj.intake = fx.escape_rate * cur_w.outflow * cur_density;
                }
            }

            intake += adj.outtake;
            outtake += adj.intake;
        }

        let cur = &mut self.grid.cells[idx];
        cur.intake = intake;
        cur.outtake = outtake;
        // Capacity caps keep this in [0, 1]; the clamp only absorbs rounding.
        let raw = cur.density + (intake - outtake);
        cur.density = raw.clamp(0.0, 1.0);
        let l = density_lightness(cur.density);
        self.grid.set_pixel(idx, Rgba::gray(l));
        raw
    }
}

/// Count source and sink neighbors of every cell and store `1/count` weights.
fn precompute_weights(grid: &mut Grid) {
    let mut sources_total = 0usize;

    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let (mut ins, mut outs) = (0u16, 0u16);
            for dir in Direction::ALL {
                let Some(adj) = grid.neighbor(dir, row, col) else {
                    continue;
                };
                ins += u16::from(adj.kind.is_source());
                outs += u16::from(adj.kind.is_sink());
            }
            sources_total += usize::from(ins);

            if let Some(cur) = grid.cell_at_mut(row, col) {
                cur.omega_in = if ins == 0 { 0.0 } else { 1.0 / f32::from(ins) };
                cur.omega_out = if outs == 0 { 0.0 } else { 1.0 / f32::from(outs) };
            }
        }
    }

    debug!(
        "Precomputed weights for {}x{} grid ({} source links)",
        grid.width(),
        grid.height(),
        sources_total
    );
}

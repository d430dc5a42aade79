//! Headless host loop around an [`Engine`].
//!
//! A [`Session`] holds at most one engine at a time and drives it once per
//! host frame: it turns engine errors into a stopped run plus a status line,
//! and can stop the run after a number of frames (a breakpoint).

use std::path::Path;

use log::{info, warn};

use crate::compute::{Engine, EngineError};
use crate::schema::{EngineConfig, Layout, LayoutError};

pub const STATUS_READY: &str = "Ready.";
pub const STATUS_INITIALIZED: &str = "Simulation initialized.";
pub const STATUS_RUNNING: &str = "Simulation running.";
pub const STATUS_STOPPED: &str = "Simulation stopped.";
pub const STATUS_BREAKPOINT: &str = "Breakpoint reached.";

/// Errors from starting a new simulation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone)]
pub struct Session {
    engine: Option<Engine>,
    status: String,
    breakpoint: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            engine: None,
            status: STATUS_READY.to_string(),
            breakpoint: 0,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current run with a new engine over `layout`.
    ///
    /// On failure the session is left without an engine and the error text
    /// becomes the status.
    pub fn new_simulation(
        &mut self,
        layout: &Layout,
        emitter_row: usize,
        emitter_col: usize,
        config: EngineConfig,
    ) -> Result<(), EngineError> {
        self.engine = None;
        let result = Engine::with_config(
            layout.cols,
            layout.rows,
            layout.codes(),
            emitter_row,
            emitter_col,
            config,
        );
        match result {
            Ok(engine) => {
                info!(
                    "New {}x{} simulation with emitter at ({emitter_row}, {emitter_col})",
                    layout.cols, layout.rows
                );
                self.engine = Some(engine);
                self.status = STATUS_INITIALIZED.to_string();
                Ok(())
            }
            Err(e) => {
                warn!("Simulation not created: {e}");
                self.status = e.to_string();
                Err(e)
            }
        }
    }

    /// Load a layout file and start a new simulation over it.
    pub fn load_simulation<P: AsRef<Path>>(
        &mut self,
        path: P,
        emitter_row: usize,
        emitter_col: usize,
        config: EngineConfig,
    ) -> Result<(), SessionError> {
        self.engine = None;
        let layout = Layout::load(path).inspect_err(|e| {
            warn!("Layout not loaded: {e}");
            self.status = e.to_string();
        })?;
        self.new_simulation(&layout, emitter_row, emitter_col, config)?;
        Ok(())
    }

    #[inline]
    pub fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    #[inline]
    pub fn engine_mut(&mut self) -> Option<&mut Engine> {
        self.engine.as_mut()
    }

    #[inline]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Frames left before the run is stopped; 0 disables the breakpoint.
    #[inline]
    pub fn breakpoint(&self) -> u64 {
        self.breakpoint
    }

    /// Negative values disable the breakpoint.
    pub fn set_breakpoint(&mut self, frames: i64) {
        self.breakpoint = u64::try_from(frames).unwrap_or(0);
    }

    pub fn start(&mut self) {
        if let Some(engine) = &mut self.engine {
            engine.start();
            self.status = STATUS_RUNNING.to_string();
            info!("{STATUS_RUNNING}");
        }
    }

    pub fn stop(&mut self) {
        if let Some(engine) = &mut self.engine {
            engine.stop();
            self.status = STATUS_STOPPED.to_string();
            info!("{STATUS_STOPPED}");
        }
    }

    /// Single-step the engine. A failing step becomes the status.
    pub fn step(&mut self) {
        if let Some(engine) = &mut self.engine {
            if let Err(e) = engine.step() {
                warn!("Step failed: {e}");
                self.status = e.to_string();
            }
        }
    }

    /// Run one host frame. Returns `true` if this frame ran while the engine
    /// was running and the board should be redrawn, including the frame on
    /// which a breakpoint stops the run.
    pub fn frame(&mut self) -> bool {
        let Some(engine) = &mut self.engine else {
            return false;
        };

        if let Err(e) = engine.cycle() {
            warn!("Cycle failed, stopping: {e}");
            engine.stop();
            self.status = e.to_string();
        }

        if !engine.is_running() {
            return false;
        }

        if self.breakpoint > 0 {
            self.breakpoint -= 1;
            if self.breakpoint == 0 {
                engine.stop();
                self.status = STATUS_BREAKPOINT.to_string();
                info!("{STATUS_BREAKPOINT} at tick {}", engine.ticks());
            }
        }
        true
    }
}

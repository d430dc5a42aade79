//! Smoke propagation simulation using cellular automata.
//!
//! A rectangular board of walls, floor, one emitter and escape openings is
//! advanced in discrete ticks. Every tick, floor cells exchange smoke with
//! their four neighbors, limited by what the sender holds and what the
//! receiver can still take. The emitter pushes smoke in at full density and
//! escape openings drain it.
//!
//! # Architecture
//!
//! - `schema`: Engine configuration and layout loading
//! - `compute`: Cells, the grid and the engine driving the update rule
//! - `session`: A headless host loop with breakpoints and status reporting
//!
//! # Example
//!
//! ```rust
//! use smoke_sim::{
//!     compute::{Engine, SimulationStats},
//!     schema::Layout,
//! };
//!
//! let layout = Layout::parse("/////\n/000:\n/////\n").unwrap();
//! let mut engine = layout.engine(1, 1).unwrap();
//! engine.config.use_precalculated_weights = true;
//!
//! engine.start();
//! for _ in 0..10 {
//!     engine.cycle().unwrap();
//! }
//!
//! let stats = SimulationStats::from_grid(engine.grid());
//! println!("Smoke on the floor after {} ticks: {}", engine.ticks(), stats.total_density);
//! ```

pub mod compute;
pub mod schema;
pub mod session;

// Re-export commonly used types
pub use compute::{Engine, EngineError, Grid, SimulationStats};
pub use schema::{EngineConfig, Layout};
pub use session::Session;

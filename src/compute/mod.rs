//! Compute module - Board state and the smoke diffusion engine.

mod cell;
pub mod color;
mod engine;
mod grid;
mod stats;

#[cfg(test)]
mod invariants;

pub use cell::*;
pub use color::Rgba;
pub use engine::*;
pub use grid::*;
pub use stats::*;

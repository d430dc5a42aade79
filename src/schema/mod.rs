//! Schema module - Configuration and layout types for smoke simulations.

mod config;
mod layout;

pub use config::*;
pub use layout::*;

//! Dataset construction: the shared analysis context and synthetic series.

pub mod context;
pub mod synthetic;

pub use context::DatasetContext;
pub use synthetic::{Regime, SynthConfig, generate_levels};

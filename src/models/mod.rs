//! Line model used by the sampler/scorer.
//!
//! Kept as small, pure functions so the scoring code can stay generic.

pub mod line;

pub use line::*;

//! Line-fit orchestration.
//!
//! Responsibilities:
//!
//! - compose random + seeded sample pairs
//! - fit and score each candidate line (parallel)
//! - detect power peaks and suppress overlapping ones
//! - fit the naive daily-mean baseline

pub mod baseline;
pub mod overlap;
pub mod peaks;
pub mod sampling;
pub mod scorer;
pub mod selection;

pub use baseline::*;
pub use overlap::*;
pub use peaks::*;
pub use sampling::*;
pub use scorer::*;
pub use selection::*;

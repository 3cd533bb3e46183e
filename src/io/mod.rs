//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - candidate / series exports (CSV) (`export`)
//! - segments JSON read/write (`segments`)

pub mod export;
pub mod ingest;
pub mod segments;

pub use export::*;
pub use ingest::*;
pub use segments::*;

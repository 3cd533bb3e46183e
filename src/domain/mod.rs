//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - observations (`Point`) and how their time axis is interpreted (`TimeKind`)
//! - sampling records (`SamplePair`, `SampleOrigin`)
//! - fitted/scored outputs (`CandidateLine`, `ScoredCandidate`, `Peak`, `Overlap`)
//! - run configuration (`LineFitParams`, `FitConfig`) and the saved `SegmentsFile`

pub mod types;

pub use types::*;

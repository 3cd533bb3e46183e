//! `line-votes` library crate.
//!
//! Finds the linear stretches of a noisy time series by letting the points
//! vote for randomly sampled candidate lines.
//!
//! The binary (`lv`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (notebooks, services, other front-ends)

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;

//! Mathematical utilities.

pub mod ols;

pub use ols::*;

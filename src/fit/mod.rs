//! Peak model fitting.
//!
//! Responsibilities:
//!
//! - generate breakpoint candidates for the piecewise model
//! - fit the two peak model shapes by exact least squares (parallel scan)
//! - derive prediction bands around each fitted curve

pub mod breakpoints;
pub mod interval;
pub mod models;

pub use breakpoints::*;
pub use interval::*;
pub use models::*;

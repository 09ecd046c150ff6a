//! `mi-lag` library crate.
//!
//! The binary (`milag`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future GUI/daemon, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod entropy;
pub mod error;
pub mod fit;
pub mod io;
pub mod lag;
pub mod math;
pub mod mi;
pub mod plot;
pub mod report;

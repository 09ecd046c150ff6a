//! Built-in data sources.
//!
//! - seeded demonstration signal pair (`demo`)

pub mod demo;

pub use demo::*;

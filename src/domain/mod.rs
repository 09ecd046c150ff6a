//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - run configuration (`ProfileConfig`, `MissingDataPolicy`, `EntropyBins`)
//! - peak model descriptors (`PeakModelKind`)
//! - result records (`ProfileOutput`, `ModelReport`, `FitSummary`)

pub mod types;

pub use types::*;

//! Mutual information estimation: the KSG estimator, AAFT surrogates, and the
//! per-lag profile built from both.

pub mod knn;
pub mod profiler;
pub mod surrogate;

pub use knn::{DEFAULT_K, estimate_bits};
pub use profiler::{MiProfile, profile};
pub use surrogate::aaft_surrogate;

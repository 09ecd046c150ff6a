//! Discretized Shannon entropy as an interpretability bound on MI.
//!
//! MI between two variables cannot coherently exceed the entropy of either
//! one, so the minimum entropy across the trimmed series and every lag
//! column gives a rough ceiling against which a profile peak can be judged.

use crate::domain::EntropyBins;
use crate::lag::LagMatrix;

/// Bin count used when the front-end builds edges from the data itself.
pub const DEFAULT_BINS: usize = 20;

/// Shannon entropy in bits of `values` discretized over ascending `edges`.
///
/// Probability mass is count over the number of in-range samples. Samples
/// outside the edges are ignored; empty bins contribute nothing; no in-range
/// samples at all gives 0 bits.
pub fn histogram_entropy_bits(values: &[f64], edges: &[f64]) -> f64 {
    debug_assert!(edges.len() >= 2);
    let mut counts = vec![0usize; edges.len() - 1];
    let mut total = 0usize;
    for &v in values {
        if let Some(bin) = bin_index(edges, v) {
            counts[bin] += 1;
            total += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

/// Minimum entropy across the trimmed series (under `edges_a`) and every lag
/// column (under `edges_b`).
pub fn min_entropy_bits(matrix: &LagMatrix, bins: &EntropyBins) -> f64 {
    let mut min = histogram_entropy_bits(&matrix.trimmed_a, &bins.edges_a);
    for column in &matrix.columns {
        let h = histogram_entropy_bits(column, &bins.edges_b);
        if h < min {
            min = h;
        }
    }
    min
}

/// Equal-width edges spanning the finite values of `values`, used by the
/// front-end when no explicit edges are supplied. Degenerate spans (constant
/// or empty series) fall back to the conventional [-10, 10] window.
pub fn spanning_edges(values: &[f64], bins: usize) -> Vec<f64> {
    debug_assert!(bins >= 1);
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        if !v.is_finite() {
            continue;
        }
        if v < lo {
            lo = v;
        }
        if v > hi {
            hi = v;
        }
    }
    if !(lo < hi) {
        lo = -10.0;
        hi = 10.0;
    }

    let step = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| lo + step * i as f64).collect();
    // Pin the last edge so the maximum sample is never dropped to rounding.
    edges[bins] = hi;
    edges
}

/// Bin index for `v`, or `None` when it falls outside the edges. The final
/// right edge is closed so the maximum is kept.
fn bin_index(edges: &[f64], v: f64) -> Option<usize> {
    let last = edges.len() - 1;
    if v.is_nan() || v < edges[0] || v > edges[last] {
        return None;
    }
    if v == edges[last] {
        return Some(last - 1);
    }
    Some(edges.partition_point(|&e| e <= v) - 1)
}

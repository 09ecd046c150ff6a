//! Nearest-neighbor mutual information estimator (Kraskov / KSG, algorithm 1).
//!
//! For continuous samples the estimator avoids binning entirely: for each
//! point it finds the distance to its k-th nearest neighbor in the joint
//! space under the max norm, counts how many marginal neighbors fall strictly
//! inside that distance, and combines the counts through the digamma
//! function:
//!
//! ```text
//! I = ψ(k) + ψ(N) - ⟨ψ(n_x + 1) + ψ(n_y + 1)⟩
//! ```
//!
//! Exact ties in either coordinate bias the counts, so both inputs get a tiny
//! seeded Gaussian jitter first. The jitter is the only source of randomness
//! here; a fixed seed reproduces the estimate bit for bit.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::math::digamma;

/// Neighbor count used by the profiler. Small k keeps bias low at the cost of
/// variance, which the per-lag averaging in the profile tolerates well.
pub const DEFAULT_K: usize = 3;

/// Estimate `I(x; y)` in bits.
///
/// Returns 0 when there are not enough samples for `k` neighbors. The
/// estimate is clamped at zero; the raw KSG value can dip slightly negative
/// for independent inputs.
pub fn estimate_bits(x: &[f64], y: &[f64], k: usize, seed: u64) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    debug_assert!(k >= 1);

    let n = x.len();
    if n <= k {
        return 0.0;
    }

    let (jx, jy) = jitter_pair(x, y, seed);
    let nats = ksg_nats(&jx, &jy, k);
    (nats * std::f64::consts::LOG2_E).max(0.0)
}

/// Add tie-breaking noise to both series from a single seeded stream.
///
/// Scale follows the usual convention of 1e-10 times the mean magnitude
/// (floored at 1), far below any real signal structure.
fn jitter_pair(x: &[f64], y: &[f64], seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let jx = jitter(x, &mut rng);
    let jy = jitter(y, &mut rng);
    (jx, jy)
}

fn jitter(values: &[f64], rng: &mut StdRng) -> Vec<f64> {
    let mean_abs = values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64;
    let scale = 1e-10 * mean_abs.max(1.0);
    values
        .iter()
        .map(|&v| v + scale * rng.sample::<f64, _>(StandardNormal))
        .collect()
}

fn ksg_nats(x: &[f64], y: &[f64], k: usize) -> f64 {
    let n = x.len();

    // Distance to the k-th nearest joint neighbor, max norm, per point.
    let mut eps = vec![0.0f64; n];
    let mut dists = Vec::with_capacity(n - 1);
    for i in 0..n {
        dists.clear();
        for j in 0..n {
            if j != i {
                dists.push((x[i] - x[j]).abs().max((y[i] - y[j]).abs()));
            }
        }
        let (_, kth, _) = dists.select_nth_unstable_by(k - 1, |a, b| a.total_cmp(b));
        eps[i] = *kth;
    }

    // Marginal neighbor counts use strict inequality against eps, which the
    // sorted projections answer with two binary searches per point.
    let mut sorted_x = x.to_vec();
    sorted_x.sort_unstable_by(f64::total_cmp);
    let mut sorted_y = y.to_vec();
    sorted_y.sort_unstable_by(f64::total_cmp);

    let mut psi_sum = 0.0;
    for i in 0..n {
        let nx = count_strictly_within(&sorted_x, x[i], eps[i]);
        let ny = count_strictly_within(&sorted_y, y[i], eps[i]);
        psi_sum += digamma(nx as f64 + 1.0) + digamma(ny as f64 + 1.0);
    }

    digamma(k as f64) + digamma(n as f64) - psi_sum / n as f64
}

/// Number of samples with `|v - center| < eps`, excluding the center itself.
fn count_strictly_within(sorted: &[f64], center: f64, eps: f64) -> usize {
    let lo = sorted.partition_point(|&v| v <= center - eps);
    let hi = sorted.partition_point(|&v| v < center + eps);
    (hi - lo).saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise_series(seed: u64, n: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
    }

    #[test]
    fn linear_dependence_scores_high() {
        let x: Vec<f64> = (0..200).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();
        let mi = estimate_bits(&x, &y, DEFAULT_K, 7);
        assert!(mi > 2.0, "expected strong dependence, got {mi}");
    }

    #[test]
    fn independent_noise_scores_near_zero() {
        let x = noise_series(1, 300);
        let y = noise_series(2, 300);
        let independent = estimate_bits(&x, &y, DEFAULT_K, 7);
        let dependent = estimate_bits(&x, &x, DEFAULT_K, 7);

        assert!(independent >= 0.0);
        assert!(independent < 0.5, "independent MI too high: {independent}");
        assert!(independent < dependent);
    }

    #[test]
    fn same_seed_reproduces_bit_for_bit() {
        let x = noise_series(3, 150);
        let y = noise_series(4, 150);
        let first = estimate_bits(&x, &y, DEFAULT_K, 42);
        let second = estimate_bits(&x, &y, DEFAULT_K, 42);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn too_few_samples_yield_zero() {
        let x = vec![1.0, 2.0];
        let y = vec![3.0, 4.0];
        assert_eq!(estimate_bits(&x, &y, DEFAULT_K, 0), 0.0);
    }

    #[test]
    fn strict_count_excludes_center_and_boundary() {
        let sorted = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        // Around 2.0 with eps 2: strictly inside is (0, 4) -> {1, 2, 3},
        // minus the center leaves 2.
        assert_eq!(count_strictly_within(&sorted, 2.0, 2.0), 2);
        // eps small enough that only the center is inside.
        assert_eq!(count_strictly_within(&sorted, 2.0, 0.5), 0);
    }
}

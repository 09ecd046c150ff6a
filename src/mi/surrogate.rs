//! Amplitude-adjusted phase-randomized (AAFT) surrogates.
//!
//! A surrogate keeps the amplitude distribution of the input exactly and its
//! power spectrum approximately, while scrambling the phases that carry the
//! actual temporal structure. Profiling against a surrogate therefore shows
//! the MI level expected when no real lag relationship exists.
//!
//! The construction is the classic three-step AAFT:
//!
//! 1. draw a Gaussian series and reorder it to match the ranks of the input
//! 2. randomize the phases of that Gaussian series in the frequency domain
//! 3. reorder the *original* values to match the ranks of the randomized
//!    series
//!
//! Step 3 guarantees the output is a permutation of the input samples.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

/// Generate the AAFT surrogate of `series`. Deterministic for a fixed seed.
pub fn aaft_surrogate(series: &[f64], seed: u64) -> Vec<f64> {
    let n = series.len();
    if n < 2 {
        return series.to_vec();
    }

    let mut rng = StdRng::seed_from_u64(seed);

    // Rank-matched Gaussian stand-in for the input.
    let mut gaussian: Vec<f64> = (0..n).map(|_| rng.sample(StandardNormal)).collect();
    gaussian.sort_unstable_by(f64::total_cmp);
    let mut matched = vec![0.0; n];
    for (rank, &idx) in sort_order(series).iter().enumerate() {
        matched[idx] = gaussian[rank];
    }

    let randomized = phase_randomize(&matched, &mut rng);

    // Re-emit the original amplitudes in the randomized rank order.
    let mut sorted_values = series.to_vec();
    sorted_values.sort_unstable_by(f64::total_cmp);
    let mut surrogate = vec![0.0; n];
    for (rank, &idx) in sort_order(&randomized).iter().enumerate() {
        surrogate[idx] = sorted_values[rank];
    }
    surrogate
}

/// Indices that would sort `values` ascending. Stable, so equal values keep
/// their input order.
fn sort_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}

/// Rotate every positive-frequency bin by a random phase, mirroring the
/// conjugate onto the matching negative bin so the inverse transform stays
/// real. DC (and Nyquist for even lengths) keep their phase.
fn phase_randomize(values: &[f64], rng: &mut StdRng) -> Vec<f64> {
    let n = values.len();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    let ifft = planner.plan_fft_inverse(n);

    let mut buf: Vec<Complex<f64>> = values.iter().map(|&v| Complex::new(v, 0.0)).collect();
    fft.process(&mut buf);

    for j in 1..(n + 1) / 2 {
        let phase = rng.gen_range(0.0..std::f64::consts::TAU);
        buf[j] *= Complex::from_polar(1.0, phase);
        buf[n - j] = buf[j].conj();
    }

    ifft.process(&mut buf);
    // rustfft leaves the inverse unnormalized.
    buf.into_iter().map(|c| c.re / n as f64).collect()
}

//! Formatted terminal output for a profiling run.
//!
//! We keep formatting code in one place so:
//! - the estimation/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{ModelReport, ProfileOutput};

/// Format the full run summary (profile stats + both peak fits).
pub fn format_run_summary(output: &ProfileOutput) -> String {
    let mut out = String::new();

    out.push_str("=== milag - Lagged Mutual Information Profile ===\n");
    if let (Some(first), Some(last)) = (output.lags.first(), output.lags.last()) {
        out.push_str(&format!(
            "Lags: [{first}, {last}] ({} points)\n",
            output.lags.len()
        ));
    }
    out.push_str(&format!(
        "Rows: used={} dropped={}\n",
        output.rows_used, output.rows_dropped
    ));
    out.push_str(&format!("MI stage: {} ms\n", output.elapsed_ms));

    if let Some((lag, value)) = peak_entry(&output.lags, &output.mi) {
        out.push_str(&format!("Raw MI peak: {value:.3} bits at lag {lag}\n"));
    }
    if !output.surrogate_mi.is_empty() {
        let mean = output.surrogate_mi.iter().sum::<f64>() / output.surrogate_mi.len() as f64;
        let max = output.surrogate_mi.iter().fold(0.0_f64, |a, &v| a.max(v));
        out.push_str(&format!(
            "Surrogate floor: mean {mean:.3} bits, max {max:.3} bits\n"
        ));
    }
    if let Some(bound) = output.min_entropy {
        out.push_str(&format!("Entropy bound: min {bound:.3} bits\n"));
    }

    let confidence_pct = output.quadratic.band.confidence * 100.0;
    out.push_str(&format!("\nPeak models ({confidence_pct:.0}% band):\n"));

    let quad_rms = output.quadratic.summary.rms;
    let piece_rms = output.piecewise.summary.rms;
    for report in [&output.quadratic, &output.piecewise] {
        let chosen = if report.summary.rms <= quad_rms.min(piece_rms) {
            "*"
        } else {
            " "
        };
        out.push_str(&format!(
            "{chosen} {:<17} peak={:.3} bits at lag {:<5} rms={:.6}  \u{00b1}{:.4}\n",
            report.summary.model.display_name(),
            report.summary.peak_value,
            report.summary.peak_lag,
            report.summary.rms,
            band_half_width(report),
        ));
    }
    for report in [&output.quadratic, &output.piecewise] {
        out.push_str(&format!(
            "  params {:<17}: {}\n",
            report.summary.model.display_name(),
            fmt_vec(&report.summary.params)
        ));
    }

    out
}

/// Lag and value of the profile maximum; ties go to the earliest lag.
fn peak_entry(lags: &[i64], values: &[f64]) -> Option<(i64, f64)> {
    let mut best: Option<(i64, f64)> = None;
    for (&lag, &value) in lags.iter().zip(values) {
        match best {
            Some((_, held)) if value <= held => {}
            _ => best = Some((lag, value)),
        }
    }
    best
}

fn band_half_width(report: &ModelReport) -> f64 {
    match (report.band.upper.first(), report.band.fitted.first()) {
        (Some(hi), Some(fit)) => hi - fit,
        _ => 0.0,
    }
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitSummary, PeakModelKind, PredictionBand};

    fn report(model: PeakModelKind, rms: f64, peak_lag: i64) -> ModelReport {
        let n = 5;
        ModelReport {
            summary: FitSummary {
                model,
                params: vec![0.5, 1.5],
                peak_lag,
                peak_value: 2.0,
                rms,
            },
            band: PredictionBand {
                confidence: 0.80,
                lower: vec![0.9; n],
                fitted: vec![1.0; n],
                upper: vec![1.1; n],
            },
        }
    }

    fn output() -> ProfileOutput {
        ProfileOutput {
            lags: vec![-2, -1, 0, 1, 2],
            mi: vec![0.1, 0.4, 0.9, 0.5, 0.2],
            surrogate_mi: vec![0.05; 5],
            quadratic: report(PeakModelKind::Quadratic, 0.02, 0),
            piecewise: report(PeakModelKind::PiecewiseLinear, 0.01, 1),
            min_entropy: Some(2.5),
            rows_used: 50,
            rows_dropped: 2,
            elapsed_ms: 7,
        }
    }

    #[test]
    fn summary_reports_peak_floor_and_bound() {
        let text = format_run_summary(&output());

        assert!(text.contains("Raw MI peak: 0.900 bits at lag 0"));
        assert!(text.contains("Surrogate floor: mean 0.050 bits"));
        assert!(text.contains("Entropy bound: min 2.500 bits"));
        assert!(text.contains("Rows: used=50 dropped=2"));
        assert!(text.contains("(80% band)"));
    }

    #[test]
    fn lower_rms_model_carries_the_marker() {
        let text = format_run_summary(&output());

        let quad_line = text
            .lines()
            .find(|l| l.contains("quadratic") && l.contains("peak="))
            .unwrap();
        let piece_line = text
            .lines()
            .find(|l| l.contains("piecewise-linear") && l.contains("peak="))
            .unwrap();
        assert!(piece_line.starts_with('*'), "line: {piece_line}");
        assert!(quad_line.starts_with(' '), "line: {quad_line}");
    }

    #[test]
    fn entropy_line_is_omitted_when_disabled() {
        let mut out = output();
        out.min_entropy = None;
        let text = format_run_summary(&out);
        assert!(!text.contains("Entropy bound"));
    }

    #[test]
    fn peak_ties_resolve_to_the_earliest_lag() {
        let lags = [-1, 0, 1];
        let values = [0.3, 0.7, 0.7];
        assert_eq!(peak_entry(&lags, &values), Some((0, 0.7)));
    }
}

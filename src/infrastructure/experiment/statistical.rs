//! Statistical analysis functions for A/B testing
//!
//! Latency significance between experiment groups using Welch's t-test.

use crate::domain::experiment::LatencyComparison;

/// Mean of a sample, 0.0 when empty
pub fn mean(sample: &[f64]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    sample.iter().sum::<f64>() / sample.len() as f64
}

/// Sample variance (n-1 denominator), 0.0 below two samples
pub fn variance(sample: &[f64]) -> f64 {
    if sample.len() < 2 {
        return 0.0;
    }

    let m = mean(sample);
    sample.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (sample.len() as f64 - 1.0)
}

/// Sample standard deviation
pub fn std_dev(sample: &[f64]) -> f64 {
    variance(sample).sqrt()
}

/// Two-tailed p-value of Welch's t-test for two independent samples.
///
/// Returns `None` when either sample has fewer than two elements or both
/// have zero variance.
pub fn welch_t_test(baseline: &[f64], candidate: &[f64]) -> Option<f64> {
    if baseline.len() < 2 || candidate.len() < 2 {
        return None;
    }

    let n1 = baseline.len() as f64;
    let n2 = candidate.len() as f64;
    let se1 = variance(baseline) / n1;
    let se2 = variance(candidate) / n2;
    let se = (se1 + se2).sqrt();

    if se == 0.0 {
        return None;
    }

    let t = (mean(baseline) - mean(candidate)) / se;

    // Welch-Satterthwaite degrees of freedom
    let df_denom = se1.powi(2) / (n1 - 1.0) + se2.powi(2) / (n2 - 1.0);

    if df_denom == 0.0 {
        return None;
    }

    let df = (se1 + se2).powi(2) / df_denom;

    Some(two_tailed_p_value(t.abs(), df))
}

/// Compare a group's latency samples against the baseline group.
///
/// `None` when [`welch_t_test`] cannot be computed.
pub fn compare_latencies(
    baseline_samples: &[f64],
    group_samples: &[f64],
    baseline_group: &str,
    group: &str,
    confidence_level: f64,
) -> Option<LatencyComparison> {
    let p_value = welch_t_test(baseline_samples, group_samples)?;

    Some(LatencyComparison::new(
        baseline_group,
        group,
        p_value,
        confidence_level,
        mean(baseline_samples),
        mean(group_samples),
    ))
}

/// Normal approximation of the t distribution, corrected for small df
fn two_tailed_p_value(t: f64, df: f64) -> f64 {
    let z = if df > 30.0 {
        t
    } else {
        t * (1.0 - 1.0 / (4.0 * df)).sqrt()
    };

    (2.0 * (1.0 - normal_cdf(z))).clamp(0.0, 1.0)
}

fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Abramowitz-Stegun 7.1.26, max error 1.5e-7
fn erf(x: f64) -> f64 {
    const A: [f64; 5] = [
        0.254829592,
        -0.284496736,
        1.421413741,
        -1.453152027,
        1.061405429,
    ];
    const P: f64 = 0.3275911;

    let sign = x.signum();
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let poly = A.iter().rev().fold(0.0, |acc, a| acc * t + a) * t;

    sign * (1.0 - poly * (-x * x).exp())
}

/// Small NaN-aware statistics used by the detector and classifier
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SkewnessConvention {
    /// Moment ratio m3 / m2^1.5
    #[default]
    Population,
    /// Adjusted Fisher-Pearson G1 (what pandas `Series.skew` reports)
    Sample,
}

/// Arithmetic mean, NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Quantile `q` in [0, 1] with linear interpolation between closest ranks.
/// NaNs are skipped; returns None when nothing finite is left.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Skewness of `values`. Zero variance gives 0; too few values gives NaN.
pub fn skewness(values: &[f64], convention: SkewnessConvention) -> f64 {
    let n = values.len();
    let min_len = match convention {
        SkewnessConvention::Population => 1,
        SkewnessConvention::Sample => 3,
    };
    if n < min_len {
        return f64::NAN;
    }

    let m = mean(values);
    let (m2, m3) = values.iter().fold((0.0, 0.0), |(m2, m3), &v| {
        let d = v - m;
        (m2 + d * d, m3 + d * d * d)
    });
    let m2 = m2 / n as f64;
    let m3 = m3 / n as f64;

    // relative guard so float noise on constant input does not read as skew
    if m2 <= f64::EPSILON * m.abs().max(1.0).powi(2) {
        return 0.0;
    }

    let g1 = m3 / m2.powf(1.5);
    match convention {
        SkewnessConvention::Population => g1,
        SkewnessConvention::Sample => {
            let n = n as f64;
            g1 * (n * (n - 1.0)).sqrt() / (n - 2.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_percentile_interpolates_linearly() {
        let values = [1.307, 10.7, 50.56];
        assert_abs_diff_eq!(percentile(&values, 0.5).unwrap(), 10.7, epsilon = 1e-12);
        assert_abs_diff_eq!(
            percentile(&values, 0.99).unwrap(),
            10.7 + 0.98 * (50.56 - 10.7),
            epsilon = 1e-9
        );
        assert_eq!(percentile(&values, 1.0).unwrap(), 50.56);
        assert_eq!(percentile(&values, 0.0).unwrap(), 1.307);
    }

    #[test]
    fn test_percentile_skips_nan() {
        let values = [f64::NAN, 4.0, 2.0, f64::NAN];
        assert_abs_diff_eq!(percentile(&values, 0.5).unwrap(), 3.0, epsilon = 1e-12);
        assert_eq!(percentile(&[f64::NAN, f64::NAN], 0.95), None);
        assert_eq!(percentile(&[], 0.95), None);
    }

    #[test]
    fn test_mean_of_empty_is_nan() {
        assert!(mean(&[]).is_nan());
        assert_eq!(mean(&[1.0, 2.0, 6.0]), 3.0);
    }

    #[test]
    fn test_skewness_conventions() {
        // Long right tail
        let values = [0.0, 0.0, 0.0, 0.0, 10.0];
        let population = skewness(&values, SkewnessConvention::Population);
        let sample = skewness(&values, SkewnessConvention::Sample);
        assert_abs_diff_eq!(population, 1.5, epsilon = 1e-12);
        // G1 = g1 * sqrt(n(n-1)) / (n-2)
        assert_abs_diff_eq!(sample, 1.5 * (20.0f64).sqrt() / 3.0, epsilon = 1e-12);

        let mirrored: Vec<f64> = values.iter().map(|v| -v).collect();
        assert_abs_diff_eq!(
            skewness(&mirrored, SkewnessConvention::Population),
            -1.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_skewness_degenerate_inputs() {
        assert_eq!(skewness(&[-7.0, -7.0, -7.0], SkewnessConvention::Population), 0.0);
        assert!(skewness(&[1.0, 2.0], SkewnessConvention::Sample).is_nan());
        assert_abs_diff_eq!(
            skewness(&[1.0, 2.0, 3.0], SkewnessConvention::Population),
            0.0,
            epsilon = 1e-12
        );
    }
}

//! Small numeric helpers shared by the analyzer and the reports

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (N-1 denominator)
///
/// `None` when fewer than two values are given.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Number of standard deviations `value` lies from `mean`
///
/// `None` when the deviation is zero or not finite.
pub fn z_score(value: f64, mean: f64, std_dev: f64) -> Option<f64> {
    if !std_dev.is_finite() || std_dev <= 0.0 {
        return None;
    }
    Some((value - mean) / std_dev)
}

/// Ratio of two means, neutral (1.0) when undefined
pub fn ratio_or_neutral(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 1.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[10.0]), Some(10.0));
        assert_eq!(mean(&[10.0, 10.0, 100.0]), Some(40.0));
    }

    #[test]
    fn test_sample_std_dev() {
        assert_eq!(sample_std_dev(&[]), None);
        assert_eq!(sample_std_dev(&[5.0]), None);
        assert_eq!(sample_std_dev(&[4.0, 4.0, 4.0]), Some(0.0));
        assert!(sample_std_dev(&[15.99, 15.99, 15.99]).unwrap() < 1e-9);

        // deviations -30, -30, 60 -> 5400 / 2
        let sd = sample_std_dev(&[10.0, 10.0, 100.0]).unwrap();
        assert!((sd - 2700.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_z_score() {
        assert_eq!(z_score(5.0, 5.0, 0.0), None);
        assert_eq!(z_score(5.0, 5.0, f64::NAN), None);
        assert_eq!(z_score(7.0, 5.0, 1.0), Some(2.0));
        assert_eq!(z_score(3.0, 5.0, 1.0), Some(-2.0));
    }

    #[test]
    fn test_ratio_or_neutral() {
        assert_eq!(ratio_or_neutral(150.0, 50.0), 3.0);
        assert_eq!(ratio_or_neutral(150.0, 0.0), 1.0);
        assert_eq!(ratio_or_neutral(f64::INFINITY, 2.0), 1.0);
    }
}

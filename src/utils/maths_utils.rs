use argminmax::ArgMinMax;
use statrs::statistics::Statistics;

/// Largest value of a non-empty slice.
pub fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

/// Fractional change from `base` to `value`. `None` unless `base` is a positive number.
pub fn pct_change(base: f64, value: f64) -> Option<f64> {
    (base > 0.0 && value.is_finite()).then(|| (value - base) / base)
}

/// Mean over the finite values only. `None` if there are none, so a NaN never
/// reaches an aggregate.
pub fn finite_mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let finite: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        None
    } else {
        Some(finite.mean())
    }
}

/// Fraction of finite values strictly above zero. `None` if there are none.
pub fn positive_fraction<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let finite: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let positive = finite.iter().filter(|v| **v > 0.0).count();
    Some(positive as f64 / finite.len() as f64)
}

/// Sample (N-1) standard deviation. `None` for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let std_dev = values.std_dev();
    std_dev.is_finite().then_some(std_dev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_of_slice() {
        assert_eq!(get_max(&[1.0, 5.5, 3.0]), 5.5);
    }

    #[test]
    fn aggregates_skip_non_finite_values() {
        let values = vec![0.1, f64::NAN, -0.1, 0.3];
        assert!((finite_mean(values.clone()).unwrap() - 0.1).abs() < 1e-12);
        assert!((positive_fraction(values).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(finite_mean(vec![f64::NAN]), None);
        assert_eq!(positive_fraction(Vec::new()), None);
    }

    #[test]
    fn std_dev_uses_sample_denominator() {
        // Squared deviations from the mean (5.0) sum to 32 over 8 values
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((sample_std_dev(&values).unwrap() - expected).abs() < 1e-12);
        assert_eq!(sample_std_dev(&[1.0]), None);
    }

    #[test]
    fn pct_change_guards_base() {
        assert_eq!(pct_change(100.0, 110.0), Some(0.1));
        assert_eq!(pct_change(0.0, 110.0), None);
    }
}

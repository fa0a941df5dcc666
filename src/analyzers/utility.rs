/// Computes the arithmetic mean of the non-NaN values. Returns NaN when there are none.
pub fn mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        return f64::NAN;
    }
    sum / count as f64
}

/// Sums the non-NaN values. Returns 0.0 for empty input.
pub fn nan_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().filter(|v| !v.is_nan()).sum()
}

/// Maximum of the non-NaN values, or `f64::NEG_INFINITY` if there are none.
pub fn nan_max(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(f64::NEG_INFINITY, f64::max)
}

/// Minimum of the non-NaN values, or `f64::INFINITY` if there are none.
pub fn nan_min(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(f64::INFINITY, f64::min)
}

/// `value / max`, or NaN when `max` is zero or not finite.
pub fn normalized(value: f64, max: f64) -> f64 {
    if max == 0.0 || !max.is_finite() {
        return f64::NAN;
    }
    value / max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_skips_nan() {
        assert_eq!(mean(&[1.0, f64::NAN, 3.0]), 2.0);
        assert!(mean(&[]).is_nan());
        assert!(mean(&[f64::NAN]).is_nan());
    }

    #[test]
    fn test_nan_sum() {
        assert_eq!(nan_sum([1.5, f64::NAN, 2.5]), 4.0);
        assert_eq!(nan_sum(Vec::<f64>::new()), 0.0);
    }

    #[test]
    fn test_nan_max_and_min() {
        assert_eq!(nan_max([3.0, f64::NAN, 7.0, -1.0]), 7.0);
        assert_eq!(nan_min([3.0, f64::NAN, 7.0, -1.0]), -1.0);
        assert_eq!(nan_max([f64::NAN]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_normalized_degenerate_max() {
        assert_eq!(normalized(5.0, 10.0), 0.5);
        assert!(normalized(0.0, 0.0).is_nan());
        assert!(normalized(-3.0, 0.0).is_nan());
        assert!(normalized(1.0, f64::NEG_INFINITY).is_nan());
    }
}

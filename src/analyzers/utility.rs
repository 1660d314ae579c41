/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// Rounds to two decimal places for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// True when every value equals the first. The computed variance of such a
/// series can come out slightly above zero (e.g. `[0.1, 0.1, 0.1]`).
fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

/// Pearson correlation of two equally long series.
///
/// `None` when the lengths differ, fewer than two points are given, or
/// either series is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 || is_constant(xs) || is_constant(ys) {
        return None;
    }

    let mx = mean(xs);
    let my = mean(ys);
    let sx = stddev(xs, mx);
    let sy = stddev(ys, my);
    if sx == 0.0 || sy == 0.0 {
        return None;
    }

    let covariance = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mx) * (y - my))
        .sum::<f64>()
        / xs.len() as f64;

    Some((covariance / (sx * sy)).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[10.0, 20.0]), 15.0);
    }

    #[test]
    fn test_stddev() {
        assert_eq!(stddev(&[], 0.0), 0.0);
        assert_eq!(stddev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 5.0), 2.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(4504.348837), 4504.35);
        assert_eq!(round2(15.0), 15.0);
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        let zs = [8.0, 6.0, 4.0, 2.0];

        assert!((pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &zs).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate_inputs() {
        assert_eq!(pearson(&[1.0, 2.0], &[3.0, 3.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0]), None);
    }

    #[test]
    fn test_pearson_inexact_constant_is_undefined() {
        // 0.1 and 0.44 have no exact binary form, so the mean drifts off the value.
        let wind = [0.1, 0.1, 0.1];
        let humidity = [0.44, 0.44, 0.44, 0.44];

        assert_eq!(pearson(&wind, &[1.0, 2.0, 3.0]), None);
        assert_eq!(pearson(&wind, &wind), None);
        assert_eq!(pearson(&[10.0, 20.0, 35.0], &wind), None);
        assert_eq!(pearson(&humidity, &[1.0, 2.0, 3.0, 4.0]), None);
    }
}

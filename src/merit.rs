// CFS merit functions. The correlation measure is the absolute Pearson
// coefficient: symmetric, bounded in [0,1], so merit scores are never negative.

/// Pearson correlation between two equally sized series. Degenerate input
/// (fewer than two points, zero variance on either side, NaN values) yields
/// 0.0 rather than a numeric fault so that callers can still rank subsets.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.len() < 2 {
        return 0.0;
    }

    let n = a.len() as f64;
    let mean_a = a.iter().copied().sum::<f64>() / n;
    let mean_b = b.iter().copied().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&xa, &xb) in a.iter().zip(b.iter()) {
        let da = xa - mean_a;
        let db = xb - mean_b;
        covariance += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let denominator = (var_a * var_b).sqrt();
    if denominator > 0.0 && denominator.is_finite() {
        let r = covariance / denominator;
        if r.is_finite() {
            r
        } else {
            0.0
        }
    } else {
        0.0
    }
}

/// Merit of a feature subset given as column vectors, all of the same length
/// as `labels`:
///
///   merit = k * rcf / sqrt(k + k*(k-1) * rff)
///
/// where rcf is the mean absolute correlation between each column and the
/// labels, and rff the mean absolute correlation between column pairs. For a
/// single column the denominator reduces to 1 and the merit is the
/// feature-label correlation itself.
pub fn merit_calculation(columns: &[Vec<f64>], labels: &[f64]) -> f64 {
    let k = columns.len();
    if k == 0 {
        return 0.0;
    }

    let rcf = columns
        .iter()
        .map(|column| pearson_correlation(column, labels).abs())
        .sum::<f64>()
        / k as f64;

    let mut rff = 0.0;
    if k > 1 {
        let mut pairs = 0usize;
        for i in 0..k {
            for j in i + 1..k {
                rff += pearson_correlation(&columns[i], &columns[j]).abs();
                pairs += 1;
            }
        }
        rff /= pairs as f64;
    }

    let kf = k as f64;
    let denominator = (kf + kf * (kf - 1.0) * rff).sqrt();
    if denominator > 0.0 && denominator.is_finite() {
        kf * rcf / denominator
    } else {
        0.0
    }
}

//! Scalar statistics over paired observations.

/// Arithmetic mean. Returns `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Pearson product-moment correlation coefficient between two series.
///
/// Defined as:
///   r = Σ(xᵢ - x̄)(yᵢ - ȳ) / (√Σ(xᵢ - x̄)² · √Σ(yᵢ - ȳ)²)
///
/// Returns `None` when the series differ in length, hold fewer than two
/// pairs, or either series has zero variance (the coefficient is
/// undefined there, and callers must not hit a division by zero).
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let mx = mean(x)?;
    let my = mean(y)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mx;
        let dy = yi - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = var_x.sqrt() * var_y.sqrt();
    if denom < 1e-15 {
        return None;
    }

    // Clamp to [-1, 1] to handle floating-point rounding that can push
    // the result slightly outside the valid range for a correlation.
    Some((cov / denom).clamp(-1.0, 1.0))
}

/// Least-squares line fit `y = slope·x + intercept`.
///
/// Returns `None` when the series differ in length, hold fewer than two
/// pairs, or `x` has zero variance (a vertical line has no finite slope).
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let mx = mean(x)?;
    let my = mean(y)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        cov += (xi - mx) * (yi - my);
        var_x += (xi - mx) * (xi - mx);
    }

    if var_x < 1e-15 {
        return None;
    }

    let slope = cov / var_x;
    let intercept = my - slope * mx;
    Some((slope, intercept))
}

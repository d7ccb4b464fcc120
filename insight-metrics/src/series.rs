//! Operations over ordered numeric series (monthly trends and the like).

/// Trailing simple moving average.
///
/// Element i averages values[i + 1 - window ..= i]. The first
/// `window - 1` positions have no full window and yield `None`.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                None
            } else {
                let sum: f64 = values[i + 1 - window..=i].iter().sum();
                Some(sum / window as f64)
            }
        })
        .collect()
}

/// Percent change from the previous element, in percentage points.
///
/// The first element has no predecessor and yields `None`; so does any
/// element whose predecessor is zero (the ratio is undefined).
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if i == 0 {
                return None;
            }
            let prev = values[i - 1];
            if prev == 0.0 {
                None
            } else {
                Some((v - prev) / prev * 100.0)
            }
        })
        .collect()
}

/// Min-max normalization onto [0, 1].
///
/// A zero-span series normalizes to all zeros rather than dividing by
/// zero.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if !span.is_finite() || span == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|&v| (v - min) / span).collect()
}

//! Correctness properties for the numeric kernel.

use insight_metrics::{
    band_for_rank, is_degenerate, linear_fit, middle_band, min_max_normalize, moving_average,
    pearson, pct_change,
};

// ---------------------------------------------------------------------------
// Quantile banding
// ---------------------------------------------------------------------------

#[test]
fn every_rank_receives_a_band_in_range() {
    for n in 2..=50usize {
        for k in 2..=9u8 {
            for rank in 0..n {
                let band = band_for_rank(rank, n, k);
                assert!(
                    (1..=k).contains(&band),
                    "rank {} of {} with k={} produced band {}",
                    rank,
                    n,
                    k,
                    band
                );
            }
        }
    }
}

#[test]
fn band_sizes_are_roughly_even() {
    // With n divisible by k, each band should receive close to n/k ranks.
    let n = 100;
    let k = 4u8;
    let mut counts = [0usize; 4];
    for rank in 0..n {
        counts[(band_for_rank(rank, n, k) - 1) as usize] += 1;
    }
    for (i, &count) in counts.iter().enumerate() {
        assert!(
            (20..=30).contains(&count),
            "band {} holds {} of {} ranks",
            i + 1,
            count,
            n
        );
    }
}

#[test]
fn middle_band_sits_strictly_inside_the_range() {
    for k in 2..=9u8 {
        let mid = middle_band(k);
        assert!(mid >= 1 && mid <= k);
    }
}

#[test]
fn degenerate_population_is_flagged_not_banded() {
    assert!(is_degenerate(&[250.0; 40]));
    assert!(!is_degenerate(&[250.0, 250.01]));
}

// ---------------------------------------------------------------------------
// Correlation and regression
// ---------------------------------------------------------------------------

#[test]
fn inverse_series_correlate_at_minus_one() {
    let delivery_days = [1.0, 2.0, 3.0, 4.0, 5.0];
    let review_score = [5.0, 4.0, 3.0, 2.0, 1.0];
    let r = pearson(&delivery_days, &review_score).unwrap();
    assert!((r - (-1.0)).abs() < 1e-6, "expected r ≈ -1.0, got {}", r);
}

#[test]
fn correlation_is_symmetric() {
    let x = [1.0, 3.0, 2.0, 5.0, 4.0];
    let y = [2.0, 1.0, 4.0, 3.0, 5.0];
    let rxy = pearson(&x, &y).unwrap();
    let ryx = pearson(&y, &x).unwrap();
    assert!((rxy - ryx).abs() < 1e-12);
}

#[test]
fn regression_slope_sign_matches_correlation_sign() {
    let x = [2.0, 4.0, 6.0, 8.0, 10.0];
    let y = [9.0, 7.5, 6.8, 5.1, 4.0];
    let r = pearson(&x, &y).unwrap();
    let (slope, _) = linear_fit(&x, &y).unwrap();
    assert!(r < 0.0);
    assert!(slope < 0.0);
}

// ---------------------------------------------------------------------------
// Series operations
// ---------------------------------------------------------------------------

#[test]
fn three_month_moving_average_property() {
    // Spec example: [100, 200, 300, 400, 500] → MA3 at month 3 is 200.
    let ma = moving_average(&[100.0, 200.0, 300.0, 400.0, 500.0], 3);
    assert!(ma[0].is_none() && ma[1].is_none());
    assert!((ma[2].unwrap() - 200.0).abs() < 1e-9);
}

#[test]
fn pct_change_round_trips_growth() {
    let series = [50.0, 100.0];
    let changes = pct_change(&series);
    assert!((changes[1].unwrap() - 100.0).abs() < 1e-9);
}

#[test]
fn normalization_is_idempotent_on_unit_data() {
    let unit = [0.0, 0.25, 1.0];
    let norm = min_max_normalize(&unit);
    for (a, b) in unit.iter().zip(norm.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}

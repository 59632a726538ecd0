//! Small deterministic numeric helpers shared by the analytical components.

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

/// Ordinary least-squares fit of `ys` against the index axis `0..n`.
///
/// Returns `(slope, intercept)`. Fewer than 2 points fit a flat line through
/// the single value (slope 0).
pub fn linear_fit(ys: &[f64]) -> (f64, f64) {
    let n = ys.len();
    if n < 2 {
        return (0.0, ys.first().copied().unwrap_or(0.0));
    }

    let nf = n as f64;
    let mean_x = (nf - 1.0) / 2.0;
    let mean_y = mean(ys);

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (i, y) in ys.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    // sxx is 0 only for n < 2, handled above.
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    (slope, intercept)
}

/// Root-mean-square residual of `ys` around the fitted line.
pub fn residual_rms(ys: &[f64], slope: f64, intercept: f64) -> f64 {
    if ys.is_empty() {
        return 0.0;
    }
    let ss = ys
        .iter()
        .enumerate()
        .map(|(i, y)| {
            let fitted = slope * i as f64 + intercept;
            let d = y - fitted;
            d * d
        })
        .sum::<f64>();
    (ss / ys.len() as f64).sqrt()
}

/// Clamp a score to [0, 100].
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

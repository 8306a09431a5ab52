//! Derived series over closing prices
//!
//! All functions take prices oldest-first and return outputs aligned with the
//! input index. Warm-up positions of the moving indicators are `None` rather
//! than zero so charts can leave a gap instead of plotting a false value.

/// Calculate price change and percentage change
///
/// A `previous` of zero yields a percentage of 0.0.
pub fn percent_change(current: f64, previous: f64) -> (f64, f64) {
    let change = current - previous;
    let change_percent = if previous != 0.0 {
        (change / previous) * 100.0
    } else {
        0.0
    };
    (change, change_percent)
}

/// Express each value as percent change against `base`: `(v / base - 1) * 100`
///
/// Re-normalizing the same prices against the same base produces the same
/// series, so callers can rebuild charts every cycle without drift.
pub fn normalize_to_base(values: &[f64], base: f64) -> Vec<f64> {
    if base == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v / base - 1.0) * 100.0).collect()
}

/// Percent change against the first value of the series (first point is 0%)
pub fn normalize_to_first(values: &[f64]) -> Vec<f64> {
    match values.first() {
        Some(&base) => normalize_to_base(values, base),
        None => Vec::new(),
    }
}

/// Normalize an optional series (e.g. EMA with warm-up gaps) against `base`
pub fn normalize_optional(values: &[Option<f64>], base: f64) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|v| v.map(|x| if base == 0.0 { 0.0 } else { (x / base - 1.0) * 100.0 }))
        .collect()
}

/// Exponential moving average
///
/// Recursive form with `alpha = 2 / (period + 1)`, seeded with the first
/// value. The first `period - 1` outputs are `None`.
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.is_empty() {
        return out;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut ema = values[0];
    for (i, &value) in values.iter().enumerate() {
        if i > 0 {
            ema = alpha * value + (1.0 - alpha) * ema;
        }
        if i + 1 >= period {
            out[i] = Some(ema);
        }
    }
    out
}

/// Relative strength index with Wilder smoothing (`alpha = 1 / period`)
///
/// Gains and losses come from consecutive differences; the first difference
/// is taken as zero. The first `period - 1` outputs are `None`. When the
/// smoothed loss is zero the RSI is 100.
pub fn calculate_rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.is_empty() {
        return out;
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 0..values.len() {
        let diff = if i == 0 { 0.0 } else { values[i] - values[i - 1] };
        let gain = diff.max(0.0);
        let loss = (-diff).max(0.0);

        if i == 0 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
            avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
        }

        if i + 1 >= period {
            out[i] = Some(if avg_loss == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
            });
        }
    }
    out
}

/// Forward-fill then back-fill missing values
///
/// Returns `None` when every value is missing.
pub fn fill_gaps(values: &[Option<f64>]) -> Option<Vec<f64>> {
    let first = values.iter().find_map(|v| *v)?;
    let mut last = first;
    Some(
        values
            .iter()
            .map(|v| {
                if let Some(x) = v {
                    last = *x;
                }
                last
            })
            .collect(),
    )
}

/// Volume change in percent against the previous session
pub fn volume_change_percent(current: u64, previous: u64) -> Option<f64> {
    if previous == 0 {
        None
    } else {
        Some((current as f64 - previous as f64) / previous as f64 * 100.0)
    }
}

/// Last defined value of an indicator series
pub fn last_value(values: &[Option<f64>]) -> Option<f64> {
    values.iter().rev().find_map(|v| *v)
}

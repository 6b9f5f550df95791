//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period + 1 closes.
//! Edge case: avg_loss == 0 → RSI = 100, including a flat series.

/// Period of the reported `rsi_14d`.
pub const RSI_PERIOD: usize = 14;

/// Final Wilder RSI of `closes`, rounded to 2 decimals.
///
/// `None` when `period` is zero or there are fewer than `period + 1` closes.
pub fn wilder_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let mut deltas = closes.windows(2).map(|w| w[1] - w[0]);
    let p = period as f64;

    // Seed: plain mean over the first `period` deltas
    let (mut avg_gain, mut avg_loss) = (0.0, 0.0);
    for delta in deltas.by_ref().take(period) {
        avg_gain += delta.max(0.0);
        avg_loss += (-delta).max(0.0);
    }
    avg_gain /= p;
    avg_loss /= p;

    for delta in deltas {
        avg_gain = (avg_gain * (p - 1.0) + delta.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-delta).max(0.0)) / p;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }
    let rs = avg_gain / avg_loss;
    Some(crate::rounding::round_to(100.0 - 100.0 / (1.0 + rs), 2))
}

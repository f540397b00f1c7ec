//! Indicator implementations feeding the feature table.
//!
//! Indicators are pure functions: bar history in, numeric series out, same
//! length as the input. Warm-up positions hold `f64::NAN`; the feature
//! builder turns those into `None`.
//!
//! # Look-ahead guard
//! No value at bar t may depend on bar t+1 or later. Truncating the input
//! must leave the overlapping prefix of the output unchanged.

pub mod atr;
pub mod bollinger;
pub mod ema;

pub use atr::Atr;
pub use bollinger::{Bollinger, BollingerSeries};
pub use ema::Ema;

use crate::domain::Bar;

/// Single-series indicator.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_200", "atr_14").
    fn name(&self) -> &str;

    /// Number of leading bars that are NaN in the output.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the full bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Create synthetic bars from close prices for testing.
///
/// open = prev_close (or close for the first bar), high = max(open,close) + 1,
/// low = min(open,close) - 1.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                symbol: "TEST".to_string(),
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

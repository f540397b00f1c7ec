//! Hand-built feature tables shared by the integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use setupscan_core::{Bar, BarTable, FeatureRow};

/// Band-width pattern for rows that are neither latest nor previous.
/// Range [0.02, 0.0395], so 0.01 is always squeezed and 0.05 never is.
pub fn background_width(i: usize) -> f64 {
    0.02 + 0.0005 * (i % 40) as f64
}

pub const SQUEEZED: f64 = 0.01;
pub const RELEASED: f64 = 0.05;

/// `n` rows with a constant EMA and middle band, bands at middle ± 5,
/// closes on the middle band, lows/highs at middle ∓ 2 and ATR 2.
pub fn rows(n: usize, ema: f64, middle: f64) -> Vec<FeatureRow> {
    let base = NaiveDate::from_ymd_opt(2023, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..n)
        .map(|i| FeatureRow {
            bar: Bar {
                symbol: "TEST".into(),
                timestamp: base + chrono::Duration::days(i as i64),
                open: middle,
                high: middle + 2.0,
                low: middle - 2.0,
                close: middle,
                volume: 1_000,
            },
            ema_200: Some(ema),
            bb_middle: Some(middle),
            bb_upper: Some(middle + 5.0),
            bb_lower: Some(middle - 5.0),
            band_width: Some(background_width(i)),
            atr_14: Some(2.0),
        })
        .collect()
}

pub fn table(rows: Vec<FeatureRow>) -> BarTable {
    BarTable::from_rows("TEST", rows).unwrap()
}

/// Set the previous and latest band-widths.
pub fn with_widths(mut rows: Vec<FeatureRow>, previous: f64, latest: f64) -> Vec<FeatureRow> {
    let n = rows.len();
    rows[n - 2].band_width = Some(previous);
    rows[n - 1].band_width = Some(latest);
    rows
}

/// Squeeze released on the latest bar with the close above the upper band.
/// EMA 100, middle 110.
pub fn breakout_buy(n: usize) -> Vec<FeatureRow> {
    let mut rows = with_widths(rows(n, 100.0, 110.0), SQUEEZED, RELEASED);
    let last = rows.last_mut().unwrap();
    last.bar.close = 120.0;
    last.bar.high = 121.0;
    rows
}

/// Mirror of `breakout_buy`: EMA 100, middle 90, close below the lower band.
pub fn breakout_sell(n: usize) -> Vec<FeatureRow> {
    let mut rows = with_widths(rows(n, 100.0, 90.0), SQUEEZED, RELEASED);
    let last = rows.last_mut().unwrap();
    last.bar.close = 80.0;
    last.bar.low = 79.0;
    rows
}

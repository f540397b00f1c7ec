//! Feature builder: raw bars in, indicator table out.

use super::table::{BarTable, FeatureRow};
use crate::data::DataError;
use crate::domain::{Bar, Timeframe};
use crate::indicators::{Atr, Bollinger, Ema, Indicator};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const EMA_PERIOD: usize = 200;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD: f64 = 2.0;
pub const ATR_PERIOD: usize = 14;

/// Feature-building knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureParams {
    /// Minimum raw bars required before indicators are computed.
    pub min_bars: usize,
    /// Round OHLC and indicator values; `false` keeps full precision.
    pub round: bool,
    /// Decimal places used when `round` is on.
    pub round_decimals: u32,
}

impl FeatureParams {
    /// Decimal places to round to, if rounding is on.
    pub fn rounding(&self) -> Option<u32> {
        self.round.then_some(self.round_decimals)
    }
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            min_bars: EMA_PERIOD,
            round: true,
            round_decimals: 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    params: FeatureParams,
    ema: Ema,
    bollinger: Bollinger,
    atr: Atr,
}

impl FeatureBuilder {
    pub fn new(params: FeatureParams) -> Self {
        Self {
            params,
            ema: Ema::new(EMA_PERIOD),
            bollinger: Bollinger::new(BOLLINGER_PERIOD, BOLLINGER_STD),
            atr: Atr::new(ATR_PERIOD),
        }
    }

    pub fn params(&self) -> &FeatureParams {
        &self.params
    }

    fn series(&self) -> [&dyn Indicator; 2] {
        [&self.ema, &self.atr]
    }

    /// Leading rows left without a full indicator set.
    pub fn warmup(&self) -> usize {
        self.series()
            .iter()
            .map(|ind| ind.lookback())
            .chain(std::iter::once(self.bollinger.lookback()))
            .max()
            .unwrap_or(0)
    }

    /// Compute EMA-200, Bollinger 20/2, band-width and ATR-14 for `bars`.
    ///
    /// Fails with `InsufficientHistory` below `min_bars`. Band-width is
    /// computed from unrounded bands; everything is rounded afterwards.
    pub fn build(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        bars: Vec<Bar>,
    ) -> Result<BarTable, DataError> {
        if bars.is_empty() || bars.len() < self.params.min_bars {
            return Err(DataError::InsufficientHistory {
                symbol: symbol.to_string(),
                timeframe,
                bars: bars.len(),
                required: self.params.min_bars,
            });
        }

        let [ema, atr] = self.series().map(|ind| ind.compute(&bars));
        let bands = self.bollinger.bands(&bars);
        let width = bands.width();
        debug!(
            %symbol,
            %timeframe,
            bars = bars.len(),
            indicators = ?self.series().map(|ind| ind.name().to_string()),
            warmup = self.warmup(),
            "computing features"
        );

        let round = |v: f64| round_to(v, self.params.rounding());
        let rows = bars
            .into_iter()
            .enumerate()
            .map(|(i, bar)| FeatureRow {
                bar: Bar {
                    open: round(bar.open),
                    high: round(bar.high),
                    low: round(bar.low),
                    close: round(bar.close),
                    ..bar
                },
                ema_200: defined(round(ema[i])).filter(|v| *v != 0.0),
                bb_middle: defined(round(bands.middle[i])),
                bb_upper: defined(round(bands.upper[i])),
                bb_lower: defined(round(bands.lower[i])),
                band_width: defined(round(width[i])),
                atr_14: defined(round(atr[i])),
            })
            .collect();

        BarTable::from_rows(symbol, rows)
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(FeatureParams::default())
    }
}

fn defined(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

fn round_to(v: f64, decimals: Option<u32>) -> f64 {
    match decimals {
        Some(d) if v.is_finite() => {
            let scale = 10f64.powi(d as i32);
            (v * scale).round() / scale
        }
        _ => v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bars(closes: impl IntoIterator<Item = f64>) -> Vec<Bar> {
        let base = NaiveDate::from_ymd_opt(2023, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| Bar {
                symbol: "TEST".into(),
                timestamp: base + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1,
            })
            .collect()
    }

    #[test]
    fn too_few_bars_is_unavailable() {
        let err = FeatureBuilder::default()
            .build("TEST", Timeframe::Daily, bars((0..199).map(|_| 10.0)))
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::InsufficientHistory { bars: 199, required: 200, .. }
        ));
    }

    #[test]
    fn empty_input_is_unavailable_even_without_minimum() {
        let builder = FeatureBuilder::new(FeatureParams {
            min_bars: 0,
            round: false,
            ..FeatureParams::default()
        });
        assert!(builder.build("TEST", Timeframe::Daily, Vec::new()).is_err());
    }

    #[test]
    fn warmup_rows_are_undefined() {
        let table = FeatureBuilder::default()
            .build("TEST", Timeframe::Daily, bars((0..220).map(|i| 100.0 + i as f64)))
            .unwrap();
        let rows = table.rows();
        assert!(rows[198].ema_200.is_none());
        assert!(rows[199].ema_200.is_some());
        assert!(rows[18].bb_middle.is_none());
        assert!(rows[19].band_width.is_some());
        assert!(rows[13].atr_14.is_none());
        assert!(rows[14].atr_14.is_some());
    }

    #[test]
    fn warmup_is_longest_lookback() {
        assert_eq!(FeatureBuilder::default().warmup(), EMA_PERIOD - 1);
    }

    #[test]
    fn values_rounded_to_four_places() {
        let table = FeatureBuilder::default()
            .build(
                "TEST",
                Timeframe::Daily,
                bars((0..210).map(|i| 100.0 + (i as f64) / 3.0)),
            )
            .unwrap();
        let latest = table.latest().unwrap();
        for v in [
            latest.bar.close,
            latest.ema_200.unwrap(),
            latest.bb_middle.unwrap(),
            latest.band_width.unwrap(),
        ] {
            assert!(((v * 1e4).round() - v * 1e4).abs() < 1e-6, "{v} not rounded");
        }
    }

    #[test]
    fn rounding_off_keeps_full_precision() {
        let builder = FeatureBuilder::new(FeatureParams {
            round: false,
            ..FeatureParams::default()
        });
        let table = builder
            .build(
                "TEST",
                Timeframe::Daily,
                bars((0..210).map(|i| 100.0 + (i as f64) / 3.0)),
            )
            .unwrap();
        let latest = table.latest().unwrap();
        assert_eq!(latest.bar.close, 100.0 + 209.0 / 3.0);
        assert_eq!(builder.params().rounding(), None);
    }

    #[test]
    fn degenerate_prices_leave_indicators_undefined() {
        // Zero closes give a zero middle band and EMA; both must read as undefined.
        let table = FeatureBuilder::default()
            .build("TEST", Timeframe::Daily, bars((0..205).map(|_| 0.0)))
            .unwrap();
        let latest = table.latest().unwrap();
        assert!(latest.ema_200.is_none());
        assert!(latest.band_width.is_none());
        assert_eq!(latest.bb_middle, Some(0.0));
    }
}

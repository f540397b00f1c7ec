//! Squeeze/trend classifier.
//!
//! Reads one feature table and returns a categorical signal:
//!
//! 1. Base trend: Bollinger middle band above/below the EMA-200.
//! 2. Squeeze: band-width below its trailing 20th percentile.
//! 3. Breakout: squeezed on the previous bar, released on the latest, and
//!    the close pierced the band on the trend side → Strong.
//! 4. Consolidation: still squeezed, and either the lows (highs) trend with
//!    the base direction or price recently stretched 5% beyond the EMA and
//!    pulled back to it → Strong.
//! 5. Otherwise the base trend.
//!
//! All windows are fixed offsets from the end of the table.

use super::stats::{ols_slope, quantile};
use crate::domain::{Direction, Signal};
use crate::features::{BarTable, FeatureRow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Classifier thresholds. Defaults are the screening rules' fixed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Minimum rows, and the span of the squeeze history window.
    pub lookback: usize,
    /// Band-width percentile that defines a squeeze.
    pub squeeze_percentile: f64,
    /// Span of the trend-slope window (ending before the latest row).
    pub trend_lookback: usize,
    /// Max |middle - ema| / ema for the pullback check to apply.
    pub near_ema_tolerance: f64,
    /// How far beyond the EMA the close must have stretched.
    pub pullback_band: f64,
    /// Pullback window start, rows back from the end (inclusive).
    pub pullback_start: usize,
    /// Pullback window end, rows back from the end (exclusive).
    pub pullback_end: usize,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            lookback: 120,
            squeeze_percentile: 0.20,
            trend_lookback: 60,
            near_ema_tolerance: 0.03,
            pullback_band: 0.05,
            pullback_start: 80,
            pullback_end: 20,
        }
    }
}

/// What turned a base signal into a Strong one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Squeeze released with a band breakout.
    Breakout,
    /// Squeeze with lows rising (Buy) or highs falling (Sell).
    TrendSlope,
    /// Squeeze at the EMA after a stretch away from it.
    Pullback,
}

/// Signal plus the squeeze diagnostics behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub signal: Signal,
    pub squeeze_threshold: Option<f64>,
    pub squeeze_today: bool,
    pub squeeze_yesterday: bool,
    pub trigger: Option<Trigger>,
}

impl Classification {
    fn plain(signal: Signal) -> Self {
        Self {
            signal,
            squeeze_threshold: None,
            squeeze_today: false,
            squeeze_yesterday: false,
            trigger: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SqueezeClassifier {
    params: ClassifierParams,
}

impl SqueezeClassifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    /// Classify a table. A missing table yields `InsufficientData`.
    pub fn classify(&self, table: Option<&BarTable>) -> Signal {
        self.explain(table).signal
    }

    /// Classify and keep the intermediate squeeze state.
    pub fn explain(&self, table: Option<&BarTable>) -> Classification {
        let p = &self.params;
        let insufficient = Classification::plain(Signal::InsufficientData);

        let Some(table) = table else {
            return insufficient;
        };
        if table.len() < p.lookback.max(2) {
            debug!(symbol = table.symbol(), rows = table.len(), "too few rows");
            return insufficient;
        }
        let (Some(latest), Some(previous)) = (table.latest(), table.previous()) else {
            return insufficient;
        };
        let (Some(middle), Some(ema), Some(prev_width)) = (
            latest.bb_middle,
            latest.ema_200.filter(|e| *e != 0.0),
            previous.band_width,
        ) else {
            debug!(symbol = table.symbol(), "latest indicators undefined");
            return insufficient;
        };

        let base = if middle > ema {
            Some(Direction::Buy)
        } else if middle < ema {
            Some(Direction::Sell)
        } else {
            None
        };
        let mut out = Classification::plain(base.map_or(Signal::Hold, Signal::base));

        let Some(history) = table.window_from_end(p.lookback, 1) else {
            return out;
        };
        let widths: Vec<f64> = history.iter().filter_map(|r| r.band_width).collect();
        if widths.len() < history.len() {
            debug!(
                symbol = table.symbol(),
                defined = widths.len(),
                required = history.len(),
                "band-width history incomplete, skipping squeeze checks"
            );
            return out;
        }
        let Some(threshold) = quantile(&widths, p.squeeze_percentile) else {
            return out;
        };

        out.squeeze_threshold = Some(threshold);
        out.squeeze_today = latest.band_width.is_some_and(|w| w < threshold);
        out.squeeze_yesterday = prev_width < threshold;

        let Some(direction) = base else {
            return out;
        };

        if out.squeeze_yesterday && !out.squeeze_today && breaks_band(latest, direction) {
            out.signal = Signal::strong(direction);
            out.trigger = Some(Trigger::Breakout);
        } else if out.squeeze_today {
            if let Some(trigger) = self.consolidation(table, direction, middle, ema) {
                out.signal = Signal::strong(direction);
                out.trigger = Some(trigger);
            }
        }

        debug!(
            symbol = table.symbol(),
            signal = %out.signal,
            threshold,
            squeeze_today = out.squeeze_today,
            squeeze_yesterday = out.squeeze_yesterday,
            trigger = ?out.trigger,
            "classified"
        );
        out
    }

    /// Consolidation checks while the squeeze is still on.
    fn consolidation(
        &self,
        table: &BarTable,
        direction: Direction,
        middle: f64,
        ema: f64,
    ) -> Option<Trigger> {
        if self.trend_slope_agrees(table, direction) {
            return Some(Trigger::TrendSlope);
        }
        if self.pulled_back_to_ema(table, direction, middle, ema) {
            return Some(Trigger::Pullback);
        }
        None
    }

    /// Lows rising for Buy, highs falling for Sell, over the trend window.
    fn trend_slope_agrees(&self, table: &BarTable, direction: Direction) -> bool {
        let Some(window) = table.window_from_end(self.params.trend_lookback, 1) else {
            return false;
        };
        let series: Vec<f64> = window
            .iter()
            .map(|r| match direction {
                Direction::Buy => r.bar.low,
                Direction::Sell => r.bar.high,
            })
            .collect();
        match (direction, ols_slope(&series)) {
            (Direction::Buy, Some(slope)) => slope > 0.0,
            (Direction::Sell, Some(slope)) => slope < 0.0,
            (_, None) => false,
        }
    }

    /// Middle band back near the EMA after closes stretched beyond it.
    fn pulled_back_to_ema(
        &self,
        table: &BarTable,
        direction: Direction,
        middle: f64,
        ema: f64,
    ) -> bool {
        let p = &self.params;
        if (middle - ema).abs() / ema >= p.near_ema_tolerance {
            return false;
        }
        let Some(window) = table.window_from_end(p.pullback_start, p.pullback_end) else {
            return false;
        };
        let closes = window.iter().map(|r| r.bar.close);
        match direction {
            Direction::Buy => closes.fold(f64::NAN, f64::max) > ema * (1.0 + p.pullback_band),
            Direction::Sell => closes.fold(f64::NAN, f64::min) < ema * (1.0 - p.pullback_band),
        }
    }
}

fn breaks_band(latest: &FeatureRow, direction: Direction) -> bool {
    let close = latest.bar.close;
    match direction {
        Direction::Buy => latest.bb_upper.is_some_and(|upper| close > upper),
        Direction::Sell => latest.bb_lower.is_some_and(|lower| close < lower),
    }
}

/// Classify with the default thresholds.
pub fn classify(table: Option<&BarTable>) -> Signal {
    SqueezeClassifier::default().classify(table)
}

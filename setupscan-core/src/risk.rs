//! ATR-padded stop-loss from the daily table.
//!
//! Two candidate stops, take the tighter:
//! - EMA stop: EMA-200 moved one ATR against the trade
//! - Swing stop: the recent swing extreme moved one ATR further out
//!
//! Buy keeps the higher of the two, Sell the lower. The result stays on the
//! losing side of the EMA-200 whenever the swing extreme is within one ATR
//! of it.

use crate::domain::Direction;
use crate::features::BarTable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RiskError {
    #[error("{symbol}: latest {indicator} is undefined")]
    MissingIndicator {
        symbol: String,
        indicator: &'static str,
    },

    #[error("{symbol}: swing window needs {required} rows, table has {rows}")]
    InsufficientHistory {
        symbol: String,
        rows: usize,
        required: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskParams {
    /// Swing window span, rows back from the end; the latest row is excluded.
    pub swing_lookback: usize,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self { swing_lookback: 60 }
    }
}

/// Stop-loss price for a trade in `direction`, from the daily table.
pub fn stop_loss(
    daily: &BarTable,
    direction: Direction,
    params: &RiskParams,
) -> Result<f64, RiskError> {
    let symbol = daily.symbol();
    let latest = daily.latest();
    let ema = latest
        .and_then(|r| r.ema_200)
        .ok_or_else(|| RiskError::MissingIndicator {
            symbol: symbol.to_string(),
            indicator: "EMA-200",
        })?;
    let atr = latest
        .and_then(|r| r.atr_14)
        .ok_or_else(|| RiskError::MissingIndicator {
            symbol: symbol.to_string(),
            indicator: "ATR-14",
        })?;

    let swing = daily
        .window_from_end(params.swing_lookback, 1)
        .ok_or_else(|| RiskError::InsufficientHistory {
            symbol: symbol.to_string(),
            rows: daily.len(),
            required: params.swing_lookback,
        })?;

    Ok(match direction {
        Direction::Buy => {
            let swing_low = swing.iter().map(|r| r.bar.low).fold(f64::NAN, f64::min);
            (ema - atr).max(swing_low - atr)
        }
        Direction::Sell => {
            let swing_high = swing.iter().map(|r| r.bar.high).fold(f64::NAN, f64::max);
            (ema + atr).min(swing_high + atr)
        }
    })
}

//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance,
//! synthetic random walks) so the screener can swap implementations and
//! tests can inject fixed series.

use crate::domain::{Bar, Timeframe};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw OHLCV bar from a data provider, before adjustment and indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    /// Dividend/split adjusted close, daily bars only.
    pub adj_close: Option<f64>,
}

impl RawBar {
    /// Convert to a domain bar, scaling OHLC by adj_close / close when an
    /// adjusted close is available.
    pub fn into_bar(self, symbol: &str) -> Bar {
        let factor = match self.adj_close {
            Some(adj) if self.close > 0.0 && adj.is_finite() && adj > 0.0 => adj / self.close,
            _ => 1.0,
        };
        Bar {
            symbol: symbol.to_string(),
            timestamp: self.timestamp,
            open: self.open * factor,
            high: self.high * factor,
            low: self.low * factor,
            close: self.close * factor,
            volume: self.volume,
        }
    }
}

/// Structured error types for data operations.
///
/// Every variant is a per-ticker failure: the screener logs it and carries
/// on with the next ticker.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status} for {symbol}")]
    Http { symbol: String, status: u16 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("insufficient history for {symbol} ({timeframe}): {bars} bars, need {required}")]
    InsufficientHistory {
        symbol: String,
        timeframe: Timeframe,
        bars: usize,
        required: usize,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

/// Result of a successful fetch for a single symbol and timeframe.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub bars: Vec<RawBar>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Synthetic,
}

/// Source of raw OHLCV bars.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the standard lookback window of bars for a symbol at the
    /// given timeframe, oldest first.
    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError>;
}

//! Bar timeframes screened by the system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bar interval plus the history window fetched for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    /// Daily bars, two years of history.
    Daily,
    /// 30-minute bars, sixty days of history.
    ThirtyMinute,
}

impl Timeframe {
    /// Provider interval code.
    pub fn interval(self) -> &'static str {
        match self {
            Timeframe::Daily => "1d",
            Timeframe::ThirtyMinute => "30m",
        }
    }

    /// Provider range code for the lookback window.
    pub fn range(self) -> &'static str {
        match self {
            Timeframe::Daily => "2y",
            Timeframe::ThirtyMinute => "60d",
        }
    }

    /// Lookback window in calendar days.
    pub fn lookback_days(self) -> i64 {
        match self {
            Timeframe::Daily => 730,
            Timeframe::ThirtyMinute => 60,
        }
    }

    /// Bar length in minutes.
    pub fn bar_minutes(self) -> i64 {
        match self {
            Timeframe::Daily => 24 * 60,
            Timeframe::ThirtyMinute => 30,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Daily => f.write_str("daily"),
            Timeframe::ThirtyMinute => f.write_str("30m"),
        }
    }
}

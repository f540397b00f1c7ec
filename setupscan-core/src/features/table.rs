//! Bar table: bars plus the indicator features the classifier reads.

use crate::data::DataError;
use crate::domain::Bar;
use serde::{Deserialize, Serialize};

/// One bar with its indicator values. `None` marks an undefined value
/// (warm-up period or degenerate input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub bar: Bar,
    pub ema_200: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub band_width: Option<f64>,
    pub atr_14: Option<f64>,
}

impl FeatureRow {
    /// Row with no indicator values.
    pub fn bare(bar: Bar) -> Self {
        Self {
            bar,
            ema_200: None,
            bb_middle: None,
            bb_upper: None,
            bb_lower: None,
            band_width: None,
            atr_14: None,
        }
    }
}

/// Chronologically ordered feature rows for one symbol and timeframe.
///
/// Immutable once built. Timestamps are strictly ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarTable {
    symbol: String,
    rows: Vec<FeatureRow>,
}

impl BarTable {
    /// Build a table, rejecting out-of-order or duplicate timestamps.
    pub fn from_rows(symbol: impl Into<String>, rows: Vec<FeatureRow>) -> Result<Self, DataError> {
        let symbol = symbol.into();
        if let Some(pos) = rows
            .windows(2)
            .position(|w| w[0].bar.timestamp >= w[1].bar.timestamp)
        {
            return Err(DataError::Validation(format!(
                "{symbol}: timestamps not strictly ascending at row {} ({} then {})",
                pos + 1,
                rows[pos].bar.timestamp,
                rows[pos + 1].bar.timestamp
            )));
        }
        Ok(Self { symbol, rows })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn latest(&self) -> Option<&FeatureRow> {
        self.rows.last()
    }

    /// Second-to-last row.
    pub fn previous(&self) -> Option<&FeatureRow> {
        self.rows.len().checked_sub(2).map(|i| &self.rows[i])
    }

    /// Rows between two offsets counted back from the end of the table,
    /// start inclusive and end exclusive: `window_from_end(60, 1)` is the 59
    /// rows before the latest one. `None` if the table holds fewer than
    /// `start_back` rows or the range is empty.
    pub fn window_from_end(&self, start_back: usize, end_back: usize) -> Option<&[FeatureRow]> {
        let n = self.rows.len();
        if start_back <= end_back || start_back > n {
            return None;
        }
        Some(&self.rows[n - start_back..n - end_back])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(day: u32, close: f64) -> FeatureRow {
        FeatureRow::bare(Bar {
            symbol: "T".into(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        })
    }

    fn table(n: u32) -> BarTable {
        BarTable::from_rows("T", (1..=n).map(|d| row(d, d as f64)).collect()).unwrap()
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let err = BarTable::from_rows("T", vec![row(1, 1.0), row(1, 2.0)]).unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
    }

    #[test]
    fn rejects_descending_timestamps() {
        assert!(BarTable::from_rows("T", vec![row(2, 1.0), row(1, 2.0)]).is_err());
    }

    #[test]
    fn latest_and_previous() {
        let t = table(5);
        assert_eq!(t.latest().unwrap().bar.close, 5.0);
        assert_eq!(t.previous().unwrap().bar.close, 4.0);
        assert!(table(1).previous().is_none());
    }

    #[test]
    fn window_matches_negative_slicing() {
        let t = table(10);
        // rows[-4:-1]
        let w = t.window_from_end(4, 1).unwrap();
        let closes: Vec<f64> = w.iter().map(|r| r.bar.close).collect();
        assert_eq!(closes, vec![7.0, 8.0, 9.0]);
        assert_eq!(t.window_from_end(10, 0).unwrap().len(), 10);
        assert!(t.window_from_end(11, 1).is_none());
        assert!(t.window_from_end(3, 3).is_none());
    }
}

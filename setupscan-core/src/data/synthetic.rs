//! Synthetic data provider for offline runs and demos.
//!
//! Produces a deterministic random walk per `(symbol, timeframe)`, seeded
//! from a BLAKE3 hash of both, so repeated runs see identical bars. These
//! bars are clearly fake and tagged `DataSource::Synthetic`.

use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use crate::domain::Timeframe;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Regular-session 30-minute bars per day (14:30–20:30 UTC opens).
const INTRADAY_BARS_PER_DAY: u32 = 13;

pub struct SyntheticProvider {
    end: NaiveDate,
}

impl SyntheticProvider {
    /// Bars end on `end` (inclusive) and reach back over the timeframe's
    /// standard lookback.
    pub fn new(end: NaiveDate) -> Self {
        Self { end }
    }

    fn seed(symbol: &str, timeframe: Timeframe) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(symbol.as_bytes());
        hasher.update(timeframe.interval().as_bytes());
        *hasher.finalize().as_bytes()
    }

    fn sessions(&self, timeframe: Timeframe) -> Vec<NaiveDate> {
        let start = self.end - Duration::days(timeframe.lookback_days());
        start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .collect()
    }

    pub fn generate(&self, symbol: &str, timeframe: Timeframe) -> Vec<RawBar> {
        let mut rng = StdRng::from_seed(Self::seed(symbol, timeframe));
        let (step, wick) = match timeframe {
            Timeframe::Daily => (0.03, 0.01),
            Timeframe::ThirtyMinute => (0.006, 0.002),
        };
        let open_time = NaiveTime::from_hms_opt(14, 30, 0).unwrap_or(NaiveTime::MIN);

        let mut bars = Vec::new();
        let mut price = 100.0_f64;
        for session in self.sessions(timeframe) {
            let stamps: Vec<_> = match timeframe {
                Timeframe::Daily => vec![session.and_time(NaiveTime::MIN)],
                Timeframe::ThirtyMinute => (0..INTRADAY_BARS_PER_DAY)
                    .map(|k| {
                        session.and_time(open_time)
                            + Duration::minutes(i64::from(k) * timeframe.bar_minutes())
                    })
                    .collect(),
            };

            for timestamp in stamps {
                let ret: f64 = rng.gen_range(-step..step);
                let open = price;
                let close = price * (1.0 + ret);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..wick));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..wick));
                bars.push(RawBar {
                    timestamp,
                    open,
                    high,
                    low,
                    close,
                    volume: rng.gen_range(500_000..5_000_000u64),
                    adj_close: None,
                });
                price = close;
            }
        }
        bars
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError> {
        Ok(FetchResult {
            symbol: symbol.to_string(),
            timeframe,
            bars: self.generate(symbol, timeframe),
            source: DataSource::Synthetic,
        })
    }
}

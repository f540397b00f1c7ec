//! End-to-end screening over synthetic market data.

use chrono::NaiveDate;
use setupscan_core::data::{DataProvider, SyntheticProvider};
use setupscan_core::{
    Confirmation, FeatureBuilder, FeatureProvider, FeatureSource, NoProgress, Screener,
    ScreenerConfig, Timeframe,
};

fn source() -> FeatureProvider<SyntheticProvider> {
    FeatureProvider::new(
        SyntheticProvider::new(NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()),
        FeatureBuilder::default(),
    )
}

fn config() -> ScreenerConfig {
    let mut config = ScreenerConfig::default();
    config.screen.throttle_ms = 0;
    config
}

fn tickers() -> Vec<String> {
    ["SPY", "QQQ", "AAPL", "MSFT", "NVDA", "TSLA", "IWM", "XLE"]
        .map(String::from)
        .to_vec()
}

#[test]
fn synthetic_run_is_deterministic() {
    let a = Screener::from_config(source(), &config()).run(&tickers(), &NoProgress);
    let b = Screener::from_config(source(), &config()).run(&tickers(), &NoProgress);
    assert_eq!(a, b);
    assert_eq!(a.results.len(), tickers().len());
}

#[test]
fn synthetic_records_are_consistent() {
    let report = Screener::from_config(source(), &config()).run(&tickers(), &NoProgress);
    for r in &report.results {
        if r.signal.is_actionable() {
            // Synthetic intraday data is always available.
            assert_ne!(r.confirmation, Confirmation::DataError, "{}", r.instrument);
            assert!(r.entry_price.is_some_and(f64::is_finite));
        } else {
            assert_eq!(r.confirmation, Confirmation::NotApplicable);
            assert_eq!(r.entry_price, None);
            assert_eq!(r.stop_loss, None);
        }
    }
}

#[test]
fn intraday_tables_cover_sixty_days() {
    let table = source().features("SPY", Timeframe::ThirtyMinute).unwrap();
    assert!(table.len() >= 200);
    let first = table.rows()[0].bar.timestamp;
    let last = table.latest().unwrap().bar.timestamp;
    assert!((last - first).num_days() <= 60);
}

#[test]
fn provider_name_is_reported() {
    assert_eq!(source().provider().name(), "synthetic");
}

//! Integration tests for the screening orchestrator with an in-memory
//! feature source.
//!
//! Tests:
//! 1. Daily + intraday Strong → Super Strong with entry and stop
//! 2. Intraday disagreement → Fail, daily Strong kept
//! 3. Intraday unavailable → data-error record without prices
//! 4. Non-strong or missing daily → Hold for now
//! 5. run() keeps input order and reports progress
//! 6. Setups stay out of info-level logs

mod common;

use common::*;
use setupscan_core::data::DataError;
use setupscan_core::risk::RiskParams;
use setupscan_core::signals::SqueezeClassifier;
use setupscan_core::{
    BarTable, Confirmation, DisplaySignal, FeatureRow, FeatureSource, NoProgress, ScreenProgress,
    ScreenReport, ScreenResult, Screener, ScreenerConfig, Timeframe,
};
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Helpers ──────────────────────────────────────────────────────────

#[derive(Default)]
struct MemorySource {
    tables: HashMap<(String, Timeframe), BarTable>,
}

impl MemorySource {
    fn with(mut self, symbol: &str, timeframe: Timeframe, rows: Vec<FeatureRow>) -> Self {
        self.tables.insert((symbol.to_string(), timeframe), table(rows));
        self
    }
}

impl FeatureSource for MemorySource {
    fn features(&self, symbol: &str, timeframe: Timeframe) -> Result<BarTable, DataError> {
        self.tables
            .get(&(symbol.to_string(), timeframe))
            .cloned()
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }
}

fn screener(source: MemorySource) -> Screener<MemorySource> {
    Screener::new(
        source,
        SqueezeClassifier::default(),
        RiskParams::default(),
        Duration::ZERO,
    )
}

fn source() -> MemorySource {
    MemorySource::default()
        // Strong Buy confirmed.
        .with("BULL", Timeframe::Daily, breakout_buy(250))
        .with("BULL", Timeframe::ThirtyMinute, breakout_buy(300))
        // Strong Buy, intraday only a base Buy.
        .with("FAIL", Timeframe::Daily, breakout_buy(250))
        .with("FAIL", Timeframe::ThirtyMinute, rows(300, 100.0, 110.0))
        // Strong Buy, intraday Strong Sell.
        .with("FLIP", Timeframe::Daily, breakout_buy(250))
        .with("FLIP", Timeframe::ThirtyMinute, breakout_sell(300))
        // Strong Buy, no intraday data.
        .with("NOINTRA", Timeframe::Daily, breakout_buy(250))
        // Strong Sell confirmed.
        .with("BEAR", Timeframe::Daily, breakout_sell(250))
        .with("BEAR", Timeframe::ThirtyMinute, breakout_sell(300))
        // Plain Buy.
        .with("FLAT", Timeframe::Daily, rows(250, 100.0, 110.0))
        .with("FLAT", Timeframe::ThirtyMinute, breakout_buy(300))
        // Too short to classify.
        .with("SHORT", Timeframe::Daily, breakout_buy(100))
}

// ── Per-ticker outcomes ──────────────────────────────────────────────

#[test]
fn confirmed_buy_is_super_strong() {
    let result = screener(source()).screen_ticker("BULL");
    assert_eq!(
        result,
        ScreenResult {
            instrument: "BULL".into(),
            signal: DisplaySignal::SuperStrongBuy,
            // Latest 30-minute close.
            entry_price: Some(120.0),
            // max(100 - 2, 108 - 2)
            stop_loss: Some(106.0),
            confirmation: Confirmation::Pass,
        }
    );
}

#[test]
fn confirmed_sell_is_super_strong() {
    let result = screener(source()).screen_ticker("BEAR");
    assert_eq!(result.signal, DisplaySignal::SuperStrongSell);
    assert_eq!(result.confirmation, Confirmation::Pass);
    assert_eq!(result.entry_price, Some(80.0));
    // min(100 + 2, 92 + 2)
    assert_eq!(result.stop_loss, Some(94.0));
}

#[test]
fn unconfirmed_buy_keeps_daily_signal() {
    let result = screener(source()).screen_ticker("FAIL");
    assert_eq!(result.signal, DisplaySignal::StrongBuy);
    assert_eq!(result.confirmation, Confirmation::Fail);
    assert_eq!(result.entry_price, Some(110.0));
    assert_eq!(result.stop_loss, Some(106.0));
}

#[test]
fn opposite_intraday_signal_fails_confirmation() {
    let result = screener(source()).screen_ticker("FLIP");
    assert_eq!(result.signal, DisplaySignal::StrongBuy);
    assert_eq!(result.confirmation, Confirmation::Fail);
}

#[test]
fn missing_intraday_is_data_error() {
    let result = screener(source()).screen_ticker("NOINTRA");
    assert_eq!(
        result,
        ScreenResult {
            instrument: "NOINTRA".into(),
            signal: DisplaySignal::StrongBuy,
            entry_price: None,
            stop_loss: None,
            confirmation: Confirmation::DataError,
        }
    );
}

#[test]
fn weak_daily_signal_skips_intraday() {
    // FLAT has a Strong intraday table, but daily is only Buy.
    assert_eq!(screener(source()).screen_ticker("FLAT"), ScreenResult::hold("FLAT"));
}

#[test]
fn short_or_missing_daily_is_hold() {
    let s = screener(source());
    assert_eq!(s.screen_ticker("SHORT"), ScreenResult::hold("SHORT"));
    assert_eq!(s.screen_ticker("NOPE"), ScreenResult::hold("NOPE"));
}

// ── Batch run ────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl ScreenProgress for Recorder {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("start {symbol} {index}/{total}"));
    }

    fn on_complete(&self, result: &ScreenResult, index: usize, _total: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("done {} {index}", result.instrument));
    }

    fn on_batch_complete(&self, report: &ScreenReport) {
        self.events
            .lock()
            .unwrap()
            .push(format!("batch {}", report.results.len()));
    }
}

#[test]
fn run_keeps_order_and_reports_progress() {
    let tickers: Vec<String> = ["FLAT", "BULL", "NOPE"].map(String::from).to_vec();
    let recorder = Recorder::default();
    let report = screener(source()).run(&tickers, &recorder);

    let instruments: Vec<&str> = report
        .results
        .iter()
        .map(|r| r.instrument.as_str())
        .collect();
    assert_eq!(instruments, tickers);

    assert_eq!(
        *recorder.events.lock().unwrap(),
        vec![
            "start FLAT 0/3",
            "done FLAT 0",
            "start BULL 1/3",
            "done BULL 1",
            "start NOPE 2/3",
            "done NOPE 2",
            "batch 3",
        ]
    );
}

#[test]
fn actionable_filters_hold_rows() {
    let tickers: Vec<String> = ["FLAT", "BULL", "NOINTRA", "SHORT", "BEAR"]
        .map(String::from)
        .to_vec();
    let report = screener(source()).run(&tickers, &NoProgress);
    let actionable: Vec<&str> = report
        .actionable()
        .map(|r| r.instrument.as_str())
        .collect();
    assert_eq!(actionable, vec!["BULL", "NOINTRA", "BEAR"]);
}

#[test]
fn from_config_applies_throttle_and_params() {
    let mut config = ScreenerConfig::default();
    config.screen.throttle_ms = 0;
    config.classifier.squeeze_percentile = 0.0;
    let s = Screener::from_config(source(), &config);
    // Percentile 0 disables the breakout, so BULL is only a Buy.
    assert_eq!(s.screen_ticker("BULL"), ScreenResult::hold("BULL"));
}

#[test]
fn empty_ticker_list_is_empty_report() {
    let report = screener(source()).run(&[], &NoProgress);
    assert!(report.results.is_empty());
    assert_eq!(report.actionable().count(), 0);
}

// ── Log levels ───────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn logged_at(level: tracing::Level, symbol: &str) -> String {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        screener(source()).screen_ticker(symbol);
    });
    let bytes = buf.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[test]
fn setups_are_debug_only_in_logs() {
    // Progress reporters print actionable rows; info-level logs must not repeat them.
    let info = logged_at(tracing::Level::INFO, "BULL");
    assert!(!info.contains("setup found"), "{info}");
    let debug = logged_at(tracing::Level::DEBUG, "BULL");
    assert!(debug.contains("setup found"), "{debug}");
}

#[test]
fn missing_intraday_is_not_logged_at_info() {
    let info = logged_at(tracing::Level::INFO, "NOINTRA");
    assert!(!info.contains("intraday confirmation unavailable"), "{info}");
    assert!(info.contains("data unavailable"), "{info}");
}

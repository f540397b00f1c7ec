//! Screening orchestrator: daily classification, then 30-minute confirmation
//! and a stop-loss for strong setups. One result record per ticker.
//!
//! Tickers are processed one at a time with a fixed pause between them to
//! throttle the data source. A fetch failure never aborts the run: it
//! degrades that ticker to "insufficient data" (daily) or a data-error
//! confirmation (intraday).

use crate::config::ScreenerConfig;
use crate::domain::{Confirmation, ScreenResult, Signal, Timeframe};
use crate::features::{BarTable, FeatureSource};
use crate::risk::{stop_loss, RiskParams};
use crate::signals::SqueezeClassifier;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Run-level knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenParams {
    /// Pause between tickers, in milliseconds.
    pub throttle_ms: u64,
}

impl Default for ScreenParams {
    fn default() -> Self {
        Self { throttle_ms: 1000 }
    }
}

/// Progress callback for a screening run.
pub trait ScreenProgress {
    /// Called before a ticker is screened.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called with the finished record for a ticker.
    fn on_complete(&self, result: &ScreenResult, index: usize, total: usize);

    /// Called once the whole list is done.
    fn on_batch_complete(&self, report: &ScreenReport);
}

/// Prints one status line per ticker.
pub struct StdoutProgress;

impl ScreenProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("Analyzing {symbol}... ({}/{total})", index + 1);
    }

    fn on_complete(&self, result: &ScreenResult, _index: usize, _total: usize) {
        if result.signal.is_actionable() {
            println!("  {}: {} ({})", result.instrument, result.signal, result.confirmation);
        }
    }

    fn on_batch_complete(&self, report: &ScreenReport) {
        println!(
            "\nAnalysis complete: {} screened, {} actionable",
            report.results.len(),
            report.actionable().count()
        );
    }
}

/// Silent progress.
pub struct NoProgress;

impl ScreenProgress for NoProgress {
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}
    fn on_complete(&self, _result: &ScreenResult, _index: usize, _total: usize) {}
    fn on_batch_complete(&self, _report: &ScreenReport) {}
}

/// All records from one run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenReport {
    pub results: Vec<ScreenResult>,
}

impl ScreenReport {
    /// Records that are Strong or Super Strong.
    pub fn actionable(&self) -> impl Iterator<Item = &ScreenResult> {
        self.results.iter().filter(|r| r.signal.is_actionable())
    }
}

pub struct Screener<S> {
    source: S,
    classifier: SqueezeClassifier,
    risk: RiskParams,
    throttle: Duration,
}

impl<S: FeatureSource> Screener<S> {
    pub fn new(
        source: S,
        classifier: SqueezeClassifier,
        risk: RiskParams,
        throttle: Duration,
    ) -> Self {
        Self {
            source,
            classifier,
            risk,
            throttle,
        }
    }

    pub fn from_config(source: S, config: &ScreenerConfig) -> Self {
        Self::new(
            source,
            SqueezeClassifier::new(config.classifier.clone()),
            config.risk.clone(),
            Duration::from_millis(config.screen.throttle_ms),
        )
    }

    /// Table for `symbol`, or `None` when the source cannot provide one.
    fn load(&self, symbol: &str, timeframe: Timeframe) -> Option<BarTable> {
        match self.source.features(symbol, timeframe) {
            Ok(table) => Some(table),
            Err(e) => {
                warn!(%symbol, %timeframe, error = %e, "data unavailable");
                None
            }
        }
    }

    /// Screen one ticker.
    pub fn screen_ticker(&self, symbol: &str) -> ScreenResult {
        let daily = self.load(symbol, Timeframe::Daily);
        let daily_signal = self.classifier.classify(daily.as_ref());

        let (Some(daily), Some(direction)) = (
            daily,
            daily_signal.direction().filter(|_| daily_signal.is_strong()),
        ) else {
            info!(%symbol, daily = %daily_signal, "no daily setup");
            return ScreenResult::hold(symbol);
        };

        let Some(intraday) = self.load(symbol, Timeframe::ThirtyMinute) else {
            debug!(%symbol, daily = %daily_signal, "intraday confirmation unavailable");
            return ScreenResult {
                instrument: symbol.to_string(),
                signal: daily_signal.into(),
                entry_price: None,
                stop_loss: None,
                confirmation: Confirmation::DataError,
            };
        };

        let intraday_signal = self.classifier.classify(Some(&intraday));
        let (signal, confirmation) = if intraday_signal == Signal::strong(direction) {
            (Signal::super_strong(direction), Confirmation::Pass)
        } else {
            (daily_signal, Confirmation::Fail)
        };

        let stop = match stop_loss(&daily, direction, &self.risk) {
            Ok(price) => Some(price),
            Err(e) => {
                warn!(%symbol, error = %e, "stop-loss unavailable");
                None
            }
        };

        let result = ScreenResult {
            instrument: symbol.to_string(),
            signal: signal.into(),
            entry_price: intraday.latest().map(|r| r.bar.close),
            stop_loss: stop,
            confirmation,
        };
        debug!(
            %symbol,
            daily = %daily_signal,
            intraday = %intraday_signal,
            signal = %result.signal,
            confirmation = %result.confirmation,
            "setup found"
        );
        result
    }

    /// Screen every ticker in order, pausing `throttle` between them.
    pub fn run(&self, tickers: &[String], progress: &dyn ScreenProgress) -> ScreenReport {
        let total = tickers.len();
        let mut report = ScreenReport {
            results: Vec::with_capacity(total),
        };

        for (i, symbol) in tickers.iter().enumerate() {
            progress.on_start(symbol, i, total);
            let result = self.screen_ticker(symbol);
            progress.on_complete(&result, i, total);
            report.results.push(result);

            if i + 1 < total && !self.throttle.is_zero() {
                std::thread::sleep(self.throttle);
            }
        }

        progress.on_batch_complete(&report);
        report
    }
}

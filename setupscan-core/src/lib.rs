//! Setupscan Core: market data, indicators, squeeze classifier, risk and the
//! screening loop.
//!
//! Flow per ticker:
//! - Fetch daily bars and build the indicator table
//! - Classify the daily table
//! - On a Strong signal, classify the 30-minute table for confirmation
//! - Compute the ATR-padded stop-loss from the daily table
//! - Emit one `ScreenResult`

pub mod config;
pub mod data;
pub mod domain;
pub mod features;
pub mod indicators;
pub mod risk;
pub mod screen;
pub mod signals;
pub mod tickers;

pub use config::{ConfigError, ScreenerConfig};
pub use domain::{Bar, Confirmation, Direction, DisplaySignal, ScreenResult, Signal, Timeframe};
pub use features::{BarTable, FeatureBuilder, FeatureProvider, FeatureRow, FeatureSource};
pub use screen::{NoProgress, ScreenProgress, ScreenReport, Screener, StdoutProgress};

//! Per-ticker screening result record.

use super::signal::Signal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signal as shown to the user. Anything weaker than Strong collapses to
/// `HoldForNow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplaySignal {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    #[serde(rename = "Strong Sell")]
    StrongSell,
    #[serde(rename = "Super Strong Buy")]
    SuperStrongBuy,
    #[serde(rename = "Super Strong Sell")]
    SuperStrongSell,
    #[serde(rename = "Hold for now")]
    HoldForNow,
}

impl DisplaySignal {
    pub fn is_actionable(self) -> bool {
        self != DisplaySignal::HoldForNow
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplaySignal::StrongBuy => "Strong Buy",
            DisplaySignal::StrongSell => "Strong Sell",
            DisplaySignal::SuperStrongBuy => "Super Strong Buy",
            DisplaySignal::SuperStrongSell => "Super Strong Sell",
            DisplaySignal::HoldForNow => "Hold for now",
        }
    }
}

impl From<Signal> for DisplaySignal {
    fn from(signal: Signal) -> Self {
        match signal {
            Signal::StrongBuy => DisplaySignal::StrongBuy,
            Signal::StrongSell => DisplaySignal::StrongSell,
            Signal::SuperStrongBuy => DisplaySignal::SuperStrongBuy,
            Signal::SuperStrongSell => DisplaySignal::SuperStrongSell,
            Signal::InsufficientData | Signal::Hold | Signal::Buy | Signal::Sell => {
                DisplaySignal::HoldForNow
            }
        }
    }
}

impl fmt::Display for DisplaySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of the 30-minute confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confirmation {
    /// No confirmation attempted (daily signal was not Strong).
    #[serde(rename = "N/A")]
    NotApplicable,
    Pass,
    Fail,
    /// Intraday data could not be fetched.
    #[serde(rename = "30m Data Error")]
    DataError,
}

impl Confirmation {
    pub fn label(self) -> &'static str {
        match self {
            Confirmation::NotApplicable => "N/A",
            Confirmation::Pass => "Pass",
            Confirmation::Fail => "Fail",
            Confirmation::DataError => "30m Data Error",
        }
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the screening output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenResult {
    pub instrument: String,
    pub signal: DisplaySignal,
    pub entry_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub confirmation: Confirmation,
}

impl ScreenResult {
    /// Record for a ticker whose daily signal was not Strong.
    pub fn hold(instrument: impl Into<String>) -> Self {
        Self {
            instrument: instrument.into(),
            signal: DisplaySignal::HoldForNow,
            entry_price: None,
            stop_loss: None,
            confirmation: Confirmation::NotApplicable,
        }
    }
}

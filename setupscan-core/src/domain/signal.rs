//! Signal categories produced by the classifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => f.write_str("Buy"),
            Direction::Sell => f.write_str("Sell"),
        }
    }
}

/// Categorical output of the classifier.
///
/// Strength is monotonic: a Super Strong signal is also Strong, and a Strong
/// signal carries the same direction as its base `Buy`/`Sell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    #[serde(rename = "Insufficient Data")]
    InsufficientData,
    Hold,
    Buy,
    Sell,
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    #[serde(rename = "Strong Sell")]
    StrongSell,
    #[serde(rename = "Super Strong Buy")]
    SuperStrongBuy,
    #[serde(rename = "Super Strong Sell")]
    SuperStrongSell,
}

impl Signal {
    /// Direction of the signal, if it has one.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Signal::Buy | Signal::StrongBuy | Signal::SuperStrongBuy => Some(Direction::Buy),
            Signal::Sell | Signal::StrongSell | Signal::SuperStrongSell => Some(Direction::Sell),
            Signal::InsufficientData | Signal::Hold => None,
        }
    }

    /// True for Strong and Super Strong signals.
    pub fn is_strong(self) -> bool {
        matches!(
            self,
            Signal::StrongBuy | Signal::StrongSell | Signal::SuperStrongBuy | Signal::SuperStrongSell
        )
    }

    pub fn is_super_strong(self) -> bool {
        matches!(self, Signal::SuperStrongBuy | Signal::SuperStrongSell)
    }

    /// Base crossover signal for a direction.
    pub fn base(direction: Direction) -> Self {
        match direction {
            Direction::Buy => Signal::Buy,
            Direction::Sell => Signal::Sell,
        }
    }

    pub fn strong(direction: Direction) -> Self {
        match direction {
            Direction::Buy => Signal::StrongBuy,
            Direction::Sell => Signal::StrongSell,
        }
    }

    pub fn super_strong(direction: Direction) -> Self {
        match direction {
            Direction::Buy => Signal::SuperStrongBuy,
            Direction::Sell => Signal::SuperStrongSell,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Signal::InsufficientData => "Insufficient Data",
            Signal::Hold => "Hold",
            Signal::Buy => "Buy",
            Signal::Sell => "Sell",
            Signal::StrongBuy => "Strong Buy",
            Signal::StrongSell => "Strong Sell",
            Signal::SuperStrongBuy => "Super Strong Buy",
            Signal::SuperStrongSell => "Super Strong Sell",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//! Feature tables and the provider that builds them.
//!
//! `FeatureSource` is the seam the screener depends on: symbol and timeframe
//! in, `BarTable` out. `FeatureProvider` implements it over any
//! `DataProvider`; tests implement it directly with hand-built tables.

pub mod builder;
pub mod table;

pub use builder::{FeatureBuilder, FeatureParams};
pub use table::{BarTable, FeatureRow};

use crate::data::{DataError, DataProvider};
use crate::domain::Timeframe;
use tracing::{debug, warn};

/// Anything that can hand out feature tables.
pub trait FeatureSource {
    fn features(&self, symbol: &str, timeframe: Timeframe) -> Result<BarTable, DataError>;
}

/// Fetches raw bars from a `DataProvider` and builds the indicator table.
pub struct FeatureProvider<P> {
    provider: P,
    builder: FeatureBuilder,
}

impl<P: DataProvider> FeatureProvider<P> {
    pub fn new(provider: P, builder: FeatureBuilder) -> Self {
        Self { provider, builder }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: DataProvider> FeatureSource for FeatureProvider<P> {
    fn features(&self, symbol: &str, timeframe: Timeframe) -> Result<BarTable, DataError> {
        let fetched = self.provider.fetch(symbol, timeframe)?;
        debug!(
            %symbol,
            %timeframe,
            provider = self.provider.name(),
            source = ?fetched.source,
            bars = fetched.bars.len(),
            "fetched raw bars"
        );
        let bars: Vec<_> = fetched
            .bars
            .into_iter()
            .map(|raw| raw.into_bar(symbol))
            .collect();
        let suspect = bars.iter().filter(|b| !b.is_sane()).count();
        if suspect > 0 {
            warn!(%symbol, %timeframe, suspect, "bars with inconsistent OHLC");
        }
        self.builder.build(symbol, timeframe, bars)
    }
}

impl<T: FeatureSource + ?Sized> FeatureSource for &T {
    fn features(&self, symbol: &str, timeframe: Timeframe) -> Result<BarTable, DataError> {
        (**self).features(symbol, timeframe)
    }
}

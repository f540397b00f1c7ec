//! Market data sources.

pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;

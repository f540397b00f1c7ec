//! Domain types: bars, timeframes, signals, result records.

pub mod bar;
pub mod record;
pub mod signal;
pub mod timeframe;

pub use bar::Bar;
pub use record::{Confirmation, DisplaySignal, ScreenResult};
pub use signal::{Direction, Signal};
pub use timeframe::Timeframe;

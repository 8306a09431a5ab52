mod ohlcv;
mod series;
mod symbol_list;
mod ticker_group;
mod timeframe;
pub mod indicators;

pub use ohlcv::{Bar, PriceHistory};
pub use series::{PercentPoint, PercentSeries, SymbolFailure};
pub use symbol_list::{
    normalize_symbol, AddOutcome, SharedSymbolStore, SymbolGroup, SymbolList, SymbolStore,
};
pub use ticker_group::{global_index_groups, IndexGroup, NamedIndex};
pub use timeframe::{ChartInterval, LookbackPeriod};

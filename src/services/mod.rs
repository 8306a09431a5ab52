pub mod dashboard;
pub mod global_indices;
pub mod price_chart;
pub mod quote_client;
pub mod scanner;
pub mod snapshot_store;
pub mod trading_hours;

#[cfg(test)]
pub(crate) mod fake_source;

pub use dashboard::{build_dashboard, DashboardSnapshot, DashboardView, HeadlineQuote};
pub use global_indices::{build_indices, IndicesSnapshot};
pub use price_chart::{build_price_chart, fetch_price_chart, ChartRequest, PriceChart, Signal};
pub use quote_client::{QuoteSource, SharedQuoteSource, YahooClient};
pub use scanner::{build_tables, run_scan, ScanRow, ScannerSnapshot, ScannerTables};
pub use snapshot_store::{
    HealthStats, SharedHealthStats, SharedSnapshotStore, SnapshotStore, WorkerStats,
};
pub use trading_hours::{filter_session, is_trading_hours, TradingSession};

pub mod dashboard_worker;
pub mod indices_worker;
pub mod scanner_worker;

use crate::services::{SharedHealthStats, SharedQuoteSource, SharedSnapshotStore};
use std::time::Duration;

pub use dashboard_worker::run as run_dashboard_worker;
pub use indices_worker::run as run_indices_worker;
pub use scanner_worker::run as run_scanner_worker;

/// Handles every polling worker needs
#[derive(Clone)]
pub struct WorkerContext {
    pub quotes: SharedQuoteSource,
    pub snapshots: SharedSnapshotStore,
    pub health: SharedHealthStats,
    pub poll_interval: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SymbolGroup, SymbolStore};
    use crate::services::fake_source::StaticQuoteSource;
    use crate::services::{HealthStats, SnapshotStore};
    use std::sync::Arc;
    use tempfile::tempdir;
    use tokio::sync::{Mutex, RwLock};

    fn context(source: StaticQuoteSource) -> WorkerContext {
        WorkerContext {
            quotes: Arc::new(source),
            snapshots: Arc::new(SnapshotStore::new()),
            health: Arc::new(RwLock::new(HealthStats::default())),
            poll_interval: Duration::from_secs(60),
        }
    }

    #[tokio::test]
    async fn test_dashboard_cycle_publishes_snapshot() {
        let source = StaticQuoteSource::new()
            .with_daily("RELIANCE.NS", &[100.0, 110.0, 120.0], &[1, 2, 3])
            .with_intraday("RELIANCE.NS", &[111.0, 121.0]);
        let ctx = context(source);

        let dir = tempdir().unwrap();
        let store = SymbolStore::load(dir.path().join("symbols.json")).unwrap();
        let symbols = Arc::new(Mutex::new(store));

        dashboard_worker::run_cycle(&ctx, &symbols, 1).await;

        let snapshot = ctx.snapshots.dashboard().await.unwrap();
        assert!(snapshot.stocks.iter().any(|s| s.symbol == "RELIANCE.NS"));
        assert!(!snapshot.failures.is_empty());

        let health = ctx.health.read().await;
        assert_eq!(health.dashboard.iteration_count, 1);
        assert!(health.dashboard.last_sync.is_some());
        assert_eq!(health.dashboard.last_failure_count, snapshot.failures.len());
    }

    #[tokio::test]
    async fn test_dashboard_cycle_sees_added_symbol() {
        let source = StaticQuoteSource::new()
            .with_daily("AAPL", &[19.0, 20.0, 21.0], &[1, 1, 1])
            .with_intraday("AAPL", &[21.0]);
        let ctx = context(source);

        let dir = tempdir().unwrap();
        let store = SymbolStore::load(dir.path().join("symbols.json")).unwrap();
        let symbols = Arc::new(Mutex::new(store));

        dashboard_worker::run_cycle(&ctx, &symbols, 1).await;
        assert!(!ctx
            .snapshots
            .dashboard()
            .await
            .unwrap()
            .stocks
            .iter()
            .any(|s| s.symbol == "AAPL"));

        symbols.lock().await.add(SymbolGroup::Stocks, "aapl").unwrap();
        dashboard_worker::run_cycle(&ctx, &symbols, 2).await;

        let snapshot = ctx.snapshots.dashboard().await.unwrap();
        let aapl = snapshot.stocks.iter().find(|s| s.symbol == "AAPL").unwrap();
        assert!((aapl.last_percent().unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(ctx.health.read().await.dashboard.iteration_count, 2);
    }

    #[tokio::test]
    async fn test_mixed_case_file_symbol_is_selectable() {
        let source = StaticQuoteSource::new()
            .with_daily("TATAPOWER.NS", &[400.0, 410.0], &[1, 1])
            .with_intraday("TATAPOWER.NS", &[412.0]);
        let ctx = context(source);

        let dir = tempdir().unwrap();
        let path = dir.path().join("symbols.json");
        std::fs::write(&path, r#"{"stocks": ["Tatapower.NS"]}"#).unwrap();
        let symbols = Arc::new(Mutex::new(SymbolStore::load(&path).unwrap()));

        dashboard_worker::run_cycle(&ctx, &symbols, 1).await;

        let view = ctx
            .snapshots
            .dashboard()
            .await
            .unwrap()
            .select(&["tatapower.ns".to_string()], &[]);
        assert_eq!(view.stocks.len(), 1);
        assert_eq!(view.stocks[0].symbol, "TATAPOWER.NS");
        assert!(!view.unavailable.contains(&"TATAPOWER.NS".to_string()));
    }

    #[tokio::test]
    async fn test_scanner_cycle_records_failures() {
        let source = StaticQuoteSource::new()
            .with_daily("TCS.NS", &[100.0, 105.0], &[10, 20])
            .with_daily("INFY.NS", &[100.0, 90.0], &[10, 5]);
        let ctx = context(source);

        scanner_worker::run_cycle(&ctx, 7).await;

        let snapshot = ctx.snapshots.scanner().await.unwrap();
        assert_eq!(snapshot.rows.len(), 2);
        assert_eq!(snapshot.universe_size, crate::constants::NIFTY_50_SYMBOLS.len());

        let health = ctx.health.read().await;
        assert_eq!(health.scanner.iteration_count, 7);
        assert_eq!(
            health.scanner.last_failure_count,
            crate::constants::NIFTY_50_SYMBOLS.len() - 2
        );
    }

    #[tokio::test]
    async fn test_indices_cycle_with_no_data_still_publishes() {
        let ctx = context(StaticQuoteSource::new());

        indices_worker::run_cycle(&ctx, 1).await;

        let snapshot = ctx.snapshots.indices().await.unwrap();
        assert!(snapshot.regions.iter().all(|r| r.series.is_empty()));
        assert!(!snapshot.failures.is_empty());
        assert_eq!(ctx.health.read().await.indices.iteration_count, 1);
    }
}

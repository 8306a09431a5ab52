use crate::error::Result;
use crate::models::{SymbolGroup, SymbolStore};
use crate::server::{self, AppState};
use crate::services::{HealthStats, SharedQuoteSource, SnapshotStore, YahooClient};
use crate::utils::{get_poll_interval, get_quote_base_url, get_symbols_file};
use crate::worker::{self, WorkerContext};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};

pub async fn run(port: u16) -> Result<()> {
    println!("🚀 Starting marketpulse server on port {}", port);

    let symbols_file = get_symbols_file();
    let store = SymbolStore::load(&symbols_file)?;
    let watched = store.list().all_symbols(SymbolGroup::Stocks).len()
        + store.list().all_symbols(SymbolGroup::Indexes).len();
    println!("📁 Symbols file: {} ({} symbols watched)", symbols_file.display(), watched);
    let shared_symbols = Arc::new(Mutex::new(store));

    let base_url = get_quote_base_url();
    println!("🌐 Quote API: {}", base_url);
    let quotes: SharedQuoteSource = Arc::new(YahooClient::new(base_url)?);

    let poll_interval = get_poll_interval();
    let health_stats = HealthStats {
        poll_interval_secs: poll_interval.as_secs(),
        watched_symbols_count: watched,
        ..HealthStats::default()
    };
    let shared_health_stats = Arc::new(RwLock::new(health_stats));
    let shared_snapshots = Arc::new(SnapshotStore::new());

    let ctx = WorkerContext {
        quotes: quotes.clone(),
        snapshots: shared_snapshots.clone(),
        health: shared_health_stats.clone(),
        poll_interval,
    };

    println!("⚡ Spawning dashboard worker (every {}s)...", poll_interval.as_secs());
    let dashboard_ctx = ctx.clone();
    let dashboard_symbols = shared_symbols.clone();
    tokio::spawn(async move {
        worker::run_dashboard_worker(dashboard_ctx, dashboard_symbols).await;
    });

    println!("⚡ Spawning indices worker (every {}s)...", poll_interval.as_secs());
    let indices_ctx = ctx.clone();
    tokio::spawn(async move {
        worker::run_indices_worker(indices_ctx).await;
    });

    println!("⚡ Spawning scanner worker (every {}s)...", poll_interval.as_secs());
    tokio::spawn(async move {
        worker::run_scanner_worker(ctx).await;
    });

    let app_state = AppState {
        snapshots: shared_snapshots,
        health_stats: shared_health_stats,
        symbols: shared_symbols,
        quotes,
        started_at: Instant::now(),
    };

    println!("✅ Server ready, workers will fill data within the first cycle");
    server::serve(app_state, port).await
}

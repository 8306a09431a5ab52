use crate::models::{SharedSymbolStore, SymbolGroup};
use crate::services::{build_dashboard, is_trading_hours};
use crate::worker::WorkerContext;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{info, instrument};

/// One cycle: snapshot the watchlist, fetch, publish, update health
pub async fn run_cycle(ctx: &WorkerContext, symbols: &SharedSymbolStore, iteration: u64) {
    let loop_start = std::time::Instant::now();

    // Copy the list out so the lock is not held across network calls
    let list = symbols.lock().await.list().clone();
    let watched =
        list.all_symbols(SymbolGroup::Stocks).len() + list.all_symbols(SymbolGroup::Indexes).len();

    let snapshot = build_dashboard(ctx.quotes.as_ref(), &list).await;
    let failures = snapshot.failures.len();
    let stocks = snapshot.stocks.len();
    let indexes = snapshot.indexes.len();
    ctx.snapshots.set_dashboard(snapshot).await;

    let loop_duration = loop_start.elapsed();
    {
        let mut health = ctx.health.write().await;
        health.dashboard.last_sync = Some(Utc::now().to_rfc3339());
        health.dashboard.iteration_count = iteration;
        health.dashboard.last_cycle_secs = loop_duration.as_secs_f64();
        health.dashboard.last_failure_count = failures;
        health.watched_symbols_count = watched;
        health.is_trading_hours = is_trading_hours();
    }

    info!(
        iteration,
        stocks,
        indexes,
        failures,
        loop_duration_secs = loop_duration.as_secs_f64(),
        "Dashboard worker: Iteration completed"
    );
}

#[instrument(skip(ctx, symbols))]
pub async fn run(ctx: WorkerContext, symbols: SharedSymbolStore) {
    info!(
        "Starting dashboard worker - every {}s",
        ctx.poll_interval.as_secs()
    );

    let mut iteration_count = 0u64;
    loop {
        iteration_count += 1;
        run_cycle(&ctx, &symbols, iteration_count).await;
        sleep(ctx.poll_interval).await;
    }
}

use crate::constants::NIFTY_50_SYMBOLS;
use crate::services::run_scan;
use crate::worker::WorkerContext;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{info, instrument};

pub async fn run_cycle(ctx: &WorkerContext, iteration: u64) {
    let loop_start = std::time::Instant::now();

    let snapshot = run_scan(ctx.quotes.as_ref(), NIFTY_50_SYMBOLS).await;
    let scanned = snapshot.rows.len();
    let failures = snapshot.failures.len();
    ctx.snapshots.set_scanner(snapshot).await;

    let loop_duration = loop_start.elapsed();
    {
        let mut health = ctx.health.write().await;
        health.scanner.last_sync = Some(Utc::now().to_rfc3339());
        health.scanner.iteration_count = iteration;
        health.scanner.last_cycle_secs = loop_duration.as_secs_f64();
        health.scanner.last_failure_count = failures;
    }

    info!(
        iteration,
        scanned,
        failures,
        loop_duration_secs = loop_duration.as_secs_f64(),
        "Scanner worker: Iteration completed"
    );
}

#[instrument(skip(ctx))]
pub async fn run(ctx: WorkerContext) {
    info!("Starting scanner worker - every {}s", ctx.poll_interval.as_secs());

    let mut iteration_count = 0u64;
    loop {
        iteration_count += 1;
        run_cycle(&ctx, iteration_count).await;
        sleep(ctx.poll_interval).await;
    }
}

use crate::models::global_index_groups;
use crate::services::build_indices;
use crate::worker::WorkerContext;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{info, instrument};

pub async fn run_cycle(ctx: &WorkerContext, iteration: u64) {
    let loop_start = std::time::Instant::now();

    let snapshot = build_indices(ctx.quotes.as_ref(), &global_index_groups()).await;
    let failures = snapshot.failures.len();
    ctx.snapshots.set_indices(snapshot).await;

    let loop_duration = loop_start.elapsed();
    {
        let mut health = ctx.health.write().await;
        health.indices.last_sync = Some(Utc::now().to_rfc3339());
        health.indices.iteration_count = iteration;
        health.indices.last_cycle_secs = loop_duration.as_secs_f64();
        health.indices.last_failure_count = failures;
    }

    info!(
        iteration,
        failures,
        loop_duration_secs = loop_duration.as_secs_f64(),
        "Indices worker: Iteration completed"
    );
}

#[instrument(skip(ctx))]
pub async fn run(ctx: WorkerContext) {
    info!("Starting indices worker - every {}s", ctx.poll_interval.as_secs());

    let mut iteration_count = 0u64;
    loop {
        iteration_count += 1;
        run_cycle(&ctx, iteration_count).await;
        sleep(ctx.poll_interval).await;
    }
}

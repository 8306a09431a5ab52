use crate::services::dashboard::DashboardSnapshot;
use crate::services::global_indices::IndicesSnapshot;
use crate::services::scanner::ScannerSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Latest snapshot of each polled page
///
/// Workers replace a snapshot wholesale at the end of a cycle; readers clone
/// it out. `None` until the first cycle of that worker completes.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    dashboard: RwLock<Option<DashboardSnapshot>>,
    indices: RwLock<Option<IndicesSnapshot>>,
    scanner: RwLock<Option<ScannerSnapshot>>,
}

// Shared snapshot store for passing between tasks
pub type SharedSnapshotStore = Arc<SnapshotStore>;

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn dashboard(&self) -> Option<DashboardSnapshot> {
        self.dashboard.read().await.clone()
    }

    pub async fn set_dashboard(&self, snapshot: DashboardSnapshot) {
        *self.dashboard.write().await = Some(snapshot);
    }

    pub async fn indices(&self) -> Option<IndicesSnapshot> {
        self.indices.read().await.clone()
    }

    pub async fn set_indices(&self, snapshot: IndicesSnapshot) {
        *self.indices.write().await = Some(snapshot);
    }

    pub async fn scanner(&self) -> Option<ScannerSnapshot> {
        self.scanner.read().await.clone()
    }

    pub async fn set_scanner(&self, snapshot: ScannerSnapshot) {
        *self.scanner.write().await = Some(snapshot);
    }
}

/// Per-worker bookkeeping
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorkerStats {
    pub last_sync: Option<String>,
    pub iteration_count: u64,
    pub last_cycle_secs: f64,
    pub last_failure_count: usize,
}

/// Health statistics reported on /health
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthStats {
    pub dashboard: WorkerStats,
    pub indices: WorkerStats,
    pub scanner: WorkerStats,

    // Trading hours info
    pub is_trading_hours: bool,
    pub trading_hours_timezone: String,

    // Configuration
    pub poll_interval_secs: u64,
    pub watched_symbols_count: usize,

    // System info
    pub uptime_secs: u64,
    pub current_system_time: String,
}

impl Default for HealthStats {
    fn default() -> Self {
        Self {
            dashboard: WorkerStats::default(),
            indices: WorkerStats::default(),
            scanner: WorkerStats::default(),
            is_trading_hours: false,
            trading_hours_timezone: crate::constants::DEFAULT_EXCHANGE_TIMEZONE.to_string(),
            poll_interval_secs: crate::constants::DEFAULT_POLL_INTERVAL_SECS,
            watched_symbols_count: 0,
            uptime_secs: 0,
            current_system_time: String::new(),
        }
    }
}

pub type SharedHealthStats = Arc<RwLock<HealthStats>>;

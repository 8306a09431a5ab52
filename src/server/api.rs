use crate::constants::{CHART_INDEXES, SCANNER_TOP_N};
use crate::error::AppError;
use crate::models::{
    normalize_symbol, AddOutcome, ChartInterval, LookbackPeriod, SharedSymbolStore, SymbolFailure,
    SymbolGroup, SymbolList,
};
use crate::server::AppState;
use crate::services::{
    fetch_price_chart, is_trading_hours, ChartRequest, ScanRow, SharedQuoteSource,
    SharedSnapshotStore,
};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

const MAX_SCANNER_LIMIT: usize = 50;

/// HTTP status for an application error
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Network(_) | AppError::NoData(_) | AppError::Parse(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `{"error": ".."}` with the mapped status code
pub fn error_response(err: AppError) -> Response {
    let status = status_for(&err);
    (
        status,
        Json(serde_json::json!({
            "error": err.to_string()
        })),
    )
        .into_response()
}

/// Workers have not finished their first cycle yet
fn not_ready(page: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({
            "error": format!("{} data is not available yet, try again shortly", page)
        })),
    )
        .into_response()
}

/// Query parameters for /api/dashboard
#[derive(Debug, Deserialize, Default)]
pub struct DashboardQuery {
    /// Stock symbols to show (can be repeated: stock=TCS.NS&stock=INFY.NS)
    pub stock: Option<Vec<String>>,

    /// Index symbols to show (can be repeated)
    pub index: Option<Vec<String>>,
}

/// GET /api/dashboard - percent-change series for the selected symbols
///
/// Examples:
/// - /api/dashboard (first three default stocks, first default index)
/// - /api/dashboard?stock=TCS.NS&stock=INFY.NS&index=^NSEBANK
#[instrument(skip(snapshots))]
pub async fn dashboard_handler(
    State(snapshots): State<SharedSnapshotStore>,
    Query(params): Query<DashboardQuery>,
) -> Response {
    let Some(snapshot) = snapshots.dashboard().await else {
        return not_ready("Dashboard");
    };
    let view = snapshot.select(
        &params.stock.unwrap_or_default(),
        &params.index.unwrap_or_default(),
    );
    debug!(
        stocks = view.stocks.len(),
        indexes = view.indexes.len(),
        unavailable = view.unavailable.len(),
        "Returning dashboard"
    );
    (StatusCode::OK, Json(view)).into_response()
}

/// Query parameters for /api/chart
#[derive(Debug, Deserialize, Default)]
pub struct ChartQuery {
    /// Symbol to chart, default ^NSEI
    pub symbol: Option<String>,

    /// Bar interval: 1m (default), 5m, 15m, 30m, 1h, 1d, 1wk
    pub interval: Option<String>,

    /// Lookback period: 1d (default), 5d, 1mo, 3mo, 6mo, 1y
    pub period: Option<String>,
}

impl ChartQuery {
    fn into_request(self) -> Result<ChartRequest, AppError> {
        let symbol = match self.symbol {
            Some(symbol) => normalize_symbol(&symbol)?,
            None => CHART_INDEXES[0].to_string(),
        };
        let interval = match self.interval {
            Some(interval) => interval.parse()?,
            None => ChartInterval::default(),
        };
        let period = match self.period {
            Some(period) => period.parse()?,
            None => LookbackPeriod::default(),
        };
        Ok(ChartRequest {
            symbol,
            interval,
            period,
        })
    }
}

/// GET /api/chart - price chart with EMA 20/50/100 and RSI 14, fetched on demand
#[instrument(skip(quotes))]
pub async fn chart_handler(
    State(quotes): State<SharedQuoteSource>,
    Query(params): Query<ChartQuery>,
) -> Response {
    let request = match params.into_request() {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Invalid chart request");
            return error_response(e);
        }
    };

    match fetch_price_chart(quotes.as_ref(), &request).await {
        Ok(chart) => {
            info!(
                symbol = %chart.symbol,
                interval = %chart.interval,
                period = %chart.period,
                bars = chart.times.len(),
                "Returning price chart"
            );
            (StatusCode::OK, Json(chart)).into_response()
        }
        Err(e) => {
            warn!(symbol = %request.symbol, error = %e, "Price chart unavailable");
            error_response(e)
        }
    }
}

/// Query parameters for /api/indices
#[derive(Debug, Deserialize, Default)]
pub struct IndicesQuery {
    /// Index display names (can be repeated: name=DAX&name=Nasdaq)
    pub name: Option<Vec<String>>,
}

/// GET /api/indices - US and European indices as percent vs previous close
#[instrument(skip(snapshots))]
pub async fn indices_handler(
    State(snapshots): State<SharedSnapshotStore>,
    Query(params): Query<IndicesQuery>,
) -> Response {
    let Some(snapshot) = snapshots.indices().await else {
        return not_ready("Indices");
    };
    let view = snapshot.select(&params.name.unwrap_or_default());
    (StatusCode::OK, Json(view)).into_response()
}

/// Query parameters for /api/scanner
#[derive(Debug, Deserialize, Default)]
pub struct ScannerQuery {
    /// Rows per table, 1..=50 (default 10)
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ScannerResponse {
    pub updated_at: DateTime<Utc>,
    pub universe_size: usize,
    pub scanned: usize,
    pub gainers: Vec<ScanRow>,
    pub losers: Vec<ScanRow>,
    pub highest_volume: Vec<ScanRow>,
    pub failures: Vec<SymbolFailure>,
}

/// GET /api/scanner - top gainers, losers and highest volume of the Nifty 50
#[instrument(skip(snapshots))]
pub async fn scanner_handler(
    State(snapshots): State<SharedSnapshotStore>,
    Query(params): Query<ScannerQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(SCANNER_TOP_N);
    if limit == 0 || limit > MAX_SCANNER_LIMIT {
        warn!(limit, "Invalid scanner limit");
        return error_response(AppError::InvalidInput(format!(
            "limit must be between 1 and {}",
            MAX_SCANNER_LIMIT
        )));
    }

    let Some(snapshot) = snapshots.scanner().await else {
        return not_ready("Scanner");
    };
    let tables = snapshot.tables(limit);
    let response = ScannerResponse {
        updated_at: snapshot.updated_at,
        universe_size: snapshot.universe_size,
        scanned: snapshot.rows.len(),
        gainers: tables.gainers,
        losers: tables.losers,
        highest_volume: tables.highest_volume,
        failures: snapshot.failures,
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[derive(Debug, Serialize)]
pub struct SymbolsResponse {
    /// Defaults followed by additions
    pub stocks: Vec<String>,
    pub indexes: Vec<String>,
    /// User additions only, as stored in the symbols file
    pub additional: SymbolList,
}

/// GET /api/symbols - the effective watchlist
#[instrument(skip(symbols))]
pub async fn list_symbols_handler(State(symbols): State<SharedSymbolStore>) -> Response {
    let store = symbols.lock().await;
    let list = store.list();
    let response = SymbolsResponse {
        stocks: list.all_symbols(SymbolGroup::Stocks),
        indexes: list.all_symbols(SymbolGroup::Indexes),
        additional: list.clone(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Body of POST /api/symbols
#[derive(Debug, Deserialize)]
pub struct AddSymbolRequest {
    pub group: String,
    pub symbol: String,
}

#[derive(Debug, Serialize)]
pub struct SymbolChange {
    pub group: SymbolGroup,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<AddOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
}

/// POST /api/symbols - append a symbol; 201 when added, 200 when already listed
#[instrument(skip(symbols))]
pub async fn add_symbol_handler(
    State(symbols): State<SharedSymbolStore>,
    Json(body): Json<AddSymbolRequest>,
) -> Response {
    let group: SymbolGroup = match body.group.parse() {
        Ok(group) => group,
        Err(e) => return error_response(e),
    };
    let symbol = match normalize_symbol(&body.symbol) {
        Ok(symbol) => symbol,
        Err(e) => return error_response(e),
    };

    let outcome = symbols.lock().await.add(group, &symbol);
    match outcome {
        Ok(outcome) => {
            let status = match outcome {
                AddOutcome::Added => StatusCode::CREATED,
                AddOutcome::AlreadyPresent => StatusCode::OK,
            };
            let change = SymbolChange {
                group,
                symbol,
                outcome: Some(outcome),
                removed: None,
            };
            (status, Json(change)).into_response()
        }
        Err(e) => {
            warn!(%group, %symbol, error = %e, "Failed to add symbol");
            error_response(e)
        }
    }
}

/// DELETE /api/symbols/{group}/{symbol} - drop a user-added symbol
#[instrument(skip(symbols))]
pub async fn remove_symbol_handler(
    State(symbols): State<SharedSymbolStore>,
    Path((group, symbol)): Path<(String, String)>,
) -> Response {
    let group: SymbolGroup = match group.parse() {
        Ok(group) => group,
        Err(e) => return error_response(e),
    };
    let symbol = match normalize_symbol(&symbol) {
        Ok(symbol) => symbol,
        Err(e) => return error_response(e),
    };

    let removed = symbols.lock().await.remove(group, &symbol);
    match removed {
        Ok(true) => {
            let change = SymbolChange {
                group,
                symbol,
                outcome: None,
                removed: Some(true),
            };
            (StatusCode::OK, Json(change)).into_response()
        }
        Ok(false) => error_response(AppError::NotFound(format!(
            "{} is not an additional {} symbol",
            symbol, group
        ))),
        Err(e) => {
            warn!(%group, %symbol, error = %e, "Failed to remove symbol");
            error_response(e)
        }
    }
}

/// GET /health - worker progress and configuration
pub async fn health_handler(State(app_state): State<AppState>) -> Response {
    debug!("Received request for health stats");

    // Try to get health stats with short timeout to avoid lock contention
    let health_snapshot = tokio::time::timeout(
        tokio::time::Duration::from_millis(100),
        app_state.health_stats.read(),
    )
    .await;

    let mut health_stats = match health_snapshot {
        Ok(health) => health.clone(),
        Err(_) => {
            warn!("Health stats lock timeout");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "error": "health stats are busy, try again shortly"
                })),
            )
                .into_response();
        }
    };

    health_stats.uptime_secs = app_state.started_at.elapsed().as_secs();
    health_stats.is_trading_hours = is_trading_hours();
    health_stats.current_system_time = Utc::now().to_rfc3339();

    // No logging for /health endpoint (too noisy)

    (StatusCode::OK, Json(health_stats)).into_response()
}

use crate::error::{AppError, Result};
use crate::models::indicators::fill_gaps;
use crate::models::{Bar, ChartInterval, LookbackPeriod, PriceHistory};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Anything that can return OHLCV bars for a ticker
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn history(
        &self,
        symbol: &str,
        interval: ChartInterval,
        period: LookbackPeriod,
    ) -> Result<PriceHistory>;
}

pub type SharedQuoteSource = Arc<dyn QuoteSource>;

/// Client for the unauthenticated Yahoo Finance v8 chart endpoint
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - API host (e.g., "https://query1.finance.yahoo.com")
    pub fn new(base_url: String) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Invalid base_url: must start with http:// or https://, got: '{}'",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        info!("Created YahooClient: base_url='{}'", base_url);

        Ok(Self { base_url, client })
    }

    fn chart_url(&self, symbol: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| AppError::Config(format!("Invalid base_url '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Config(format!("base_url cannot hold a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(&["v8", "finance", "chart", symbol]);
        Ok(url)
    }
}

#[async_trait]
impl QuoteSource for YahooClient {
    /// GET /v8/finance/chart/{symbol}?interval={interval}&range={period}
    async fn history(
        &self,
        symbol: &str,
        interval: ChartInterval,
        period: LookbackPeriod,
    ) -> Result<PriceHistory> {
        let url = self.chart_url(symbol)?;
        debug!(%symbol, %interval, %period, "Fetching chart from {}", url);

        let response = self
            .client
            .get(url)
            .query(&[("interval", interval.as_str()), ("range", period.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request for {} failed: {}", symbol, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))?;

        // Yahoo reports unknown symbols as 404 with a JSON error object
        if !status.is_success() && !body.trim_start().starts_with('{') {
            return Err(AppError::Network(format!(
                "Quote API returned error status {} for {}",
                status, symbol
            )));
        }

        let history = parse_chart_response(symbol, &body)?;
        debug!(%symbol, bars = history.len(), "Chart parsed");
        Ok(history)
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

/// Turn a chart payload into bars
///
/// Rows where every price is null are dropped, close gaps are forward- then
/// back-filled, missing open/high/low fall back to the close and missing
/// volume to zero.
pub fn parse_chart_response(symbol: &str, body: &str) -> Result<PriceHistory> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| AppError::Parse(format!("Failed to parse chart for {}: {}", symbol, e)))?;

    if let Some(error) = envelope.chart.error {
        return Err(AppError::NoData(format!(
            "{} ({}: {})",
            symbol, error.code, error.description
        )));
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AppError::NoData(symbol.to_string()))?;

    let timezone = result.meta.and_then(|m| m.exchange_timezone_name);
    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut rows = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let open = at(&quote.open, i);
        let high = at(&quote.high, i);
        let low = at(&quote.low, i);
        let close = at(&quote.close, i);
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
            continue;
        }
        let time = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| AppError::Parse(format!("Invalid timestamp {} for {}", ts, symbol)))?;
        let volume = at(&quote.volume, i).map(|v| v.max(0.0) as u64).unwrap_or(0);
        rows.push((time, open, high, low, close, volume));
    }

    let closes: Vec<Option<f64>> = rows.iter().map(|r| r.4).collect();
    let filled = fill_gaps(&closes).ok_or_else(|| AppError::NoData(symbol.to_string()))?;

    let bars = rows
        .into_iter()
        .zip(filled)
        .map(|((time, open, high, low, _, volume), close)| {
            Bar::new(
                time,
                open.unwrap_or(close),
                high.unwrap_or(close),
                low.unwrap_or(close),
                close,
                volume,
            )
        })
        .collect();

    let mut history = PriceHistory::new(symbol, bars);
    history.timezone = timezone;
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "^NSEI", "exchangeTimezoneName": "Asia/Kolkata"},
                "timestamp": [1720410300, 1720410360, 1720410420, 1720410480],
                "indicators": {"quote": [{
                    "open":   [24300.5, null, null, 24310.0],
                    "high":   [24305.0, null, 24312.0, 24315.0],
                    "low":    [24298.0, null, 24301.0, 24308.0],
                    "close":  [24302.0, null, null, 24312.5],
                    "volume": [0, null, 1200, 3400]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_response() {
        let history = parse_chart_response("^NSEI", SAMPLE).unwrap();

        assert_eq!(history.symbol, "^NSEI");
        assert_eq!(history.timezone.as_deref(), Some("Asia/Kolkata"));
        // second row has no prices at all and is dropped
        assert_eq!(history.len(), 3);
        // third row has no close: forward-filled from the first
        assert_eq!(history.closes(), vec![24302.0, 24302.0, 24312.5]);
        assert_eq!(history.bars[1].open, 24302.0);
        assert_eq!(history.bars[1].high, 24312.0);
        assert_eq!(history.bars[1].volume, 1200);
        assert_eq!(history.bars[0].time.timestamp(), 1720410300);
    }

    #[test]
    fn test_leading_gap_is_back_filled() {
        let body = r#"{"chart": {"result": [{
            "timestamp": [1, 2],
            "indicators": {"quote": [{"open": [5.0, 6.0], "close": [null, 6.5]}]}
        }], "error": null}}"#;
        let history = parse_chart_response("X", body).unwrap();
        assert_eq!(history.closes(), vec![6.5, 6.5]);
        assert_eq!(history.bars[0].volume, 0);
        assert!(history.timezone.is_none());
    }

    #[test]
    fn test_error_object_maps_to_no_data() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        match parse_chart_response("BAD.NS", body) {
            Err(AppError::NoData(msg)) => assert!(msg.contains("BAD.NS")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_no_closes_is_no_data() {
        let body = r#"{"chart": {"result": [{"timestamp": [], "indicators": {"quote": [{}]}}], "error": null}}"#;
        assert!(matches!(parse_chart_response("X", body), Err(AppError::NoData(_))));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(parse_chart_response("X", "<html>"), Err(AppError::Parse(_))));
    }

    #[test]
    fn test_chart_url_encodes_symbol() {
        let client = YahooClient::new("https://query1.finance.yahoo.com/".to_string()).unwrap();
        let url = client.chart_url("M&M.NS").unwrap();
        assert_eq!(
            url.as_str(),
            "https://query1.finance.yahoo.com/v8/finance/chart/M&M.NS"
        );
        let url = client.chart_url("a/b").unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/a%2Fb");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            YahooClient::new("ftp://example.com".to_string()),
            Err(AppError::Config(_))
        ));
    }

    const DELISTED: &str =
        r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "delisted"}}}"#;

    async fn chart_route(
        axum::extract::Path(symbol): axum::extract::Path<String>,
        axum::extract::Query(params): axum::extract::Query<HashMap<String, String>>,
    ) -> (axum::http::StatusCode, String) {
        use axum::http::StatusCode;

        if params.get("interval").map(String::as_str) != Some("1m")
            || params.get("range").map(String::as_str) != Some("1d")
        {
            return (StatusCode::BAD_REQUEST, "bad query".to_string());
        }
        match symbol.as_str() {
            "DOWN" => (StatusCode::SERVICE_UNAVAILABLE, "upstream down".to_string()),
            "GONE" => (StatusCode::NOT_FOUND, DELISTED.to_string()),
            _ => (StatusCode::OK, SAMPLE.to_string()),
        }
    }

    async fn spawn_chart_server() -> String {
        let app = axum::Router::new()
            .route("/v8/finance/chart/{symbol}", axum::routing::get(chart_route));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_history_over_http() {
        let client = YahooClient::new(spawn_chart_server().await).unwrap();

        let history = client
            .history("TCS.NS", ChartInterval::Minute1, LookbackPeriod::Day1)
            .await
            .unwrap();
        assert_eq!(history.symbol, "TCS.NS");
        assert!(!history.is_empty());

        let down = client
            .history("DOWN", ChartInterval::Minute1, LookbackPeriod::Day1)
            .await;
        assert!(matches!(down, Err(AppError::Network(_))));

        let gone = client
            .history("GONE", ChartInterval::Minute1, LookbackPeriod::Day1)
            .await;
        assert!(matches!(gone, Err(AppError::NoData(_))));
    }
}

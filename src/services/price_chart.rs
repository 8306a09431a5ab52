//! Single-index price chart with EMA overlays and RSI

use crate::constants::{EMA_PERIODS, RSI_BEARISH_BELOW, RSI_BULLISH_ABOVE, RSI_PERIOD};
use crate::error::{AppError, Result};
use crate::models::indicators::{
    calculate_ema, calculate_rsi, last_value, normalize_optional, normalize_to_first,
};
use crate::models::{ChartInterval, LookbackPeriod, PriceHistory};
use crate::services::quote_client::QuoteSource;
use crate::services::trading_hours::{filter_session, TradingSession};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Bullish,
    Bearish,
    Neutral,
}

/// Price above the EMA is bullish, anything else bearish
pub fn ema_signal(price: f64, ema: f64) -> Signal {
    if price > ema {
        Signal::Bullish
    } else {
        Signal::Bearish
    }
}

/// RSI above 60 is bullish, below 40 bearish, otherwise neutral
pub fn rsi_zone(rsi: f64) -> Signal {
    if rsi > RSI_BULLISH_ABOVE {
        Signal::Bullish
    } else if rsi < RSI_BEARISH_BELOW {
        Signal::Bearish
    } else {
        Signal::Neutral
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmaLine {
    pub period: usize,
    pub latest: Option<f64>,
    pub signal: Option<Signal>,
    /// EMA as percent change against the first close, `None` during warm-up
    pub points: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiLine {
    pub period: usize,
    pub latest: Option<f64>,
    pub zone: Option<Signal>,
    pub points: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChart {
    pub symbol: String,
    pub interval: ChartInterval,
    pub period: LookbackPeriod,
    pub updated_at: DateTime<Utc>,
    pub current_price: f64,
    pub first_close: f64,
    pub times: Vec<DateTime<Utc>>,
    /// Closes as percent change against the first close
    pub price_percent: Vec<f64>,
    pub emas: Vec<EmaLine>,
    pub rsi: RsiLine,
}

/// What to chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub symbol: String,
    pub interval: ChartInterval,
    pub period: LookbackPeriod,
}

/// Compute the chart from already fetched bars
///
/// Intraday bars are clipped to the exchange session before any indicator is
/// computed.
pub fn build_price_chart(
    history: &PriceHistory,
    interval: ChartInterval,
    period: LookbackPeriod,
) -> Result<PriceChart> {
    let history = if interval.is_intraday() {
        filter_session(history, &TradingSession::default())
    } else {
        history.clone()
    };

    let closes = history.closes();
    let (first_close, current_price) = match (closes.first(), closes.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(AppError::NoData(format!("{}: no bars in session", history.symbol))),
    };

    let emas = EMA_PERIODS
        .iter()
        .map(|&p| {
            let ema = calculate_ema(&closes, p);
            let latest = last_value(&ema);
            EmaLine {
                period: p,
                latest,
                signal: latest.map(|value| ema_signal(current_price, value)),
                points: normalize_optional(&ema, first_close),
            }
        })
        .collect();

    let rsi_points = calculate_rsi(&closes, RSI_PERIOD);
    let rsi_latest = last_value(&rsi_points);

    Ok(PriceChart {
        symbol: history.symbol.clone(),
        interval,
        period,
        updated_at: Utc::now(),
        current_price,
        first_close,
        times: history.times(),
        price_percent: normalize_to_first(&closes),
        emas,
        rsi: RsiLine {
            period: RSI_PERIOD,
            latest: rsi_latest,
            zone: rsi_latest.map(rsi_zone),
            points: rsi_points,
        },
    })
}

/// Fetch and build in one go
pub async fn fetch_price_chart(
    source: &dyn QuoteSource,
    request: &ChartRequest,
) -> Result<PriceChart> {
    let history = source
        .history(&request.symbol, request.interval, request.period)
        .await?;
    build_price_chart(&history, request.interval, request.period)
}

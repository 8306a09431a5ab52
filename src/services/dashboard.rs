//! Stock & index dashboard
//!
//! Every watched symbol is charted as percent change from the previous
//! session's close using 1-minute bars of the current session. Three index
//! headline quotes sit on top.

use crate::constants::{
    DEFAULT_INDEXES, DEFAULT_SELECTED_INDEXES, DEFAULT_SELECTED_STOCKS, DEFAULT_STOCKS,
    HEADLINE_INDEXES,
};
use crate::error::{AppError, Result};
use crate::models::indicators::percent_change;
use crate::models::{
    ChartInterval, LookbackPeriod, PercentSeries, PriceHistory, SymbolFailure, SymbolGroup,
    SymbolList,
};
use crate::services::quote_client::QuoteSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Latest price and change of a headline index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineQuote {
    pub label: String,
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub direction: Direction,
}

impl HeadlineQuote {
    /// Latest daily close against the one before it
    ///
    /// This is the same previous close the intraday series use as their base,
    /// so the headline change agrees with the last point of the index chart.
    pub fn from_daily(label: &str, daily: &PriceHistory) -> Result<Self> {
        let (current, previous) = match (daily.nth_from_end(0), daily.nth_from_end(1)) {
            (Some(c), Some(p)) => (c.close, p.close),
            _ => return Err(AppError::NoData(format!("{}: need two daily closes", daily.symbol))),
        };
        let (change, change_percent) = percent_change(current, previous);
        Ok(Self {
            label: label.to_string(),
            symbol: daily.symbol.clone(),
            price: current,
            change,
            change_percent,
            direction: if change > 0.0 { Direction::Up } else { Direction::Down },
        })
    }
}

/// Everything the dashboard worker fetched in one cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub updated_at: DateTime<Utc>,
    pub headlines: Vec<HeadlineQuote>,
    pub stocks: Vec<PercentSeries>,
    pub indexes: Vec<PercentSeries>,
    pub failures: Vec<SymbolFailure>,
}

/// The part of a snapshot a client asked for
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub updated_at: DateTime<Utc>,
    pub headlines: Vec<HeadlineQuote>,
    pub stocks: Vec<PercentSeries>,
    pub indexes: Vec<PercentSeries>,
    /// Requested symbols with no series this cycle
    pub unavailable: Vec<String>,
    pub failures: Vec<SymbolFailure>,
}

impl DashboardSnapshot {
    /// Filter to the requested symbols, in request order
    ///
    /// An empty request falls back to the default selection (first three
    /// default stocks, first default index).
    pub fn select(&self, stocks: &[String], indexes: &[String]) -> DashboardView {
        let stocks = selection_or_default(stocks, DEFAULT_STOCKS, DEFAULT_SELECTED_STOCKS);
        let indexes = selection_or_default(indexes, DEFAULT_INDEXES, DEFAULT_SELECTED_INDEXES);

        let mut unavailable = Vec::new();
        let mut pick = |wanted: &[String], pool: &[PercentSeries]| -> Vec<PercentSeries> {
            wanted
                .iter()
                .filter_map(|symbol| {
                    let found = pool.iter().find(|s| &s.symbol == symbol).cloned();
                    if found.is_none() {
                        unavailable.push(symbol.clone());
                    }
                    found
                })
                .collect()
        };

        let stocks = pick(&stocks, &self.stocks);
        let indexes = pick(&indexes, &self.indexes);

        DashboardView {
            updated_at: self.updated_at,
            headlines: self.headlines.clone(),
            stocks,
            indexes,
            unavailable,
            failures: self.failures.clone(),
        }
    }
}

fn selection_or_default(requested: &[String], defaults: &[&str], take: usize) -> Vec<String> {
    if requested.is_empty() {
        defaults.iter().take(take).map(|s| s.to_string()).collect()
    } else {
        requested.iter().map(|s| s.trim().to_uppercase()).collect()
    }
}

/// Intraday percent series against the previous close taken from `daily`
pub fn intraday_series(intraday: &PriceHistory, daily: &PriceHistory) -> Result<PercentSeries> {
    let previous_close = daily
        .nth_from_end(1)
        .map(|b| b.close)
        .ok_or_else(|| AppError::NoData(format!("{}: no previous close", daily.symbol)))?;
    if intraday.is_empty() {
        return Err(AppError::NoData(format!("{}: no intraday bars", intraday.symbol)));
    }
    Ok(PercentSeries::from_history(intraday, intraday.symbol.clone(), previous_close))
}

/// Daily 5d histories fetched once per cycle and shared between the
/// previous-close lookup and the headline quotes
struct DailyCache<'a> {
    source: &'a dyn QuoteSource,
    entries: HashMap<String, std::result::Result<PriceHistory, String>>,
}

impl<'a> DailyCache<'a> {
    fn new(source: &'a dyn QuoteSource) -> Self {
        Self {
            source,
            entries: HashMap::new(),
        }
    }

    async fn get(&mut self, symbol: &str) -> Result<PriceHistory> {
        if !self.entries.contains_key(symbol) {
            let fetched = self
                .source
                .history(symbol, ChartInterval::Day1, LookbackPeriod::Day5)
                .await
                .map_err(|e| e.to_string());
            self.entries.insert(symbol.to_string(), fetched);
        }
        match self.entries.get(symbol) {
            Some(Ok(history)) => Ok(history.clone()),
            Some(Err(message)) => Err(AppError::Other(message.clone())),
            None => Err(AppError::NoData(symbol.to_string())),
        }
    }
}

async fn fetch_symbol(cache: &mut DailyCache<'_>, symbol: &str) -> Result<PercentSeries> {
    let intraday = cache
        .source
        .history(symbol, ChartInterval::Minute1, LookbackPeriod::Day1)
        .await?;
    let daily = cache.get(symbol).await?;
    intraday_series(&intraday, &daily)
}

/// Fetch every watched symbol sequentially and build a snapshot
///
/// A symbol whose fetch fails is logged, recorded in `failures` and left out.
pub async fn build_dashboard(source: &dyn QuoteSource, symbols: &SymbolList) -> DashboardSnapshot {
    let mut cache = DailyCache::new(source);
    let mut failures = Vec::new();
    let mut stocks = Vec::new();
    let mut indexes = Vec::new();

    for group in [SymbolGroup::Stocks, SymbolGroup::Indexes] {
        for symbol in symbols.all_symbols(group) {
            match fetch_symbol(&mut cache, &symbol).await {
                Ok(series) => {
                    debug!(%symbol, points = series.points.len(), "Dashboard series built");
                    match group {
                        SymbolGroup::Stocks => stocks.push(series),
                        SymbolGroup::Indexes => indexes.push(series),
                    }
                }
                Err(e) => {
                    warn!(%symbol, error = %e, "Dashboard: skipping symbol");
                    failures.push(SymbolFailure::new(symbol, e));
                }
            }
        }
    }

    let mut headlines = Vec::new();
    for (label, symbol) in HEADLINE_INDEXES {
        match cache.get(symbol).await.and_then(|daily| HeadlineQuote::from_daily(label, &daily)) {
            Ok(quote) => headlines.push(quote),
            Err(e) => {
                warn!(%symbol, error = %e, "Dashboard: headline unavailable");
                if !failures.iter().any(|f: &SymbolFailure| f.symbol == *symbol) {
                    failures.push(SymbolFailure::new(*symbol, e));
                }
            }
        }
    }

    DashboardSnapshot {
        updated_at: Utc::now(),
        headlines,
        stocks,
        indexes,
        failures,
    }
}

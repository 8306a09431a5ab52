//! In-memory quote source for tests

use crate::error::{AppError, Result};
use crate::models::{Bar, ChartInterval, LookbackPeriod, PriceHistory};
use crate::services::quote_client::QuoteSource;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct StaticQuoteSource {
    histories: HashMap<(String, ChartInterval, LookbackPeriod), PriceHistory>,
    calls: Mutex<Vec<String>>,
}

impl StaticQuoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        symbol: &str,
        interval: ChartInterval,
        period: LookbackPeriod,
        history: PriceHistory,
    ) -> Self {
        self.histories
            .insert((symbol.to_string(), interval, period), history);
        self
    }

    /// Daily 5d bars with the given closes and volumes
    pub fn with_daily(self, symbol: &str, closes: &[f64], volumes: &[u64]) -> Self {
        let history = daily_history(symbol, closes, volumes);
        self.with(symbol, ChartInterval::Day1, LookbackPeriod::Day5, history)
    }

    /// 1m/1d bars starting at 09:15 IST
    pub fn with_intraday(self, symbol: &str, closes: &[f64]) -> Self {
        let history = minute_history(symbol, closes);
        self.with(symbol, ChartInterval::Minute1, LookbackPeriod::Day1, history)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl QuoteSource for StaticQuoteSource {
    async fn history(
        &self,
        symbol: &str,
        interval: ChartInterval,
        period: LookbackPeriod,
    ) -> Result<PriceHistory> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{}:{}:{}", symbol, interval, period));
        }
        self.histories
            .get(&(symbol.to_string(), interval, period))
            .cloned()
            .ok_or_else(|| AppError::NoData(symbol.to_string()))
    }
}

/// 2024-07-08 09:15 IST
pub fn session_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 8, 3, 45, 0).unwrap()
}

pub fn daily_history(symbol: &str, closes: &[f64], volumes: &[u64]) -> PriceHistory {
    let day0 = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let volume = volumes.get(i).copied().unwrap_or(0);
            Bar::new(day0 + Duration::days(i as i64), c, c, c, c, volume)
        })
        .collect();
    PriceHistory::new(symbol, bars).with_timezone("Asia/Kolkata")
}

pub fn minute_history(symbol: &str, closes: &[f64]) -> PriceHistory {
    let start = session_start();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(start + Duration::minutes(i as i64), c, c, c, c, 100))
        .collect();
    PriceHistory::new(symbol, bars).with_timezone("Asia/Kolkata")
}

//! Nifty 50 scanner: top gainers, losers and volume leaders
//!
//! Each symbol is reduced to one row from its last two daily bars, then the
//! rows are sorted on a single column and truncated.

use crate::error::{AppError, Result};
use crate::models::indicators::{percent_change, volume_change_percent};
use crate::models::{ChartInterval, LookbackPeriod, PriceHistory, SymbolFailure};
use crate::services::quote_client::QuoteSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// One scrip's latest session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRow {
    pub symbol: String,
    pub close: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub volume_change_percent: Option<f64>,
}

impl ScanRow {
    /// Latest daily bar against the one before it
    pub fn from_daily(daily: &PriceHistory) -> Result<Self> {
        let (current, previous) = match (daily.nth_from_end(0), daily.nth_from_end(1)) {
            (Some(c), Some(p)) => (c, p),
            _ => return Err(AppError::NoData(format!("{}: need two daily bars", daily.symbol))),
        };
        let (_, change_percent) = percent_change(current.close, previous.close);
        Ok(Self {
            symbol: daily.symbol.clone(),
            close: current.close,
            change_percent,
            volume: current.volume,
            volume_change_percent: volume_change_percent(current.volume, previous.volume),
        })
    }
}

/// The three scanner tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerTables {
    pub gainers: Vec<ScanRow>,
    pub losers: Vec<ScanRow>,
    pub highest_volume: Vec<ScanRow>,
}

/// Rows from the last scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerSnapshot {
    pub updated_at: DateTime<Utc>,
    pub universe_size: usize,
    pub rows: Vec<ScanRow>,
    pub failures: Vec<SymbolFailure>,
}

impl ScannerSnapshot {
    pub fn tables(&self, limit: usize) -> ScannerTables {
        build_tables(&self.rows, limit)
    }
}

fn by_change_desc(a: &ScanRow, b: &ScanRow) -> Ordering {
    b.change_percent
        .partial_cmp(&a.change_percent)
        .unwrap_or(Ordering::Equal)
}

/// Highest change first; rows without a finite change are left out
///
/// The sort is stable, so ties keep universe order.
pub fn top_gainers(rows: &[ScanRow], n: usize) -> Vec<ScanRow> {
    let mut ranked: Vec<ScanRow> = rows
        .iter()
        .filter(|r| r.change_percent.is_finite())
        .cloned()
        .collect();
    ranked.sort_by(by_change_desc);
    ranked.truncate(n);
    ranked
}

/// Lowest change first, drawn from rows not listed in `exclude`
pub fn top_losers(rows: &[ScanRow], n: usize, exclude: &[ScanRow]) -> Vec<ScanRow> {
    let mut ranked: Vec<ScanRow> = rows
        .iter()
        .filter(|r| r.change_percent.is_finite())
        .filter(|r| !exclude.iter().any(|e| e.symbol == r.symbol))
        .cloned()
        .collect();
    ranked.sort_by(|a, b| by_change_desc(b, a));
    ranked.truncate(n);
    ranked
}

/// Largest latest-session volume first
pub fn highest_volume(rows: &[ScanRow], n: usize) -> Vec<ScanRow> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| b.volume.cmp(&a.volume));
    ranked.truncate(n);
    ranked
}

/// Gainers, then losers from what is left, then volume leaders
pub fn build_tables(rows: &[ScanRow], n: usize) -> ScannerTables {
    let gainers = top_gainers(rows, n);
    let losers = top_losers(rows, n, &gainers);
    ScannerTables {
        highest_volume: highest_volume(rows, n),
        gainers,
        losers,
    }
}

/// Fetch 5 daily bars for each symbol in turn and keep the ones that parse
pub async fn run_scan(source: &dyn QuoteSource, symbols: &[&str]) -> ScannerSnapshot {
    let mut rows = Vec::with_capacity(symbols.len());
    let mut failures = Vec::new();

    for symbol in symbols {
        let row = source
            .history(symbol, ChartInterval::Day1, LookbackPeriod::Day5)
            .await
            .and_then(|daily| ScanRow::from_daily(&daily));
        match row {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!(%symbol, error = %e, "Scanner: skipping symbol");
                failures.push(SymbolFailure::new(*symbol, e));
            }
        }
    }

    debug!(scanned = rows.len(), failed = failures.len(), "Scan completed");

    ScannerSnapshot {
        updated_at: Utc::now(),
        universe_size: symbols.len(),
        rows,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fake_source::{daily_history, StaticQuoteSource};

    fn row(symbol: &str, change_percent: f64, volume: u64) -> ScanRow {
        ScanRow {
            symbol: symbol.to_string(),
            close: 100.0,
            change_percent,
            volume,
            volume_change_percent: None,
        }
    }

    fn symbols(rows: &[ScanRow]) -> Vec<&str> {
        rows.iter().map(|r| r.symbol.as_str()).collect()
    }

    #[test]
    fn test_scan_row_from_daily() {
        let daily = daily_history("ITC.NS", &[400.0, 420.0, 441.0], &[10, 1000, 1500]);
        let row = ScanRow::from_daily(&daily).unwrap();
        assert_eq!(row.close, 441.0);
        assert!((row.change_percent - 5.0).abs() < 1e-9);
        assert_eq!(row.volume, 1500);
        assert!((row.volume_change_percent.unwrap() - 50.0).abs() < 1e-9);

        let short = daily_history("ITC.NS", &[400.0], &[]);
        assert!(ScanRow::from_daily(&short).is_err());
    }

    #[test]
    fn test_rankings() {
        let rows = vec![
            row("A", 1.0, 500),
            row("B", -2.0, 900),
            row("C", 3.0, 100),
            row("D", -0.5, 700),
            row("E", f64::NAN, 800),
        ];

        assert_eq!(symbols(&top_gainers(&rows, 2)), vec!["C", "A"]);
        assert_eq!(symbols(&top_losers(&rows, 2, &[])), vec!["B", "D"]);
        assert_eq!(symbols(&highest_volume(&rows, 3)), vec!["B", "E", "D"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let rows = vec![row("X", 1.0, 5), row("Y", 1.0, 5), row("Z", 1.0, 5)];
        assert_eq!(symbols(&top_gainers(&rows, 2)), vec!["X", "Y"]);
        assert_eq!(symbols(&highest_volume(&rows, 2)), vec!["X", "Y"]);
    }

    #[test]
    fn test_gainers_and_losers_are_disjoint() {
        let rows: Vec<ScanRow> = (0..7)
            .map(|i| row(&format!("S{}", i), i as f64 - 3.0, 100))
            .collect();

        for n in 1..rows.len() {
            let tables = build_tables(&rows, n);
            for loser in &tables.losers {
                assert!(
                    !tables.gainers.iter().any(|g| g.symbol == loser.symbol),
                    "n = {}: {} listed twice",
                    n,
                    loser.symbol
                );
            }
            assert_eq!(tables.gainers.len(), n);
            assert_eq!(tables.losers.len(), n.min(rows.len() - n));
        }
    }

    #[tokio::test]
    async fn test_run_scan() {
        let source = StaticQuoteSource::new()
            .with_daily("TCS.NS", &[3000.0, 3090.0], &[100, 200])
            .with_daily("INFY.NS", &[1500.0, 1470.0], &[300, 150])
            .with_daily("SBIN.NS", &[800.0], &[100]);

        let snapshot = run_scan(&source, &["TCS.NS", "INFY.NS", "SBIN.NS", "LT.NS"]).await;

        assert_eq!(snapshot.universe_size, 4);
        assert_eq!(snapshot.rows.len(), 2);
        assert_eq!(snapshot.failures.len(), 2);

        let tables = snapshot.tables(10);
        assert_eq!(symbols(&tables.gainers), vec!["TCS.NS", "INFY.NS"]);
        assert!(tables.losers.is_empty());
        assert_eq!(symbols(&tables.highest_volume), vec!["TCS.NS", "INFY.NS"]);
    }
}

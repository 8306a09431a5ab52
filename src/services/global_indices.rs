//! US and European index tracker

use crate::error::{AppError, Result};
use crate::models::{
    ChartInterval, IndexGroup, LookbackPeriod, NamedIndex, PercentSeries, SymbolFailure,
};
use crate::services::quote_client::QuoteSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSeries {
    pub region: String,
    pub series: Vec<PercentSeries>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicesSnapshot {
    pub updated_at: DateTime<Utc>,
    pub regions: Vec<RegionSeries>,
    pub failures: Vec<SymbolFailure>,
}

impl IndicesSnapshot {
    /// Keep only the named indices (case-insensitive); empty keeps all
    pub fn select(&self, names: &[String]) -> IndicesSnapshot {
        if names.is_empty() {
            return self.clone();
        }
        IndicesSnapshot {
            updated_at: self.updated_at,
            regions: self
                .regions
                .iter()
                .map(|r| RegionSeries {
                    region: r.region.clone(),
                    series: r
                        .series
                        .iter()
                        .filter(|s| names.iter().any(|n| n.eq_ignore_ascii_case(&s.label)))
                        .cloned()
                        .collect(),
                })
                .collect(),
            failures: self.failures.clone(),
        }
    }
}

async fn fetch_index(source: &dyn QuoteSource, index: &NamedIndex) -> Result<PercentSeries> {
    let intraday = source
        .history(&index.symbol, ChartInterval::Minute1, LookbackPeriod::Day1)
        .await?;
    let daily = source
        .history(&index.symbol, ChartInterval::Day1, LookbackPeriod::Day5)
        .await?;
    let previous_close = daily
        .nth_from_end(1)
        .map(|b| b.close)
        .ok_or_else(|| AppError::NoData(format!("{}: no previous close", index.symbol)))?;
    if intraday.is_empty() {
        return Err(AppError::NoData(format!("{}: no intraday bars", index.symbol)));
    }
    Ok(PercentSeries::from_history(&intraday, index.name.clone(), previous_close))
}

/// Fetch every index of every group, one after another
pub async fn build_indices(source: &dyn QuoteSource, groups: &[IndexGroup]) -> IndicesSnapshot {
    let mut regions = Vec::with_capacity(groups.len());
    let mut failures = Vec::new();

    for group in groups {
        let mut series = Vec::with_capacity(group.indices.len());
        for index in &group.indices {
            match fetch_index(source, index).await {
                Ok(s) => series.push(s),
                Err(e) => {
                    warn!(
                        symbol = %index.symbol,
                        region = %group.region,
                        error = %e,
                        "Indices: skipping index"
                    );
                    failures.push(SymbolFailure::new(index.symbol.clone(), e));
                }
            }
        }
        regions.push(RegionSeries {
            region: group.region.clone(),
            series,
        });
    }

    IndicesSnapshot {
        updated_at: Utc::now(),
        regions,
        failures,
    }
}

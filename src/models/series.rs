use crate::models::indicators::normalize_to_base;
use crate::models::PriceHistory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point of a percent-change chart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

/// Chart line: closes expressed as percent change against `base`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentSeries {
    pub symbol: String,
    /// Legend label (display name for named indices, otherwise the symbol)
    pub label: String,
    pub base: f64,
    pub last_price: f64,
    pub points: Vec<PercentPoint>,
}

impl PercentSeries {
    pub fn from_history(history: &PriceHistory, label: impl Into<String>, base: f64) -> Self {
        let values = normalize_to_base(&history.closes(), base);
        let points = history
            .bars
            .iter()
            .zip(values)
            .map(|(bar, value)| PercentPoint { time: bar.time, value })
            .collect();

        Self {
            symbol: history.symbol.clone(),
            label: label.into(),
            base,
            last_price: history.latest().map(|b| b.close).unwrap_or(base),
            points,
        }
    }

    /// Latest percent change, if the series has points
    pub fn last_percent(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }
}

/// A symbol that was skipped this cycle and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolFailure {
    pub symbol: String,
    pub message: String,
}

impl SymbolFailure {
    pub fn new(symbol: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            symbol: symbol.into(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bar;
    use chrono::TimeZone;

    #[test]
    fn test_from_history() {
        let t0 = Utc.with_ymd_and_hms(2024, 7, 8, 4, 0, 0).unwrap();
        let bars = vec![
            Bar::new(t0, 0.0, 0.0, 0.0, 101.0, 0),
            Bar::new(t0 + chrono::Duration::minutes(1), 0.0, 0.0, 0.0, 98.0, 0),
        ];
        let history = PriceHistory::new("SBIN.NS", bars);
        let series = PercentSeries::from_history(&history, "SBIN.NS", 100.0);

        assert_eq!(series.points.len(), 2);
        assert!((series.points[0].value - 1.0).abs() < 1e-9);
        assert!((series.last_percent().unwrap() + 2.0).abs() < 1e-9);
        assert_eq!(series.last_price, 98.0);
        assert_eq!(series.points[1].time, t0 + chrono::Duration::minutes(1));
    }
}

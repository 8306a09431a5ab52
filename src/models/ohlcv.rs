use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Basic OHLCV (Open, High, Low, Close, Volume) bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar open time
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,

    /// Opening price
    pub open: f64,

    /// Highest price
    pub high: f64,

    /// Lowest price
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Trading volume
    pub volume: u64,
}

impl Bar {
    /// Create a new bar
    pub fn new(
        time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Bars for one ticker as returned by a quote source, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,

    /// IANA name of the exchange timezone, when the source reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    pub bars: Vec<Bar>,
}

impl PriceHistory {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            timezone: None,
            bars,
        }
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn times(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.time).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Last bar, if any
    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Bar `n` positions back from the end (`nth_from_end(0)` is the latest)
    pub fn nth_from_end(&self, n: usize) -> Option<&Bar> {
        self.bars.len().checked_sub(n + 1).and_then(|i| self.bars.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(day: u32, close: f64) -> Bar {
        let time = Utc.with_ymd_and_hms(2024, 7, day, 0, 0, 0).unwrap();
        Bar::new(time, close, close, close, close, 100)
    }

    #[test]
    fn test_nth_from_end() {
        let history = PriceHistory::new("TCS.NS", vec![bar(1, 10.0), bar(2, 11.0), bar(3, 12.0)]);

        assert_eq!(history.nth_from_end(0).map(|b| b.close), Some(12.0));
        assert_eq!(history.nth_from_end(2).map(|b| b.close), Some(10.0));
        assert!(history.nth_from_end(3).is_none());
        assert_eq!(history.latest().map(|b| b.close), Some(12.0));
    }

    #[test]
    fn test_closes_keep_order() {
        let history = PriceHistory::new("TCS.NS", vec![bar(1, 10.0), bar(2, 11.0)]);
        assert_eq!(history.closes(), vec![10.0, 11.0]);
        assert_eq!(history.len(), 2);
    }
}

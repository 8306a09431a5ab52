use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bar size requested from the quote source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartInterval {
    /// 1-minute bars
    #[serde(rename = "1m")]
    Minute1,
    /// 5-minute bars
    #[serde(rename = "5m")]
    Minute5,
    /// 15-minute bars
    #[serde(rename = "15m")]
    Minute15,
    /// 30-minute bars
    #[serde(rename = "30m")]
    Minute30,
    /// 1-hour bars
    #[serde(rename = "1h")]
    Hour1,
    /// Daily bars
    #[serde(rename = "1d")]
    Day1,
    /// Weekly bars
    #[serde(rename = "1wk")]
    Week1,
}

impl ChartInterval {
    /// Convert to interval string representation (Yahoo notation)
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartInterval::Minute1 => "1m",
            ChartInterval::Minute5 => "5m",
            ChartInterval::Minute15 => "15m",
            ChartInterval::Minute30 => "30m",
            ChartInterval::Hour1 => "1h",
            ChartInterval::Day1 => "1d",
            ChartInterval::Week1 => "1wk",
        }
    }

    /// Intraday bars are clipped to the exchange session on the price chart
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            ChartInterval::Minute1
                | ChartInterval::Minute5
                | ChartInterval::Minute15
                | ChartInterval::Minute30
                | ChartInterval::Hour1
        )
    }

    /// Get all available intervals
    pub fn all() -> Vec<ChartInterval> {
        vec![
            ChartInterval::Minute1,
            ChartInterval::Minute5,
            ChartInterval::Minute15,
            ChartInterval::Minute30,
            ChartInterval::Hour1,
            ChartInterval::Day1,
            ChartInterval::Week1,
        ]
    }
}

impl FromStr for ChartInterval {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        ChartInterval::all()
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "unknown interval '{}' (expected one of 1m, 5m, 15m, 30m, 1h, 1d, 1wk)",
                    s
                ))
            })
    }
}

impl fmt::Display for ChartInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for ChartInterval {
    fn default() -> Self {
        ChartInterval::Minute1
    }
}

/// How far back to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookbackPeriod {
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "5d")]
    Day5,
    #[serde(rename = "1mo")]
    Month1,
    #[serde(rename = "3mo")]
    Month3,
    #[serde(rename = "6mo")]
    Month6,
    #[serde(rename = "1y")]
    Year1,
}

impl LookbackPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookbackPeriod::Day1 => "1d",
            LookbackPeriod::Day5 => "5d",
            LookbackPeriod::Month1 => "1mo",
            LookbackPeriod::Month3 => "3mo",
            LookbackPeriod::Month6 => "6mo",
            LookbackPeriod::Year1 => "1y",
        }
    }

    pub fn all() -> Vec<LookbackPeriod> {
        vec![
            LookbackPeriod::Day1,
            LookbackPeriod::Day5,
            LookbackPeriod::Month1,
            LookbackPeriod::Month3,
            LookbackPeriod::Month6,
            LookbackPeriod::Year1,
        ]
    }
}

impl FromStr for LookbackPeriod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        LookbackPeriod::all()
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "unknown period '{}' (expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y)",
                    s
                ))
            })
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for LookbackPeriod {
    fn default() -> Self {
        LookbackPeriod::Day1
    }
}

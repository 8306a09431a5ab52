use crate::constants::{DEFAULT_EXCHANGE_TIMEZONE, SESSION_CLOSE, SESSION_OPEN};
use crate::models::PriceHistory;
use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;

/// Cash session of the exchange, in exchange local time
#[derive(Debug, Clone, Copy)]
pub struct TradingSession {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl Default for TradingSession {
    fn default() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(SESSION_OPEN.0, SESSION_OPEN.1, 0)
                .unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(SESSION_CLOSE.0, SESSION_CLOSE.1, 0)
                .unwrap_or(NaiveTime::MIN),
        }
    }
}

impl TradingSession {
    /// Inclusive on both ends
    pub fn contains(&self, time: DateTime<Utc>, tz: Tz) -> bool {
        let local = time.with_timezone(&tz).time();
        local >= self.open && local <= self.close
    }

    /// True on a weekday between open and close
    pub fn is_open_at(&self, time: DateTime<Utc>, tz: Tz) -> bool {
        let weekday = time.with_timezone(&tz).weekday();
        !matches!(weekday, Weekday::Sat | Weekday::Sun) && self.contains(time, tz)
    }
}

/// Parse an IANA timezone name, falling back to the NSE timezone
pub fn resolve_timezone(name: Option<&str>) -> Tz {
    let fallback: Tz = chrono_tz::Asia::Kolkata;
    match name {
        Some(name) => name.parse().unwrap_or_else(|e| {
            tracing::warn!(
                "Failed to parse timezone '{}': {}, using {}",
                name,
                e,
                DEFAULT_EXCHANGE_TIMEZONE
            );
            fallback
        }),
        None => fallback,
    }
}

/// Keep only bars inside the session, in the history's own exchange timezone
pub fn filter_session(history: &PriceHistory, session: &TradingSession) -> PriceHistory {
    let tz = resolve_timezone(history.timezone.as_deref());
    PriceHistory {
        symbol: history.symbol.clone(),
        timezone: history.timezone.clone(),
        bars: history
            .bars
            .iter()
            .filter(|b| session.contains(b.time, tz))
            .cloned()
            .collect(),
    }
}

/// Check if the NSE is trading right now
pub fn is_trading_hours() -> bool {
    TradingSession::default().is_open_at(Utc::now(), resolve_timezone(None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bar;
    use chrono::TimeZone;

    fn ist(h: u32, m: u32) -> DateTime<Utc> {
        // 2024-07-08 is a Monday; IST = UTC+05:30
        chrono_tz::Asia::Kolkata
            .with_ymd_and_hms(2024, 7, 8, h, m, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_session_bounds_inclusive() {
        let session = TradingSession::default();
        let tz = resolve_timezone(Some("Asia/Kolkata"));
        assert!(!session.contains(ist(9, 14), tz));
        assert!(session.contains(ist(9, 15), tz));
        assert!(session.contains(ist(15, 30), tz));
        assert!(!session.contains(ist(15, 31), tz));
    }

    #[test]
    fn test_filter_session() {
        let bars = [ist(9, 0), ist(9, 15), ist(12, 0), ist(15, 45)]
            .into_iter()
            .map(|t| Bar::new(t, 1.0, 1.0, 1.0, 1.0, 10))
            .collect();
        let history = PriceHistory::new("^NSEI", bars).with_timezone("Asia/Kolkata");

        let filtered = filter_session(&history, &TradingSession::default());
        assert_eq!(filtered.times(), vec![ist(9, 15), ist(12, 0)]);
        assert_eq!(filtered.timezone.as_deref(), Some("Asia/Kolkata"));
    }

    #[test]
    fn test_weekend_is_closed() {
        let session = TradingSession::default();
        let tz = resolve_timezone(None);
        let saturday_noon = chrono_tz::Asia::Kolkata
            .with_ymd_and_hms(2024, 7, 6, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert!(!session.is_open_at(saturday_noon, tz));
        assert!(session.is_open_at(ist(12, 0), tz));
    }

    #[test]
    fn test_bad_timezone_falls_back() {
        assert_eq!(resolve_timezone(Some("Mars/Olympus")), chrono_tz::Asia::Kolkata);
        assert_eq!(resolve_timezone(Some("America/New_York")), chrono_tz::America::New_York);
    }
}

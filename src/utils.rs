use crate::constants::DEFAULT_POLL_INTERVAL_SECS;
use std::path::PathBuf;
use std::time::Duration;

/// Get symbols file path from environment variable or use default
pub fn get_symbols_file() -> PathBuf {
    std::env::var("SYMBOLS_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("additional_symbols.json"))
}

/// Get static frontend directory from environment variable or use default
pub fn get_public_dir() -> PathBuf {
    std::env::var("PUBLIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("public"))
}

/// Get quote API base URL from environment variable or use default
pub fn get_quote_base_url() -> String {
    std::env::var("QUOTE_BASE_URL")
        .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string())
}

/// Get polling interval from environment variable or use default (60s)
pub fn get_poll_interval() -> Duration {
    let secs = std::env::var("POLL_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
    Duration::from_secs(secs)
}

/// Get server port from environment variable or use default
pub fn get_default_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000)
}

/// Format an integer with thousands separators (1234567 -> "1,234,567")
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a signed percentage with two decimals ("+1.25%", "-0.40%")
pub fn format_percent(value: f64) -> String {
    format!("{:+.2}%", value)
}

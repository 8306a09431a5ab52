//! Symbol universes and indicator constants
//!
//! Tickers use Yahoo Finance notation: `.NS` suffix for NSE listings and a
//! leading `^` for indices.

/// Default NSE stocks shown on the dashboard (additions come from the symbols file)
pub const DEFAULT_STOCKS: &[&str] = &[
    "RELIANCE.NS",
    "TCS.NS",
    "HDFCBANK.NS",
    "BHARTIARTL.NS",
    "ICICIBANK.NS",
    "SBIN.NS",
    "INFY.NS",
];

/// Default indices shown on the dashboard
pub const DEFAULT_INDEXES: &[&str] = &["^NSEI", "^NSEBANK", "^BSESN"];

/// How many default stocks are pre-selected when a request names none
pub const DEFAULT_SELECTED_STOCKS: usize = 3;

/// How many default indices are pre-selected when a request names none
pub const DEFAULT_SELECTED_INDEXES: usize = 1;

/// Headline quotes at the top of the dashboard: (label, symbol)
pub const HEADLINE_INDEXES: &[(&str, &str)] = &[
    ("Nifty 50", "^NSEI"),
    ("Bank Nifty", "^NSEBANK"),
    ("Sensex", "^BSESN"),
];

/// Indices offered on the price chart page
pub const CHART_INDEXES: &[&str] = &["^NSEI", "^NSEBANK", "^CNXIT"];

/// EMA periods overlaid on the price chart
pub const EMA_PERIODS: [usize; 3] = [20, 50, 100];

/// RSI lookback
pub const RSI_PERIOD: usize = 14;

/// RSI above this is shown as bullish
pub const RSI_BULLISH_ABOVE: f64 = 60.0;

/// RSI below this is shown as bearish
pub const RSI_BEARISH_BELOW: f64 = 40.0;

/// US indices: (display name, symbol)
pub const US_INDICES: &[(&str, &str)] = &[
    ("Dow Jones", "^DJI"),
    ("Nasdaq", "^IXIC"),
    ("S&P 500", "^GSPC"),
];

/// European indices: (display name, symbol)
pub const EUROPEAN_INDICES: &[(&str, &str)] = &[
    ("DAX", "^GDAXI"),
    ("FTSE 100", "^FTSE"),
    ("CAC 40", "^FCHI"),
];

/// Scanner universe (Nifty 50 constituents at the time the list was written)
pub const NIFTY_50_SYMBOLS: &[&str] = &[
    "RELIANCE.NS", "TCS.NS", "HDFCBANK.NS", "INFY.NS",
    "ICICIBANK.NS", "KOTAKBANK.NS", "HINDUNILVR.NS", "SBIN.NS", "BHARTIARTL.NS",
    "ITC.NS", "ASIANPAINT.NS", "HCLTECH.NS", "MARUTI.NS", "AXISBANK.NS",
    "LT.NS", "BAJFINANCE.NS", "TITAN.NS", "ULTRACEMCO.NS", "NESTLEIND.NS",
    "SUNPHARMA.NS", "WIPRO.NS", "POWERGRID.NS", "NTPC.NS", "M&M.NS",
    "INDUSINDBK.NS", "BAJAJFINSV.NS", "HEROMOTOCO.NS", "ADANIPORTS.NS", "ONGC.NS",
    "TECHM.NS", "GRASIM.NS", "TATASTEEL.NS", "JSWSTEEL.NS", "COALINDIA.NS",
    "BPCL.NS", "BRITANNIA.NS", "SHREECEM.NS", "CIPLA.NS", "DIVISLAB.NS",
    "DRREDDY.NS", "EICHERMOT.NS", "UPL.NS", "HINDALCO.NS", "BAJAJ-AUTO.NS",
    "TATAMOTORS.NS", "SBILIFE.NS", "ADANIGREEN.NS", "VEDL.NS", "AMBUJACEM.NS",
];

/// Rows per scanner table
pub const SCANNER_TOP_N: usize = 10;

/// Seconds between polling cycles
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// NSE cash session, exchange local time
pub const SESSION_OPEN: (u32, u32) = (9, 15);
pub const SESSION_CLOSE: (u32, u32) = (15, 30);

/// Used when the quote metadata carries no exchange timezone
pub const DEFAULT_EXCHANGE_TIMEZONE: &str = "Asia/Kolkata";

use crate::error::Result;
use crate::models::SymbolStore;
use crate::services::dashboard::Direction;
use crate::services::{build_dashboard, DashboardSnapshot, YahooClient};
use crate::utils::{format_percent, get_poll_interval, get_quote_base_url, get_symbols_file};
use tokio::time::sleep;

/// Terminal dashboard: redraw every poll interval until interrupted
pub async fn run() -> Result<()> {
    let client = YahooClient::new(get_quote_base_url())?;
    let poll_interval = get_poll_interval();
    let symbols_file = get_symbols_file();

    println!("👀 Watching dashboard (every {}s, Ctrl+C to stop)", poll_interval.as_secs());

    loop {
        // Re-read each cycle so `symbols add/remove` from another shell shows up
        let store = SymbolStore::load(&symbols_file)?;
        let snapshot = build_dashboard(&client, store.list()).await;
        print_snapshot(&snapshot);
        sleep(poll_interval).await;
    }
}

fn print_snapshot(snapshot: &DashboardSnapshot) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("🕒 {}", snapshot.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));

    for quote in &snapshot.headlines {
        let arrow = match quote.direction {
            Direction::Up => "🟢 ▲",
            Direction::Down => "🔴 ▼",
        };
        println!(
            "{} {:<12} {:>12.2} {:>+10.2} ({})",
            arrow,
            quote.label,
            quote.price,
            quote.change,
            format_percent(quote.change_percent)
        );
    }

    println!("\n📈 Stocks");
    for series in &snapshot.stocks {
        print_series_line(&series.symbol, series.last_price, series.last_percent());
    }

    println!("\n📊 Indexes");
    for series in &snapshot.indexes {
        print_series_line(&series.symbol, series.last_price, series.last_percent());
    }

    for failure in &snapshot.failures {
        eprintln!("⚠️  {}: {}", failure.symbol, failure.message);
    }
}

fn print_series_line(symbol: &str, price: f64, percent: Option<f64>) {
    let percent = percent.map(format_percent).unwrap_or_else(|| "-".to_string());
    println!("   {:<14} {:>12.2} {:>9}", symbol, price, percent);
}

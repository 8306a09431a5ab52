use crate::constants::NIFTY_50_SYMBOLS;
use crate::error::Result;
use crate::services::{run_scan, ScanRow, YahooClient};
use crate::utils::{format_number, format_percent, get_quote_base_url};

pub async fn run(limit: usize) -> Result<()> {
    let client = YahooClient::new(get_quote_base_url())?;

    println!("🔍 Scanning {} Nifty 50 symbols...", NIFTY_50_SYMBOLS.len());
    let snapshot = run_scan(&client, NIFTY_50_SYMBOLS).await;
    let tables = snapshot.tables(limit.max(1));

    println!(
        "✅ Scanned {}/{} symbols",
        snapshot.rows.len(),
        snapshot.universe_size
    );

    print_table("🚀 Top Gainers", &tables.gainers);
    print_table("📉 Top Losers", &tables.losers);
    print_table("🔊 Highest Volume", &tables.highest_volume);

    if !snapshot.failures.is_empty() {
        println!("\n⚠️  {} symbols skipped:", snapshot.failures.len());
        for failure in &snapshot.failures {
            println!("   {}: {}", failure.symbol, failure.message);
        }
    }

    Ok(())
}

fn print_table(title: &str, rows: &[ScanRow]) {
    println!("\n{}", title);
    println!(
        "   {:<16} {:>10} {:>9} {:>15} {:>10}",
        "Symbol", "Close", "Change", "Volume", "Vol Chg"
    );
    for row in rows {
        let volume_change = row
            .volume_change_percent
            .map(format_percent)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {:<16} {:>10.2} {:>9} {:>15} {:>10}",
            row.symbol,
            row.close,
            format_percent(row.change_percent),
            format_number(row.volume),
            volume_change
        );
    }
}

use crate::constants::{DEFAULT_EXCHANGE_TIMEZONE, NIFTY_50_SYMBOLS};
use crate::error::Result;
use crate::models::{global_index_groups, SymbolGroup, SymbolStore};
use crate::services::is_trading_hours;
use crate::utils::{
    get_default_port, get_poll_interval, get_public_dir, get_quote_base_url, get_symbols_file,
};

pub fn run() -> Result<()> {
    println!("📊 Marketpulse Status\n");

    let store = SymbolStore::load(get_symbols_file())?;
    let list = store.list();

    println!("📁 Symbols file:  {}", store.path().display());
    println!(
        "📈 Stocks:        {} ({} added)",
        list.all_symbols(SymbolGroup::Stocks).len(),
        list.stocks.len()
    );
    println!(
        "📊 Indexes:       {} ({} added)",
        list.all_symbols(SymbolGroup::Indexes).len(),
        list.indexes.len()
    );
    let global: usize = global_index_groups().iter().map(|g| g.indices.len()).sum();
    println!("🌍 Global indices: {}", global);
    println!("🔍 Scanner universe: {}", NIFTY_50_SYMBOLS.len());

    println!("\n═══════════════════════════════════════════════════════════\n");

    println!("🌐 Quote API:     {}", get_quote_base_url());
    println!("⏱️  Poll interval: {}s", get_poll_interval().as_secs());
    println!("🔌 Default port:  {}", get_default_port());
    println!("🗂️  Public dir:    {}", get_public_dir().display());

    let session = if is_trading_hours() { "🟢 open" } else { "🔴 closed" };
    println!("\n🕘 Market session ({}): {}", DEFAULT_EXCHANGE_TIMEZONE, session);

    Ok(())
}

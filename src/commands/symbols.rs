use crate::error::Result;
use crate::models::{AddOutcome, SymbolGroup, SymbolStore};
use crate::utils::get_symbols_file;

pub fn list() -> Result<()> {
    let store = SymbolStore::load(get_symbols_file())?;
    println!("📋 Watchlist ({})\n", store.path().display());

    for group in [SymbolGroup::Stocks, SymbolGroup::Indexes] {
        println!("🔹 {}", group);
        for symbol in group.defaults() {
            println!("   {:<16} (default)", symbol);
        }
        for symbol in store.list().group(group) {
            println!("   {:<16} (added)", symbol);
        }
    }
    Ok(())
}

pub fn add(group: SymbolGroup, symbol: &str) -> Result<()> {
    let mut store = SymbolStore::load(get_symbols_file())?;
    match store.add(group, symbol)? {
        AddOutcome::Added => println!("✅ Added {} to {}", symbol.trim().to_uppercase(), group),
        AddOutcome::AlreadyPresent => {
            println!("ℹ️  {} is already in {}", symbol.trim().to_uppercase(), group)
        }
    }
    Ok(())
}

pub fn remove(group: SymbolGroup, symbol: &str) -> Result<()> {
    let mut store = SymbolStore::load(get_symbols_file())?;
    let normalized = symbol.trim().to_uppercase();
    if store.remove(group, symbol)? {
        println!("🗑️  Removed {} from {}", normalized, group);
    } else if group.defaults().contains(&normalized.as_str()) {
        println!("⚠️  {} is a default {} symbol and cannot be removed", normalized, group);
    } else {
        println!("⚠️  {} is not in {}", normalized, group);
    }
    Ok(())
}

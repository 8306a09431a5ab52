use crate::constants::{DEFAULT_INDEXES, DEFAULT_STOCKS};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Which half of the watchlist a symbol belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolGroup {
    Stocks,
    Indexes,
}

impl SymbolGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolGroup::Stocks => "stocks",
            SymbolGroup::Indexes => "indexes",
        }
    }

    /// Built-in symbols for this group
    pub fn defaults(&self) -> &'static [&'static str] {
        match self {
            SymbolGroup::Stocks => DEFAULT_STOCKS,
            SymbolGroup::Indexes => DEFAULT_INDEXES,
        }
    }
}

impl FromStr for SymbolGroup {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "stocks" | "stock" => Ok(SymbolGroup::Stocks),
            "indexes" | "index" | "indices" => Ok(SymbolGroup::Indexes),
            other => Err(AppError::InvalidInput(format!(
                "unknown symbol group '{}' (expected stocks or indexes)",
                other
            ))),
        }
    }
}

impl fmt::Display for SymbolGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User-added symbols, persisted as `{"stocks": [...], "indexes": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolList {
    #[serde(default)]
    pub stocks: Vec<String>,
    #[serde(default)]
    pub indexes: Vec<String>,
}

impl SymbolList {
    pub fn group(&self, group: SymbolGroup) -> &Vec<String> {
        match group {
            SymbolGroup::Stocks => &self.stocks,
            SymbolGroup::Indexes => &self.indexes,
        }
    }

    fn group_mut(&mut self, group: SymbolGroup) -> &mut Vec<String> {
        match group {
            SymbolGroup::Stocks => &mut self.stocks,
            SymbolGroup::Indexes => &mut self.indexes,
        }
    }

    /// Defaults first, then additions in insertion order
    pub fn all_symbols(&self, group: SymbolGroup) -> Vec<String> {
        group
            .defaults()
            .iter()
            .map(|s| s.to_string())
            .chain(self.group(group).iter().cloned())
            .collect()
    }

    /// Upper-case every addition, dropping blanks, repeats and defaults
    ///
    /// Files written by hand or by older tools may hold mixed-case tickers.
    fn normalize(&mut self) {
        for group in [SymbolGroup::Stocks, SymbolGroup::Indexes] {
            let mut kept: Vec<String> = Vec::new();
            for raw in self.group(group) {
                let Ok(symbol) = normalize_symbol(raw) else {
                    continue;
                };
                if group.defaults().contains(&symbol.as_str()) || kept.contains(&symbol) {
                    continue;
                }
                kept.push(symbol);
            }
            *self.group_mut(group) = kept;
        }
    }

    /// True when the symbol is a default or an addition of this group
    pub fn contains(&self, group: SymbolGroup, symbol: &str) -> bool {
        group.defaults().contains(&symbol) || self.group(group).iter().any(|s| s == symbol)
    }
}

/// Result of an add request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Symbol list bound to its backing file
#[derive(Debug)]
pub struct SymbolStore {
    path: PathBuf,
    list: SymbolList,
}

impl SymbolStore {
    /// Load the symbol list; a missing file yields an empty list
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let list = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut list: SymbolList = serde_json::from_str(&content).map_err(|e| {
                AppError::Parse(format!("invalid symbols file {}: {}", path.display(), e))
            })?;
            list.normalize();
            list
        } else {
            debug!(path = %path.display(), "Symbols file not found, starting empty");
            SymbolList::default()
        };
        Ok(Self { path, list })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &SymbolList {
        &self.list
    }

    /// Rewrite the whole file (temp sibling + rename)
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string(&self.list)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Append a symbol to a group and persist; duplicates are a no-op
    pub fn add(&mut self, group: SymbolGroup, symbol: &str) -> Result<AddOutcome> {
        let symbol = normalize_symbol(symbol)?;
        if self.list.contains(group, &symbol) {
            debug!(%group, %symbol, "Symbol already listed");
            return Ok(AddOutcome::AlreadyPresent);
        }
        self.list.group_mut(group).push(symbol.clone());
        self.save()?;
        info!(%group, %symbol, "Added symbol");
        Ok(AddOutcome::Added)
    }

    /// Remove a user-added symbol and persist; returns false when it was not listed
    pub fn remove(&mut self, group: SymbolGroup, symbol: &str) -> Result<bool> {
        let symbol = normalize_symbol(symbol)?;
        let entries = self.list.group_mut(group);
        let before = entries.len();
        entries.retain(|s| s != &symbol);
        if entries.len() == before {
            return Ok(false);
        }
        self.save()?;
        info!(%group, %symbol, "Removed symbol");
        Ok(true)
    }
}

// One writer at a time across handlers and workers
pub type SharedSymbolStore = Arc<Mutex<SymbolStore>>;

/// Trim and upper-case a ticker; empty input is rejected
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(AppError::InvalidInput("symbol must not be empty".to_string()));
    }
    Ok(symbol.to_uppercase())
}

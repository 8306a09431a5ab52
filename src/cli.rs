use clap::{Parser, Subcommand};

use crate::commands;
use crate::constants::{CHART_INDEXES, SCANNER_TOP_N};
use crate::error::Result;
use crate::models::{ChartInterval, LookbackPeriod, SymbolGroup};
use crate::utils::get_default_port;

#[derive(Parser)]
#[command(name = "marketpulse")]
#[command(about = "Market Pulse stock dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server and polling workers
    Serve {
        /// Port to listen on (default: $PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the dashboard to the terminal every poll interval
    Watch,
    /// Print a price chart with EMA and RSI signals
    Chart {
        /// Symbol to chart
        #[arg(short, long, default_value = CHART_INDEXES[0])]
        symbol: String,
        /// Bar interval (1m, 5m, 15m, 30m, 1h, 1d, 1wk)
        #[arg(short, long, default_value = "1m")]
        interval: ChartInterval,
        /// Lookback period (1d, 5d, 1mo, 3mo, 6mo, 1y)
        #[arg(short, long, default_value = "1d")]
        period: LookbackPeriod,
        /// Print once and exit instead of refreshing
        #[arg(long)]
        once: bool,
    },
    /// Scan the Nifty 50 for gainers, losers and volume leaders
    Scan {
        /// Rows per table
        #[arg(short, long, default_value_t = SCANNER_TOP_N)]
        limit: usize,
    },
    /// Manage the additional symbols file
    Symbols {
        #[command(subcommand)]
        action: SymbolsAction,
    },
    /// Show configuration and watchlist summary
    Status,
}

#[derive(Subcommand)]
pub enum SymbolsAction {
    /// List default and added symbols
    List,
    /// Add a symbol to a group
    Add {
        /// stocks or indexes
        group: SymbolGroup,
        symbol: String,
    },
    /// Remove an added symbol from a group
    Remove {
        /// stocks or indexes
        group: SymbolGroup,
        symbol: String,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            commands::serve::run(port.unwrap_or_else(get_default_port)).await
        }
        Commands::Watch => commands::watch::run().await,
        Commands::Chart {
            symbol,
            interval,
            period,
            once,
        } => commands::chart::run(symbol, interval, period, once).await,
        Commands::Scan { limit } => commands::scan::run(limit).await,
        Commands::Symbols { action } => match action {
            SymbolsAction::List => commands::symbols::list(),
            SymbolsAction::Add { group, symbol } => commands::symbols::add(group, &symbol),
            SymbolsAction::Remove { group, symbol } => commands::symbols::remove(group, &symbol),
        },
        Commands::Status => commands::status::run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_chart_args() {
        let args = ["marketpulse", "chart", "-s", "^NSEBANK", "-i", "5m", "--once"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Chart {
                symbol,
                interval,
                period,
                once,
            } => {
                assert_eq!(symbol, "^NSEBANK");
                assert_eq!(interval, ChartInterval::Minute5);
                assert_eq!(period, LookbackPeriod::Day1);
                assert!(once);
            }
            _ => panic!("expected chart"),
        }

        assert!(Cli::try_parse_from(["marketpulse", "chart", "-i", "7m"]).is_err());
    }

    #[test]
    fn test_every_listed_interval_parses() {
        for value in ["1m", "5m", "15m", "30m", "1h", "1d", "1wk"] {
            let cli = Cli::try_parse_from(["marketpulse", "chart", "-i", value]);
            assert!(cli.is_ok(), "interval {} rejected", value);
        }
        for value in ["2m", "60m", "90m", "5d"] {
            assert!(Cli::try_parse_from(["marketpulse", "chart", "-i", value]).is_err());
        }
    }

    #[test]
    fn test_symbols_args() {
        let args = ["marketpulse", "symbols", "add", "index", "^CNXIT"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Symbols {
                action: SymbolsAction::Add { group, symbol },
            } => {
                assert_eq!(group, SymbolGroup::Indexes);
                assert_eq!(symbol, "^CNXIT");
            }
            _ => panic!("expected symbols add"),
        }
    }
}

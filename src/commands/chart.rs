use crate::error::Result;
use crate::models::{normalize_symbol, ChartInterval, LookbackPeriod};
use crate::services::{fetch_price_chart, ChartRequest, PriceChart, Signal, YahooClient};
use crate::utils::{format_percent, get_poll_interval, get_quote_base_url};
use tokio::time::sleep;
use tracing::warn;

pub async fn run(
    symbol: String,
    interval: ChartInterval,
    period: LookbackPeriod,
    once: bool,
) -> Result<()> {
    let client = YahooClient::new(get_quote_base_url())?;
    let request = ChartRequest {
        symbol: normalize_symbol(&symbol)?,
        interval,
        period,
    };
    let poll_interval = get_poll_interval();

    println!(
        "📉 Price chart for {} ({} bars over {})",
        request.symbol, request.interval, request.period
    );

    loop {
        match fetch_price_chart(&client, &request).await {
            Ok(chart) => print_chart(&chart),
            Err(e) if once => return Err(e),
            Err(e) => {
                warn!(symbol = %request.symbol, error = %e, "Chart refresh failed");
                eprintln!("⚠️  {}: {}", request.symbol, e);
            }
        }

        if once {
            return Ok(());
        }
        sleep(poll_interval).await;
    }
}

fn signal_label(signal: Option<Signal>) -> &'static str {
    match signal {
        Some(Signal::Bullish) => "🟢 Bullish",
        Some(Signal::Bearish) => "🔴 Bearish",
        Some(Signal::Neutral) => "⚪ Neutral",
        None => "… warming up",
    }
}

fn print_chart(chart: &PriceChart) {
    let change = chart.price_percent.last().copied().unwrap_or(0.0);
    println!("\n═══════════════════════════════════════════════════════════");
    println!(
        "💰 {} {:.2} ({} since first bar, {} bars)",
        chart.symbol,
        chart.current_price,
        format_percent(change),
        chart.times.len()
    );

    for ema in &chart.emas {
        match ema.latest {
            Some(value) => println!(
                "   EMA {:<4} {:>12.2}  {}",
                ema.period,
                value,
                signal_label(ema.signal)
            ),
            None => println!("   EMA {:<4} {:>12}  {}", ema.period, "-", signal_label(None)),
        }
    }

    match chart.rsi.latest {
        Some(value) => println!(
            "   RSI {:<4} {:>12.2}  {}",
            chart.rsi.period,
            value,
            signal_label(chart.rsi.zone)
        ),
        None => println!("   RSI {:<4} {:>12}  {}", chart.rsi.period, "-", signal_label(None)),
    }
}

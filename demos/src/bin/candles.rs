//! Demo 1: Candle History
//!
//! Showcases: multi-window candle fetch, request throttling, range summary
//!
//! Run: cargo run --bin candles -- [PRODUCT] [GRANULARITY_SECS] [DAYS]
//! e.g. cargo run --bin candles -- ETH-USD 300 3
//!
//! Set RUST_LOG=cbpro_rest=debug to watch each window being fetched.

use chrono::{Duration, DurationRound, Utc};
use colored::*;
use cbpro_rest::{CandleParams, ClientConfig, PublicClient};
use cbpro_types::{Granularity, IntervalPlan, ProductId};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let product: ProductId = args.next().as_deref().unwrap_or("BTC-USD").parse()?;
    let granularity: u32 = args.next().map(|g| g.parse::<u32>()).transpose()?.unwrap_or(300);
    let days: i64 = args.next().map(|d| d.parse::<i64>()).transpose()?.unwrap_or(3);

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  CANDLE HISTORY".cyan().bold());
    let candle_size = Granularity::try_from(granularity)?;
    println!("{}", format!("  {product} @ {} over {days} day(s)", candle_size.label()).cyan());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let end = Utc::now().duration_trunc(Duration::seconds(i64::from(granularity)))?;
    let params = CandleParams::new(end - Duration::days(days), end, granularity);

    // Show the plan before fetching
    let plan = IntervalPlan::new(params.range(), candle_size)?;
    println!(
        "{} {} request window(s) of up to {}s",
        "→".yellow(),
        plan.len(),
        plan.window_span()
    );
    for window in &plan {
        println!("    {}", window.to_string().dimmed());
    }
    println!();

    let client = PublicClient::with_config(ClientConfig::from_env()?)?;
    let started = std::time::Instant::now();
    let candles = client.candles(product.as_str(), &params).await?;
    println!(
        "{} {} candles in {:.2}s",
        "✓".green(),
        candles.len(),
        started.elapsed().as_secs_f64()
    );

    let (Some(first), Some(last)) = (candles.first(), candles.last()) else {
        println!("{}", "No candles in range".yellow());
        return Ok(());
    };

    let high = candles.iter().map(|c| c.high).max().unwrap_or_default();
    let low = candles.iter().map(|c| c.low).min().unwrap_or_default();
    let volume: Decimal = candles.iter().map(|c| c.volume).sum();
    let bullish = candles.iter().filter(|c| c.is_bullish()).count();

    let change = if first.open.is_zero() {
        Decimal::ZERO
    } else {
        (last.close - first.open) / first.open * Decimal::ONE_HUNDRED
    };
    let change_str = format!("{:+.2}%", change);
    let change_str = if change.is_sign_negative() {
        change_str.red()
    } else {
        change_str.green()
    };

    println!();
    println!("  {:>10}  {}", "FROM".white().bold(), first.datetime().map(|d| d.to_rfc3339()).unwrap_or_default());
    println!("  {:>10}  {}", "TO".white().bold(), last.datetime().map(|d| d.to_rfc3339()).unwrap_or_default());
    println!("  {:>10}  {}", "OPEN".white().bold(), first.open);
    println!("  {:>10}  {}", "CLOSE".white().bold(), last.close);
    println!("  {:>10}  {}", "HIGH".white().bold(), high);
    println!("  {:>10}  {}", "LOW".white().bold(), low);
    println!("  {:>10}  {}", "CHANGE".white().bold(), change_str);
    println!("  {:>10}  {}", "VOLUME".white().bold(), volume.round_dp(4));
    println!("  {:>10}  {}/{}", "UP BARS".white().bold(), bullish, candles.len());

    println!();
    println!("  {}", "Last 5 candles".white().bold());
    println!("  {}", "─".repeat(61));
    for candle in candles.iter().rev().take(5).rev() {
        let marker = if candle.is_bullish() { "▲".green() } else { "▼".red() };
        println!(
            "  {} {}  O {:>12}  C {:>12}  V {:>10}",
            marker,
            candle.datetime().map(|d| d.format("%m-%d %H:%M").to_string()).unwrap_or_default(),
            candle.open,
            candle.close,
            candle.volume.round_dp(3)
        );
    }

    Ok(())
}

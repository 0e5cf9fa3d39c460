//! Demo 2: Market Snapshot
//!
//! Showcases: ticker, order book, 24h stats, paginated trades
//!
//! Run: cargo run --bin market_snapshot -- [PRODUCT]

use colored::*;
use cbpro_rest::{PublicClient, TradeParams};
use cbpro_types::{BookLevel, ProductId, Side};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let product: ProductId = std::env::args().nth(1).as_deref().unwrap_or("BTC-USD").parse()?;

    println!("{}", "═".repeat(65).cyan());
    println!("{}", "  MARKET SNAPSHOT".cyan().bold());
    println!("{}", format!("  {product}").cyan());
    println!("{}", "═".repeat(65).cyan());
    println!();

    let client = PublicClient::new()?;
    let products = client.products();

    let time = client.server_time().await?;
    println!("{} Server time {}", "✓".green(), time.iso);

    let info = products.get(product.as_str()).await?;
    let status = if info.is_tradable() {
        info.status.green()
    } else {
        info.status.red()
    };
    println!("{} {} ({}), tick {}", "✓".green(), info.id, status, info.quote_increment);
    println!();

    let ticker = products.ticker(product.as_str()).await?;
    println!("  {:>10}  {}", "LAST".white().bold(), ticker.price);
    println!("  {:>10}  {}", "BID".white().bold(), ticker.bid.to_string().green());
    println!("  {:>10}  {}", "ASK".white().bold(), ticker.ask.to_string().red());
    if let Some(bps) = ticker.spread_bps() {
        println!("  {:>10}  {} bps", "SPREAD".white().bold(), bps.round_dp(2));
    }

    let stats = products.stats(product.as_str()).await?;
    if let Some(change) = stats.change_pct() {
        let change_str = format!("{:+.2}%", change);
        let change_str = if change.is_sign_negative() {
            change_str.red()
        } else {
            change_str.green()
        };
        println!("  {:>10}  {}", "24H".white().bold(), change_str);
    }
    println!("  {:>10}  {}", "VOLUME".white().bold(), stats.volume.round_dp(2));
    println!();

    let book = products.order_book(product.as_str(), BookLevel::Top50).await?;
    println!("  {}", "Top of book".white().bold());
    println!("  {}", "─".repeat(45));
    for (bid, ask) in book.bids.iter().zip(book.asks.iter()).take(5) {
        println!(
            "  {:>14} {:>10}  │  {:<14} {:<10}",
            bid.size().round_dp(4),
            bid.price().to_string().green(),
            ask.price().to_string().red(),
            ask.size().round_dp(4)
        );
    }
    println!();

    let trades = products
        .trades(product.as_str(), &TradeParams::new().with_page_size(100).with_max_trades(250))
        .await?;
    let buys = trades.iter().filter(|t| t.side == Side::Buy).count();
    println!(
        "{} {} recent trades ({} maker buys, {} maker sells)",
        "✓".green(),
        trades.len(),
        buys,
        trades.len() - buys
    );
    for trade in trades.iter().take(5) {
        let side = match trade.side {
            Side::Buy => "BUY ".green(),
            Side::Sell => "SELL".red(),
        };
        println!(
            "  {} {} {:>12} @ {}",
            trade.time.format("%H:%M:%S"),
            side,
            trade.size,
            trade.price
        );
    }

    Ok(())
}

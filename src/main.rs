use std::path::Path;
use std::time::Duration;

use anyhow::{Result, bail};
use colored::Colorize;

use tos_chains::config::{self, ChainApiConfig, QuotesConfig};
use tos_chains::logging::init_logging;
use tos_chains::quotes::QuoteClient;
use tos_chains::tos_client::TosClient;
use tos_chains::{capture, chain};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = args.first().map(String::as_str).unwrap_or("load");

    println!("{}", "=".repeat(60).blue());
    println!("{}", "ToS Chains".green().bold());
    println!("{}", "=".repeat(60).blue());
    println!();

    match mode {
        "load" => {
            let dir = args.get(1).map(String::as_str).unwrap_or(".");
            load_and_summarize(Path::new(dir)).await
        }
        "capture" => {
            let Some(ticker) = args.get(1) else {
                bail!("Usage: tos-chains capture <ticker> [dir]");
            };
            let dir = args.get(2).map(String::as_str).unwrap_or(".");
            capture_loop(ticker, Path::new(dir)).await
        }
        "quotes" => {
            let tickers = &args[1..];
            if tickers.is_empty() {
                bail!("Usage: tos-chains quotes <ticker>...");
            }
            fetch_quotes(tickers).await
        }
        other => bail!("Unknown mode: {} (expected load, capture or quotes)", other),
    }
}

/// Load every capture in `dir` and print per-expiry table sizes for the
/// most recent one.
async fn load_and_summarize(dir: &Path) -> Result<()> {
    println!("{}", format!("Loading captures from {}...", dir.display()).cyan());

    let start = std::time::Instant::now();
    let set = capture::load_all_captures(dir, config::get_max_concurrent()).await?;
    let elapsed = start.elapsed();

    println!(
        "{} Loaded {} captures in {:.2}s",
        "✓".green(),
        set.len(),
        elapsed.as_secs_f64()
    );

    if !set.failures.is_empty() {
        println!("{} {} files failed to load:", "✗".red(), set.failures.len());
        for failure in &set.failures {
            println!("  {} {}", "✗".red(), failure.error.to_string().chars().take(100).collect::<String>());
        }
    }
    println!();

    let Some(latest) = set.snapshots.last() else {
        println!("{}", "No captures found.".yellow());
        return Ok(());
    };

    println!("{}", format!("Latest capture: {}", latest.captured_at).cyan());
    let tables = chain::all_chain_tables(&latest.doc)?;
    for (expiry, table) in &tables {
        println!(
            "  {} {} → {} rows",
            "✓".green(),
            expiry.yellow(),
            table.len()
        );
    }
    println!();
    println!(
        "{} {} expiries, {} rows total",
        "✓".green(),
        tables.len(),
        tables.iter().map(|(_, t)| t.len()).sum::<usize>()
    );

    Ok(())
}

/// Fetch and save one capture every interval until interrupted.
async fn capture_loop(ticker: &str, dir: &Path) -> Result<()> {
    let client = TosClient::new(ChainApiConfig::from_env()?)?;
    std::fs::create_dir_all(dir)?;

    println!(
        "{}",
        format!(
            "Capturing {} chains to {} every {}s (Ctrl-C to stop)...",
            ticker,
            dir.display(),
            config::CAPTURE_INTERVAL_SECS
        )
        .cyan()
    );

    loop {
        match client.fetch_option_chain(ticker).await {
            Ok(doc) => {
                let path = capture::save_capture(dir, &doc)?;
                println!("{} Saved {}", "✓".green(), path.display());
            }
            Err(e) => {
                println!("{} Fetch failed: {}", "✗".red(), e);
            }
        }
        tokio::time::sleep(Duration::from_secs(config::CAPTURE_INTERVAL_SECS)).await;
    }
}

/// Fetch end-of-day quotes for the given tickers and print them.
async fn fetch_quotes(tickers: &[String]) -> Result<()> {
    let client = QuoteClient::new(QuotesConfig::from_env()?)?;

    println!("{}", format!("Fetching quotes for {} tickers...", tickers.len()).cyan());
    let quotes = client.fetch_eod_quotes(tickers).await?;

    for ticker in tickers {
        match quotes.get(ticker) {
            Some(quote) => println!(
                "  {} {} close: {:.2}, change: {:.2}%",
                "✓".green(),
                ticker.yellow(),
                quote.close.unwrap_or(f64::NAN),
                quote.change_percent.unwrap_or(0.0) * 100.0
            ),
            None => println!("  {} {} missing from response", "✗".red(), ticker.yellow()),
        }
    }
    println!();
    println!("{} {} quotes fetched", "✓".green(), quotes.len());

    Ok(())
}

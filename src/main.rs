// src/main.rs
// =============================================================================
// This is the entry point of the page-warmer CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 2 = error)
//
// The warmer itself is fire-and-forget. A CLI process would exit before any
// background fetch got going, so `warm` waits for the background work to go
// idle before printing what ended up in the cache.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, TuningArgs};
use page_warmer::extract::extract_image_urls;
use page_warmer::http::{CacheStats, CachingHttpClient};
use page_warmer::logging::init_logging;
use page_warmer::source::RestPageSource;
use page_warmer::{CacheWarmer, PageTitle, WikiSite};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Warm { site, titles, tuning, json } => handle_warm(&site, &titles, &tuning, json).await,
        Commands::Extract { file, json } => handle_extract(&file, json).await,
    }
}

// Handles the 'warm' subcommand
async fn handle_warm(site: &str, titles: &[String], tuning: &TuningArgs, json: bool) -> Result<()> {
    let site = WikiSite::parse(site)?;
    let titles = titles
        .iter()
        .map(|t| PageTitle::new(site.clone(), t))
        .collect::<Result<Vec<_>, _>>()?;

    let config = tuning.to_config();
    let client = CachingHttpClient::from_config(&config).context("could not build HTTP client")?;
    let cache = Arc::clone(client.cache());

    let http = Arc::new(client);
    let source = Arc::new(RestPageSource::new(http.clone()));
    let warmer = CacheWarmer::new(source, http, &config)?;

    for title in titles {
        tracing::info!(page = %title, "warming");
        warmer.warm(title);
    }

    warmer.wait_idle().await;

    print_stats(&cache.stats(), json)
}

// Handles the 'extract' subcommand
async fn handle_extract(file: &Path, json: bool) -> Result<()> {
    let markup = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("could not read {}", file.display()))?;

    let mut urls: Vec<String> = extract_image_urls(&markup).into_iter().collect();
    urls.sort();

    if json {
        println!("{}", serde_json::to_string_pretty(&urls)?);
    } else {
        for url in &urls {
            println!("{}", url);
        }
        println!("\n📋 {} image URL(s)", urls.len());
    }

    Ok(())
}

fn print_stats(stats: &CacheStats, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!("{:<90}", "CACHED URL");
    println!("{}", "=".repeat(90));
    for url in &stats.urls {
        // Truncate URL if too long for display
        let display = if url.chars().count() > 87 {
            format!("{}...", url.chars().take(87).collect::<String>())
        } else {
            url.clone()
        };
        println!("{}", display);
    }

    println!();
    println!("📊 Summary:");
    println!("   📦 Entries: {}", stats.entries);
    println!("   💾 Bytes: {}", stats.total_bytes);

    Ok(())
}

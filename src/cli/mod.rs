// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cache;
pub mod scrape;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;

/// DiveMeets scraper CLI
#[derive(Parser, Debug)]
#[command(name = "divemeets-cli")]
#[command(version)]
#[command(about = "Scrape diving meet results into structured records", long_about = None)]
pub struct Cli {
    /// Directory holding the cache files
    #[arg(long, env = "DIVEMEETS_CACHE_DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch pages and print their parsed records
    Scrape(scrape::ScrapeArgs),

    /// Inspect or manage the on-disk caches
    Cache(cache::CacheArgs),
}

/// Load `.env`, read the environment and apply command-line overrides
pub fn load_config(cache_dir: Option<PathBuf>) -> Result<AppConfig> {
    dotenv::dotenv().ok();

    let mut config = AppConfig::from_env();
    if let Some(dir) = cache_dir {
        config.cache.cache_dir = dir;
    }
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let config = load_config(cli.cache_dir)?;
    match cli.command {
        Commands::Scrape(args) => scrape::run_scrape(args, config).await,
        Commands::Cache(args) => cache::run_cache(args, config),
    }
}

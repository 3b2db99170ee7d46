// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cache::CacheRegistry;
use crate::config::AppConfig;

/// Arguments for the cache command
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    /// Rewrite the cache files without their expired entries
    Save,
    /// Load the cache files and report what is still fresh
    Load,
    /// Delete the cache files
    Clear,
    /// Print per-cache statistics as JSON
    Stats,
}

/// Run a cache management action
pub fn run_cache(args: CacheArgs, config: AppConfig) -> Result<()> {
    let registry = CacheRegistry::init(config.cache);
    let dir = registry.cache_dir().display().to_string();

    match args.action {
        CacheAction::Save => {
            registry.load_all();
            let purged = registry.purge_expired();
            let saved = registry.save_all();
            println!("💾 Saved {} caches to {} ({} expired entries dropped)", saved, dir, purged);
        }
        CacheAction::Load => {
            let loaded = registry.load_all();
            println!("📂 Loaded {} fresh entries from {}", loaded, dir);
        }
        CacheAction::Clear => {
            registry.clear_all();
            println!("🧹 Cleared caches in {}", dir);
        }
        CacheAction::Stats => {
            registry.load_all();
            println!("{}", serde_json::to_string_pretty(&registry.stats())?);
        }
    }
    Ok(())
}

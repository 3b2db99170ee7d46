// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use tracing::{info, warn};

use crate::cache::CacheRegistry;
use crate::config::AppConfig;
use crate::parse::{EntriesParser, PageKind, StructuredResult};
use crate::pipeline::Pipeline;

/// Arguments for the scrape command
#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// Page layout to parse
    #[arg(value_enum)]
    pub kind: PageKind,

    /// Page URLs, processed concurrently
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,

    /// Keep entry-list divers that have no "DD Total" row
    #[arg(long)]
    pub keep_unterminated: bool,

    /// Skip "DD Total" rows that close a record with no diver header
    #[arg(long)]
    pub require_header: bool,
}

/// Scrape pages and print what they contain
pub async fn run_scrape(args: ScrapeArgs, config: AppConfig) -> Result<()> {
    let registry = CacheRegistry::init(config.cache.clone());
    let loaded = registry.load_all();
    info!("Starting scrape with {} cached entries", loaded);

    let entries_parser = EntriesParser::new(config.site.base_url.clone())
        .keep_unterminated(args.keep_unterminated)
        .require_header(args.require_header);
    let pipeline = Pipeline::from_config(&config, registry.clone())?.with_entries_parser(entries_parser);

    let results = pipeline.scrape_many(&args.urls, args.kind).await;
    registry.save_all();

    let mut failed = 0;
    for (url, result) in args.urls.iter().zip(results) {
        match result {
            Some(result) if args.json => println!("{}", serde_json::to_string_pretty(&result)?),
            Some(result) => print_result(url, &result),
            None => {
                warn!("No {:?} data from {}", args.kind, url);
                failed += 1;
            }
        }
    }

    if failed == args.urls.len() {
        return Err(anyhow!("No page could be scraped"));
    }
    Ok(())
}

fn print_result(url: &str, result: &StructuredResult) {
    println!("📄 {} ({} records)", url, result.len());
    match result {
        StructuredResult::Ranked(rows) => {
            for row in rows {
                println!("{:>4}. {:<30} {:<25} {:>8}  {}", row.place, row.name, row.team, row.score, row.score_diff);
            }
        }
        StructuredResult::Scores(scores) => {
            for (judge, score) in scores {
                println!("  Judge {}: {:.1}", judge, score);
            }
        }
        StructuredResult::Entries(entries) => {
            for entry in entries {
                let board = entry.board.as_deref().unwrap_or("-");
                println!(
                    "  {}, {} ({}) board {}, {} dives, DD {:.1}",
                    entry.last_name,
                    entry.first_name,
                    entry.team,
                    board,
                    entry.dives.len(),
                    entry.total_dd
                );
                for dive in &entry.dives {
                    println!("      {:<6} {:>2}M {:<40} {:.1}", dive.number, dive.height, dive.name, dive.dd);
                }
            }
        }
        StructuredResult::ProfileMeets(rows) => {
            for row in rows {
                println!("  {}", row.join(" | "));
            }
        }
    }
    println!();
}

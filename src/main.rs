//! Engagement Report - ranked engagement reports from interaction exports
//!
//! This application loads interaction records from a JSON Lines file, runs
//! them through the analysis pipeline and prints the rankings.

use std::path::PathBuf;

use engagement_engine::error::Result;
use engagement_engine::{config, loader, log_error, logging, AnalysisPipeline};

fn main() -> Result<()> {
    // Load configuration from environment
    let config = config::Config::from_env()?;

    // Validate configuration
    config.validate()?;

    // Initialize logging/tracing
    logging::init_tracing(&config.app.log_level, &config.app.environment)?;

    config.log_config();

    run(&config).map_err(|e| {
        log_error!(e, "Engagement report failed");
        e
    })
}

fn run(config: &config::Config) -> Result<()> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting engagement report"
    );

    // A path argument takes precedence over INPUT_PATH
    let input = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.pipeline.input_path());

    let mut pipeline = AnalysisPipeline::new(config.sort_strategy()?);
    loader::load_jsonl(&input, &mut pipeline)?;
    let report = pipeline.process_queue()?;

    let top_n = config.report.top_n;
    println!(
        "Processed {} records ({} skipped)",
        report.processed, report.skipped
    );

    println!("\nUsers by watch time");
    for (rank, row) in pipeline.rank_users_by_watch_time(top_n).iter().enumerate() {
        println!("{:>3}. {:<30} {:>8}s", rank + 1, row.entity.to_string(), row.total_seconds);
    }

    println!("\nContent by watch time");
    for (rank, row) in pipeline.rank_content_by_watch_time(top_n).iter().enumerate() {
        println!("{:>3}. {:<30} {:>8}s", rank + 1, row.entity.to_string(), row.total_seconds);
    }

    println!("\nContent by engagement");
    for (rank, row) in pipeline.rank_content_by_engagement(top_n).iter().enumerate() {
        println!(
            "{:>3}. {:<30} likes {:>5}  shares {:>5}  comments {:>5}  total {:>6}",
            rank + 1,
            row.content.to_string(),
            row.likes,
            row.shares,
            row.comments,
            row.total
        );
    }

    println!("\nPlatforms by engagement");
    for (rank, row) in pipeline.rank_platforms_by_engagement(top_n).iter().enumerate() {
        println!(
            "{:>3}. {:<30} engagement {:>6}  interactions {:>6}  watched {:>8}s",
            rank + 1,
            row.platform.to_string(),
            row.engagement,
            row.interactions,
            row.total_seconds
        );
    }

    if let Some(content_id) = config.report.comments_content_id {
        println!("\nComments on content {}", content_id);
        for comment in pipeline.comments_for_content(content_id) {
            println!("  - {}", comment);
        }
    }

    tracing::info!("Engagement report complete");
    Ok(())
}

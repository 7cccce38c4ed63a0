//! Statement Pipeline Binary
//!
//! Runs one pipeline pass over a statement batch and writes the dashboard
//! snapshot.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin statement-pipeline -- statements.json
//! ```
//!
//! # Environment Variables
//!
//! - `PIPELINE_CONFIG`: config file path (default: config.yaml; falls back
//!   to built-in defaults when the file is absent)
//! - `SNAPSHOT_OUT`: snapshot output path (default: snapshot.json)
//! - `RUST_LOG`: log level (default: info)

use anyhow::{Context, bail};
use statement_pipeline::pipeline::PipelineOutput;
use statement_pipeline::{
    Config, InMemoryDerivedStore, Pipeline, build_snapshot, load_batch, load_config,
    persist_output, telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(input_path) = args.next() else {
        bail!("usage: statement-pipeline <statements.json>");
    };

    let config = resolve_config()?;
    let batch = load_batch(std::path::Path::new(&input_path))
        .with_context(|| format!("loading statement batch from {input_path}"))?;

    let pipeline = Pipeline::new(config.clone());
    let output = pipeline.run(&batch)?;

    let store = InMemoryDerivedStore::new();
    persist_output(&store, &output)
        .await
        .context("persisting pipeline output")?;

    let snapshot = build_snapshot(&output, &batch, config.pipeline.recent_alerts_limit);
    let snapshot_path =
        std::env::var("SNAPSHOT_OUT").unwrap_or_else(|_| "snapshot.json".to_string());
    std::fs::write(&snapshot_path, serde_json::to_string_pretty(&snapshot)?)
        .with_context(|| format!("writing snapshot to {snapshot_path}"))?;

    print_ranking(&output);
    tracing::info!(snapshot = %snapshot_path, "pipeline finished");

    Ok(())
}

/// Load the configured policy tables, falling back to defaults when no
/// config file exists.
fn resolve_config() -> anyhow::Result<Config> {
    let path = std::env::var("PIPELINE_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
    if std::path::Path::new(&path).exists() {
        Ok(load_config(Some(&path))?)
    } else {
        tracing::info!(%path, "no config file, using built-in defaults");
        Ok(Config::default())
    }
}

/// Print the cohort ranking table.
fn print_ranking(output: &PipelineOutput) {
    println!(
        "{:>4} {:>10} {:>10} {:>8} {:>10} {:>8} {:>8}",
        "rank", "strategy", "return", "sharpe", "drawdown", "winrate", "score"
    );
    for score in &output.scores {
        let rank = score
            .rank
            .map_or_else(|| "-".to_string(), |r| r.to_string());
        let Some(stats) = &score.stats else {
            println!("{rank:>4} {:>10} {:>52}", score.strategy_code, "(unscored)");
            continue;
        };
        println!(
            "{:>4} {:>10} {:>9.2}% {:>8.2} {:>9.2}% {:>7.1}% {:>8.1}",
            rank,
            score.strategy_code,
            stats.total_return * rust_decimal::Decimal::ONE_HUNDRED,
            stats.sharpe_ratio.unwrap_or_default(),
            stats.max_drawdown * rust_decimal::Decimal::ONE_HUNDRED,
            stats.win_rate.unwrap_or_default() * rust_decimal::Decimal::ONE_HUNDRED,
            score.total_score.unwrap_or_default(),
        );
    }
    for failure in &output.failures {
        println!("   ! {:>10} excluded: {}", failure.strategy_code, failure.reason);
    }
}

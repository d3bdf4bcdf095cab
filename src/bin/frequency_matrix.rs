use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use drawstats::{config::AnalysisConfig, load::DrawHistory, report};

/// Print how often every number was drawn, overall and at each position.
#[derive(Parser, Debug)]
struct Args {
    /// Draw history CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr) // Log to stderr
        .init();

    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => AnalysisConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(csv) = args.csv {
        cfg.csv_path = csv;
    }

    let history = DrawHistory::load(&cfg)
        .with_context(|| format!("loading draws from {}", cfg.csv_path.display()))?;

    if history.is_empty() {
        println!("No draws found in {}.", cfg.csv_path.display());
        return Ok(());
    }

    // only positions that occur in the file
    let max_sections = history.max_sections();
    let sections: Vec<usize> = cfg
        .sections
        .iter()
        .copied()
        .filter(|&s| s >= 1 && s <= max_sections)
        .collect();
    tracing::info!(
        draws = history.len(),
        sections = sections.len(),
        "building frequency matrix"
    );

    println!(
        "\n--- Number Frequencies ({} draws, {}) ---",
        history.len(),
        history.source().display()
    );
    report::frequency_matrix(&history, &sections, cfg.max_number).printstd();

    Ok(())
}

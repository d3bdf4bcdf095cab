use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use drawstats::{
    config::AnalysisConfig,
    load::DrawHistory,
    plot,
    report::{self, RunReport},
    stats::ChiSquareOptions,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Frequency statistics and uniformity tests over lottery draw history"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Draw history CSV (overrides the config file)
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for chart PNGs
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Only draws on or after this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    since: Option<NaiveDate>,

    /// Only draws on or before this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    until: Option<NaiveDate>,

    /// Skip chart rendering
    #[arg(long, global = true)]
    no_plot: bool,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Most frequent numbers regardless of position
    Top {
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },
    /// Most frequent numbers at each ball position
    Sections {
        #[arg(short = 'n', long)]
        top: Option<usize>,
        #[arg(long, value_delimiter = ',')]
        sections: Option<Vec<usize>>,
    },
    /// Chi-square test of each position against a uniform distribution
    ChiSquare {
        #[arg(long, value_delimiter = ',')]
        sections: Option<Vec<usize>>,
        #[arg(long)]
        alpha: Option<f64>,
        #[arg(long)]
        max_number: Option<u32>,
    },
    /// Everything above
    All,
}

fn build_config(args: &Args) -> Result<AnalysisConfig> {
    let mut cfg = match &args.config {
        Some(path) => AnalysisConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(csv) = &args.csv {
        cfg.csv_path = csv.clone();
    }
    if let Some(dir) = &args.out_dir {
        cfg.output_dir = dir.clone();
    }
    if args.since.is_some() {
        cfg.since = args.since;
    }
    if args.until.is_some() {
        cfg.until = args.until;
    }
    match &args.command {
        Some(Command::Top { top: Some(n) }) => cfg.overall_top_n = *n,
        Some(Command::Sections { top, sections }) => {
            if let Some(n) = top {
                cfg.top_n = *n;
            }
            if let Some(s) = sections {
                cfg.sections = s.clone();
            }
        }
        Some(Command::ChiSquare {
            sections,
            alpha,
            max_number,
        }) => {
            if let Some(s) = sections {
                cfg.sections = s.clone();
            }
            if let Some(a) = alpha {
                cfg.alpha = *a;
            }
            if let Some(m) = max_number {
                cfg.max_number = *m;
            }
        }
        _ => {}
    }
    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

fn run_top(
    history: &DrawHistory,
    cfg: &AnalysisConfig,
    args: &Args,
    run: &mut RunReport,
) -> Result<()> {
    let top = history.top_recurring(cfg.overall_top_n);
    info!(n = cfg.overall_top_n, found = top.len(), "overall top numbers");
    if !args.json {
        println!("\n--- Top {} Recurring Winning Numbers ---", cfg.overall_top_n);
        report::top_table(&top).printstd();
    }
    if !args.no_plot {
        let path = cfg.output_dir.join("top_recurring.png");
        match plot::render_top_recurring(&top, "Top Recurring Winning Numbers", &path) {
            Ok(()) => run.charts.push(path),
            Err(e) => warn!(error = %e, "skipping overall chart"),
        }
    }
    run.top = Some(top);
    Ok(())
}

fn run_sections(
    history: &DrawHistory,
    cfg: &AnalysisConfig,
    args: &Args,
    run: &mut RunReport,
) -> Result<()> {
    let tallies = history.top_by_sections(&cfg.sections, cfg.top_n);
    let skipped: usize = tallies.values().map(|t| t.skipped).sum();
    info!(sections = tallies.len(), skipped, "per-section top numbers");
    if !args.json {
        println!("\n--- Top {} Recurring Winning Numbers by Section ---", cfg.top_n);
        report::sections_table(&tallies).printstd();
    }
    if !args.no_plot {
        let path = cfg.output_dir.join("top_recurring_by_section.png");
        match plot::render_sections(&tallies, &path) {
            Ok(()) => run.charts.push(path),
            Err(e) => warn!(error = %e, "skipping section chart"),
        }
    }
    run.sections = tallies;
    Ok(())
}

fn run_chi_square(
    history: &DrawHistory,
    cfg: &AnalysisConfig,
    args: &Args,
    run: &mut RunReport,
) -> Result<()> {
    if history.is_empty() {
        warn!("no draws to test; skipping chi-square");
        return Ok(());
    }
    let opts = ChiSquareOptions::from(cfg);
    for &section in &cfg.sections {
        let res = history
            .chi_square(section, &opts)
            .with_context(|| format!("chi-square for section {}", section))?;
        if !args.json {
            println!("\nSection {}", section);
            for line in res.report_lines() {
                println!("{}", line);
            }
        }
        run.chi_square.push(res);
    }
    if !args.json && run.chi_square.len() > 1 {
        println!("\n--- Chi-Square Summary (alpha = {}) ---", cfg.alpha);
        report::chi_square_table(&run.chi_square).printstd();
    }
    Ok(())
}

/// Runs the analyses the subcommand asks for over an already loaded history.
fn run_analyses(history: &DrawHistory, cfg: &AnalysisConfig, args: &Args) -> Result<RunReport> {
    let mut run = RunReport::new(history);
    match &args.command {
        Some(Command::Top { .. }) => run_top(history, cfg, args, &mut run)?,
        Some(Command::Sections { .. }) | None => run_sections(history, cfg, args, &mut run)?,
        Some(Command::ChiSquare { .. }) => run_chi_square(history, cfg, args, &mut run)?,
        Some(Command::All) => {
            run_top(history, cfg, args, &mut run)?;
            run_sections(history, cfg, args, &mut run)?;
            run_chi_square(history, cfg, args, &mut run)?;
        }
    }
    Ok(run)
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) configure ────────────────────────────────────────────────
    let args = Args::parse();
    let cfg = build_config(&args)?;
    info!(csv = %cfg.csv_path.display(), out_dir = %cfg.output_dir.display(), "startup");

    // ─── 3) load history once ────────────────────────────────────────
    let history = DrawHistory::load(&cfg)
        .with_context(|| format!("loading draws from {}", cfg.csv_path.display()))?;
    if history.is_empty() {
        warn!("no draws matched; nothing to analyse");
    }

    // ─── 4) run the requested analyses ───────────────────────────────
    let run = run_analyses(&history, &cfg, &args)?;

    // ─── 5) emit ─────────────────────────────────────────────────────
    if args.json {
        println!("{}", run.to_json().context("serializing report")?);
    }

    info!(charts = run.charts.len(), "all done");
    Ok(())
}

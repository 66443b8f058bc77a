use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use configuration::{AnalysisOverrides, Config, load_config};
use engine::{AnalysisEngine, AnalysisError, AnalysisReport, export_all};
use indicatif::{ProgressBar, ProgressStyle};
use market_data::{CsvPriceSource, CsvSymbolDirectory, StaticSymbolDirectory, SymbolDirectory};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

mod display;
mod logging;

/// The main entry point for the Frontier portfolio analyzer.
fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Approximates the efficient frontier of a set of assets by Monte Carlo sampling.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. A missing file falls back to defaults.
    #[arg(long, global = true, default_value = "frontier.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample random portfolios and report the one with the best Sharpe ratio.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    #[command(flatten)]
    overrides: AnalysisOverrides,

    /// Directory to write report.json, frontier.csv and paths.csv into.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    match cli.command {
        Commands::Analyze(args) => {
            config.apply_overrides(&args.overrides);
            config
                .validate()
                .context("Invalid configuration after applying command-line flags")?;

            let _guard = logging::init(&config.logging).context("Failed to initialize logging")?;
            log_config(&cli.config, &config);
            handle_analyze(config, args.output)
        }
    }
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

fn handle_analyze(config: Config, output: Option<PathBuf>) -> Result<()> {
    let prices = Arc::new(CsvPriceSource::new(&config.data.price_dir));
    let directory: Arc<dyn SymbolDirectory> = match &config.data.symbols_file {
        Some(path) => Arc::new(
            CsvSymbolDirectory::load(path)
                .with_context(|| format!("Failed to load symbol names from {}", path.display()))?,
        ),
        None => Arc::new(StaticSymbolDirectory::new()),
    };

    let progress_bar = ProgressBar::new(config.analysis.sample_count as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let engine = AnalysisEngine::new(prices, directory).with_progress(progress_bar.clone());
    let report = engine.run(&config.analysis);
    progress_bar.finish_and_clear();
    let report = report.inspect_err(log_failure)?;
    log_outcome(&report);

    display::print_summary(&report);

    if let Some(dir) = output {
        let written = export_all(&report, &dir)
            .with_context(|| format!("Failed to export the report to {}", dir.display()))?;
        for path in written {
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

// ==============================================================================
// Run Events
// ==============================================================================

// Emitted only once `logging::init` has installed the subscriber.
fn log_config(path: &Path, config: &Config) {
    tracing::debug!(path = %path.display(), ?config, "Configuration loaded.");
}

fn log_failure(e: &AnalysisError) {
    tracing::error!(stage = %e.stage, symbols = ?e.symbols, error = %e.source, "Analysis failed.");
}

fn log_outcome(report: &AnalysisReport) {
    tracing::info!(
        best_index = report.best_index,
        sharpe_ratio = report.best.sharpe_ratio,
        max_drawdown = report.max_drawdown,
        "Analysis finished."
    );
}

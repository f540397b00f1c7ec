//! Setupscan CLI: screen tickers for squeeze/trend setups.
//!
//! Commands:
//! - `screen`: classify each ticker on daily bars, confirm Strong setups on
//!   30-minute bars, and print entry, stop-loss and confirmation
//! - `config`: print the effective configuration as TOML

mod logging;
mod render;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use setupscan_core::data::{DataProvider, SyntheticProvider, YahooProvider};
use setupscan_core::tickers::{dedupe, parse_tickers_text, read_ticker_file};
use setupscan_core::{
    FeatureBuilder, FeatureProvider, NoProgress, ScreenProgress, ScreenResult, Screener,
    ScreenerConfig, StdoutProgress,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(
    name = "setupscan",
    version,
    about = "Screen tickers for Bollinger squeeze and EMA-200 trend setups"
)]
struct Cli {
    /// Debug logging (overrides RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen tickers and print actionable setups.
    Screen {
        /// Tickers (e.g., SPY QQQ AAPL). Commas are accepted as separators.
        tickers: Vec<String>,

        /// Ticker file: .csv (first column) or free text.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pause between tickers in milliseconds (overrides the config).
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Include "Hold for now" rows.
        #[arg(long, default_value_t = false)]
        all: bool,

        /// Print results as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Use deterministic synthetic bars instead of Yahoo Finance.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
    /// Print the effective configuration as TOML.
    Config {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Screen {
            tickers,
            file,
            config,
            delay_ms,
            all,
            json,
            synthetic,
        } => run_screen(ScreenArgs {
            tickers,
            file,
            config,
            delay_ms,
            all,
            json,
            synthetic,
        }),
        Commands::Config { config } => run_config(config.as_deref()),
    }
}

struct ScreenArgs {
    tickers: Vec<String>,
    file: Option<PathBuf>,
    config: Option<PathBuf>,
    delay_ms: Option<u64>,
    all: bool,
    json: bool,
    synthetic: bool,
}

fn load_config(path: Option<&Path>) -> Result<ScreenerConfig> {
    match path {
        Some(p) => ScreenerConfig::from_file(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(ScreenerConfig::default()),
    }
}

fn collect_tickers(positional: &[String], file: Option<&Path>) -> Result<Vec<String>> {
    let mut tickers = parse_tickers_text(&positional.join(" "));
    if let Some(path) = file {
        tickers.extend(read_ticker_file(path)?);
    }
    Ok(dedupe(tickers))
}

fn run_screen(args: ScreenArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(ms) = args.delay_ms {
        config.screen.throttle_ms = ms;
    }
    config.validate()?;

    let tickers = collect_tickers(&args.tickers, args.file.as_deref())?;
    if tickers.is_empty() {
        bail!("no tickers given; pass symbols or --file");
    }
    info!(count = tickers.len(), synthetic = args.synthetic, "screening");

    let builder = FeatureBuilder::new(config.features.clone());
    let results = if args.synthetic {
        let provider = SyntheticProvider::new(Local::now().date_naive());
        screen_with(provider, builder, &config, &tickers, args.json)
    } else {
        let provider = YahooProvider::new(HTTP_TIMEOUT)?;
        screen_with(provider, builder, &config, &tickers, args.json)
    };

    let shown: Vec<&ScreenResult> = results
        .iter()
        .filter(|r| args.all || r.signal.is_actionable())
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else {
        println!();
        print!("{}", render::format_table(shown));
    }
    Ok(())
}

fn screen_with<P: DataProvider>(
    provider: P,
    builder: FeatureBuilder,
    config: &ScreenerConfig,
    tickers: &[String],
    quiet: bool,
) -> Vec<ScreenResult> {
    let screener = Screener::from_config(FeatureProvider::new(provider, builder), config);
    let progress: &dyn ScreenProgress = if quiet { &NoProgress } else { &StdoutProgress };
    screener.run(tickers, progress).results
}

fn run_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

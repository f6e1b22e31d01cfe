//! scratchev — scratch-off lottery expected value analyzer.
//!
//! Entry point. Parses the command line, loads configuration,
//! initialises structured logging, fetches game records from the
//! configured sources, and runs single-game analysis or the batch
//! comparison over them.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use scratchev::config::AppConfig;
use scratchev::engine::Analyzer;
use scratchev::report::{self, SortKey};
use scratchev::source::{fetch_all, file::FileSource, http::HttpSource, GameSource};
use scratchev::types::{AnalysisOptions, RawGame};

#[derive(Parser)]
#[command(name = "scratchev", version, about = "Scratch-off lottery expected value analyzer")]
struct Cli {
    /// Configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Zero out cash prizes under $500.
    #[arg(long)]
    ignore_under_500: bool,

    /// Apply tax withholding to cash prizes.
    #[arg(long)]
    apply_tax: bool,

    /// Withholding rate in percent (implies --apply-tax).
    #[arg(long)]
    tax_rate: Option<f64>,

    /// Emit JSON instead of tables.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Per-game EV analysis for every game in the input.
    Analyze {
        /// JSON file of games (falls back to configured sources).
        file: Option<String>,

        /// Restrict to one game number.
        #[arg(long)]
        game: Option<String>,
    },
    /// Claimed-vs-current EV comparison across the batch.
    Compare {
        /// JSON file of games (falls back to configured sources).
        file: Option<String>,

        /// Sort column: price, name, number, claimed-odds, calc-odds,
        /// claimed-ev, calc-ev, delta.
        #[arg(long)]
        sort: Option<SortKey>,

        /// Sort descending.
        #[arg(long)]
        desc: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    init_logging();

    let cfg = AppConfig::load_or_default(&cli.config)?;
    let options = resolve_options(&cfg, &cli);
    let analyzer = Analyzer::new(options);

    match &cli.command {
        Command::Analyze { file, game } => {
            let games = load_games(file.as_deref(), &cfg).await?;
            run_analyze(&analyzer, &games, game.as_deref(), cli.json)
        }
        Command::Compare { file, sort, desc } => {
            let games = load_games(file.as_deref(), &cfg).await?;
            run_compare(&analyzer, &games, &cfg, *sort, *desc, cli.json)
        }
    }
}

/// Merge config-file analysis options with command-line overrides.
fn resolve_options(cfg: &AppConfig, cli: &Cli) -> AnalysisOptions {
    let mut options = cfg.analysis;
    if cli.ignore_under_500 {
        options.ignore_under_500 = true;
    }
    if cli.apply_tax {
        options.apply_tax = true;
    }
    if let Some(rate) = cli.tax_rate {
        options.apply_tax = true;
        options.tax_rate = rate;
    }
    options
}

/// Gather raw games from the file argument or the configured sources.
async fn load_games(file: Option<&str>, cfg: &AppConfig) -> Result<Vec<RawGame>> {
    let mut sources: Vec<Box<dyn GameSource>> = Vec::new();

    if let Some(path) = file {
        sources.push(Box::new(FileSource::new(path)));
    } else {
        if let Some(path) = &cfg.source.games_file {
            sources.push(Box::new(FileSource::new(path)));
        }
        if let Some(url) = &cfg.source.games_url {
            sources.push(Box::new(HttpSource::new(url)?));
        }
    }

    if sources.is_empty() {
        bail!("no input: pass a games file or configure [source] in config.toml");
    }

    let batches = fetch_all(&sources).await;
    let games: Vec<RawGame> = batches.into_iter().flat_map(|b| b.games).collect();
    if games.is_empty() {
        bail!("no games fetched from any source");
    }

    info!(games = games.len(), "input loaded");
    Ok(games)
}

fn run_analyze(
    analyzer: &Analyzer,
    games: &[RawGame],
    only_game: Option<&str>,
    json: bool,
) -> Result<()> {
    let selected: Vec<&RawGame> = games
        .iter()
        .filter(|g| only_game.map_or(true, |n| g.number == n))
        .collect();
    if selected.is_empty() {
        bail!("no game matches number {:?}", only_game.unwrap_or_default());
    }

    let mut analyses = Vec::new();
    for raw in selected {
        match analyzer.analyze(raw) {
            Ok(analysis) => analyses.push(analysis),
            // Failures are values — report and move on.
            Err(e) => println!("{}: {e}\n", raw.name),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&analyses)?);
    } else {
        for analysis in &analyses {
            println!("{}", report::render_analysis(analysis));
        }
    }
    Ok(())
}

fn run_compare(
    analyzer: &Analyzer,
    games: &[RawGame],
    cfg: &AppConfig,
    sort: Option<SortKey>,
    desc: bool,
    json: bool,
) -> Result<()> {
    let mut results = analyzer.compare(games);

    let key = match sort {
        Some(key) => key,
        None => cfg.report.sort_by.parse()?,
    };
    let descending = desc || cfg.report.descending;
    report::sort_results(&mut results, key, descending);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", report::render_comparison(&results));
    }
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scratchev=info"));

    fmt().with_env_filter(env_filter).with_target(true).init();
}

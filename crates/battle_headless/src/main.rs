//! Headless battle runner.
//!
//! Runs tank battles without graphics and prints results as JSON on
//! stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Run the built-in skirmish
//! cargo run -p battle_headless -- run
//!
//! # Run a scenario file with a specific seed, streaming frames
//! cargo run -p battle_headless -- run --scenario scenarios/siege.ron --seed 42 --frames 30
//!
//! # Ad-hoc lineups with a config override
//! cargo run -p battle_headless -- run --player fish_002,fish_002 --opponent fish_004 --config rules.ron
//!
//! # Run a balance batch
//! cargo run -p battle_headless -- batch --count 1000 --output results/batch.json
//!
//! # Check a seed replays identically
//! cargo run -p battle_headless -- verify --seed 7 --runs 5
//! ```

use std::io::Write;
use std::path::PathBuf;

use battle_core::config::BattleConfig;
use battle_core::sinks::FrameSnapshot;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use battle_headless::{
    batch::{run_batch, verify_determinism, BatchConfig},
    runner::{HeadlessConfig, HeadlessRunner},
    scenario::Scenario,
};

#[derive(Parser)]
#[command(name = "battle_headless")]
#[command(about = "Headless tank battle runner for balance testing and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single match and print its report
    Run {
        #[command(flatten)]
        source: ScenarioArgs,

        /// Seed override
        #[arg(long)]
        seed: Option<u64>,

        /// Print a frame every N combat ticks
        #[arg(long, default_value = "0")]
        frames: u64,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// Run a batch of seeds for balance testing
    Batch {
        #[command(flatten)]
        source: ScenarioArgs,

        /// Number of matches to run
        #[arg(short, long, default_value = "100")]
        count: u32,

        /// Number of parallel matches (0 = auto)
        #[arg(short, long, default_value = "0")]
        parallel: u32,

        /// First seed
        #[arg(long, default_value = "0")]
        seed_start: u64,

        /// Write full results to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a seed replays identically
    Verify {
        #[command(flatten)]
        source: ScenarioArgs,

        /// Seed to replay
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Number of replays
        #[arg(long, default_value = "3")]
        runs: u32,
    },
}

/// Where the scenario comes from.
#[derive(clap::Args)]
struct ScenarioArgs {
    /// Scenario RON file (defaults to the built-in skirmish)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Player lineup, comma separated (replaces the scenario's)
    #[arg(long, value_delimiter = ',')]
    player: Vec<String>,

    /// Opponent collection, comma separated (replaces the scenario's)
    #[arg(long, value_delimiter = ',')]
    opponent: Vec<String>,

    /// Battle config RON file (replaces the scenario's)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ScenarioArgs {
    fn resolve(&self) -> Result<Scenario, String> {
        let mut scenario = match &self.scenario {
            Some(path) => Scenario::load(path).map_err(|e| e.to_string())?,
            None => Scenario::skirmish(),
        };

        if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
            scenario.config = BattleConfig::from_ron_str(&text).map_err(|e| e.to_string())?;
        }

        if !self.player.is_empty() {
            let opponent = if self.opponent.is_empty() {
                scenario.opponent.clone()
            } else {
                self.opponent.clone()
            };
            let mut adhoc = Scenario::from_lineups(&self.player, &opponent, scenario.config);
            adhoc.seed = scenario.seed;
            scenario = adhoc;
        } else if !self.opponent.is_empty() {
            scenario.opponent = self.opponent.clone();
        }

        scenario.validate().map_err(|e| e.to_string())?;
        Ok(scenario)
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for results)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let outcome = match cli.command {
        Some(Commands::Run {
            source,
            seed,
            frames,
            pretty,
        }) => cmd_run(&source, seed, frames, pretty),
        Some(Commands::Batch {
            source,
            count,
            parallel,
            seed_start,
            output,
        }) => cmd_batch(&source, count, parallel, seed_start, output),
        Some(Commands::Verify { source, seed, runs }) => cmd_verify(&source, seed, runs),
        None => cmd_run(
            &ScenarioArgs {
                scenario: None,
                player: Vec::new(),
                opponent: Vec::new(),
                config: None,
            },
            None,
            0,
            true,
        ),
    };

    if let Err(message) = outcome {
        eprintln!("Error: {message}");
        std::process::exit(1);
    }
}

fn cmd_run(source: &ScenarioArgs, seed: Option<u64>, frames: u64, pretty: bool) -> Result<(), String> {
    let scenario = source.resolve()?;
    let runner = HeadlessRunner::with_config(HeadlessConfig {
        seed,
        frame_every: frames,
    });

    let stdout = std::io::stdout();
    let mut frame_sink = |frame: &FrameSnapshot| {
        if let Ok(line) = serde_json::to_string(frame) {
            let _ = writeln!(stdout.lock(), "{line}");
        }
    };
    let report = runner
        .run_with_frames(&scenario, &mut frame_sink)
        .map_err(|e| e.to_string())?;

    let json = if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn cmd_batch(
    source: &ScenarioArgs,
    count: u32,
    parallel: u32,
    seed_start: u64,
    output: Option<PathBuf>,
) -> Result<(), String> {
    let scenario = source.resolve()?;
    let results = run_batch(
        &scenario,
        BatchConfig {
            match_count: count,
            parallel,
            seed_start,
        },
    );

    if let Some(path) = output {
        results
            .save(&path)
            .map_err(|e| format!("Failed to save results to {}: {e}", path.display()))?;
        tracing::info!(path = %path.display(), "Results saved");
    }

    let json = serde_json::to_string_pretty(&results.summary).map_err(|e| e.to_string())?;
    println!("{json}");
    if results.errors.is_empty() {
        Ok(())
    } else {
        Err(format!("{} matches failed", results.errors.len()))
    }
}

fn cmd_verify(source: &ScenarioArgs, seed: u64, runs: u32) -> Result<(), String> {
    let scenario = source.resolve()?;
    if verify_determinism(&scenario, seed, runs) {
        println!("deterministic: {runs} runs of seed {seed} matched");
        Ok(())
    } else {
        Err(format!("seed {seed} diverged across {runs} runs"))
    }
}

//! Batch match runner for balance testing.
//!
//! Runs one scenario across many seeds in parallel using rayon and
//! aggregates win rates, deciding rules and payouts.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use battle_core::unit::Side;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::runner::{HeadlessConfig, HeadlessRunner, MatchReport};
use crate::scenario::Scenario;

/// Configuration for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of matches to run.
    pub match_count: u32,
    /// Maximum parallel matches (0 = use rayon default).
    pub parallel: u32,
    /// Seed of the first match; match `i` uses `seed_start + i`.
    pub seed_start: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            match_count: 100,
            parallel: 0,
            seed_start: 0,
        }
    }
}

/// Compact outcome of one batch match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Seed used.
    pub seed: u64,
    /// Winning side.
    pub winner: Side,
    /// Deciding rule, as text.
    pub reason: String,
    /// Combat duration.
    pub duration_ms: u64,
    /// Tickets paid to the player.
    pub tickets: u32,
}

impl From<&MatchReport> for MatchSummary {
    fn from(report: &MatchReport) -> Self {
        Self {
            seed: report.seed,
            winner: report.result.winner,
            reason: format!("{:?}", report.result.reason),
            duration_ms: report.result.duration_ms,
            tickets: report.result.tickets_earned,
        }
    }
}

/// Aggregate statistics across a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Matches that finished.
    pub matches: u32,
    /// Player wins.
    pub player_wins: u32,
    /// Opponent wins.
    pub opponent_wins: u32,
    /// Share of matches the player won.
    pub player_win_rate: f64,
    /// How often each rule decided a match.
    pub reasons: BTreeMap<String, u32>,
    /// Mean combat duration.
    pub avg_duration_ms: f64,
    /// Mean tickets paid.
    pub avg_tickets: f64,
}

impl BatchSummary {
    /// Summarise finished matches.
    #[must_use]
    pub fn from_matches(matches: &[MatchSummary]) -> Self {
        let mut summary = Self {
            matches: u32::try_from(matches.len()).unwrap_or(u32::MAX),
            ..Self::default()
        };
        if matches.is_empty() {
            return summary;
        }

        let mut duration = 0u64;
        let mut tickets = 0u64;
        for m in matches {
            match m.winner {
                Side::Player => summary.player_wins += 1,
                Side::Opponent => summary.opponent_wins += 1,
            }
            *summary.reasons.entry(m.reason.clone()).or_insert(0) += 1;
            duration += m.duration_ms;
            tickets += u64::from(m.tickets);
        }

        let n = matches.len() as f64;
        summary.player_win_rate = f64::from(summary.player_wins) / n;
        summary.avg_duration_ms = duration as f64 / n;
        summary.avg_tickets = tickets as f64 / n;
        summary
    }
}

/// Error during a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchError {
    /// Seed used.
    pub seed: u64,
    /// Error message.
    pub message: String,
}

/// Results from a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Scenario name.
    pub scenario: String,
    /// Configuration used.
    pub config: BatchConfig,
    /// Individual matches, in seed order.
    pub matches: Vec<MatchSummary>,
    /// Aggregate summary.
    pub summary: BatchSummary,
    /// Wall-clock runtime.
    pub duration_seconds: f64,
    /// Matches that failed to run.
    pub errors: Vec<BatchError>,
}

impl BatchResults {
    /// Save results to a JSON file.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Load results from a JSON file.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(std::io::Error::other)
    }
}

/// Run `scenario` once per seed in parallel.
pub fn run_batch(scenario: &Scenario, config: BatchConfig) -> BatchResults {
    let start = Instant::now();
    info!(
        scenario = %scenario.name,
        matches = config.match_count,
        "Starting batch"
    );

    if config.parallel > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel as usize)
            .build_global()
            .ok(); // Ignore if already set
    }

    let results: Vec<Result<MatchSummary, BatchError>> = (0..config.match_count)
        .into_par_iter()
        .map(|i| {
            let seed = config.seed_start.wrapping_add(u64::from(i));
            let runner = HeadlessRunner::with_config(HeadlessConfig {
                seed: Some(seed),
                frame_every: 0,
            });
            runner
                .run(scenario)
                .map(|report| MatchSummary::from(&report))
                .map_err(|e| {
                    warn!(seed, error = %e, "Match failed");
                    BatchError {
                        seed,
                        message: e.to_string(),
                    }
                })
        })
        .collect();

    let (matches, errors): (Vec<_>, Vec<_>) = results.into_iter().partition(Result::is_ok);
    let matches: Vec<MatchSummary> = matches.into_iter().filter_map(Result::ok).collect();
    let errors: Vec<BatchError> = errors.into_iter().filter_map(Result::err).collect();

    let summary = BatchSummary::from_matches(&matches);
    let duration_seconds = start.elapsed().as_secs_f64();

    info!(
        matches = matches.len(),
        failed = errors.len(),
        player_win_rate = summary.player_win_rate,
        "Batch complete in {duration_seconds:.1}s"
    );

    BatchResults {
        scenario: scenario.name.clone(),
        config,
        matches,
        summary,
        duration_seconds,
        errors,
    }
}

/// Verify determinism by running the same seed several times.
pub fn verify_determinism(scenario: &Scenario, seed: u64, runs: u32) -> bool {
    let runner = HeadlessRunner::with_config(HeadlessConfig {
        seed: Some(seed),
        frame_every: 0,
    });
    let reports: Vec<Option<MatchReport>> = (0..runs).map(|_| runner.run(scenario).ok()).collect();
    reports.iter().all(Option::is_some) && reports.windows(2).all(|w| w[0] == w[1])
}

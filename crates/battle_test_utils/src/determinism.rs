//! Determinism testing utilities.
//!
//! Provides a harness for verifying that a battle produces identical
//! results given an identical seed, config and deployments.
//!
//! # Testing Strategy
//!
//! Replays and result verification depend on a battle being fully
//! reproducible. Sources of non-determinism include:
//!
//! - **Floating-point math**: positions and ranges use
//!   [`battle_core::math::Fixed`] throughout.
//!
//! - **Iteration order**: rosters are vectors kept in deployment order;
//!   nothing iterates a hash map.
//!
//! - **System randomness**: damage rolls and waypoints come from the
//!   battle's own seeded `ChaCha8Rng`.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: individual pieces (damage, AI, victory) are pure
//! 2. **Property tests**: random lineups must still replay exactly
//! 3. **Integration tests**: full matches are reproducible
//! 4. **Parallel tests**: N battles on N threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use battle_core::battle::Battle;
use battle_core::data::FishCatalog;
use battle_core::result::MatchResult;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic battle).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the battle was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Battle is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Result of parallel battle runs.
#[derive(Debug, Clone)]
pub struct ParallelRunResult {
    /// Final state hash from each battle.
    pub hashes: Vec<u64>,
    /// Number of ticks each battle ran.
    pub ticks: u64,
    /// Number of battles run.
    pub num_runs: usize,
}

impl ParallelRunResult {
    /// Check if all battles produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all battles matched.
    ///
    /// # Panics
    ///
    /// Panics if the battles produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel battles diverged!\n\
                 Battles: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_runs,
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial state
/// * `step` - Function to advance the state by one tick
/// * `hash` - Function to compute state hash
///
/// # Example
///
/// ```ignore
/// use battle_test_utils::determinism::verify_determinism;
///
/// let result = verify_determinism(
///     5,   // Run 5 times
///     100, // 100 ticks each
///     || setup_battle(),
///     |battle| { battle.tick(); },
///     |battle| battle.state_hash(),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();
        for _ in 0..ticks {
            step(&mut state);
        }
        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    if !is_deterministic {
        tracing::warn!(runs, ticks, ?hashes, "Runs diverged");
    }

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Run a battle twice from the same setup and compare final state hashes.
///
/// # Example
///
/// ```ignore
/// use battle_test_utils::determinism::verify_battle_determinism;
/// use battle_test_utils::fixtures::BattleBuilder;
///
/// assert!(verify_battle_determinism(
///     || BattleBuilder::new(9).player(&["fish_002"]).opponent(&["fish_001"]).start(),
///     600,
/// ));
/// ```
pub fn verify_battle_determinism<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> Battle<FishCatalog>,
{
    let result = verify_determinism(
        2,
        num_ticks,
        &setup_fn,
        |battle| {
            battle.tick();
        },
        |battle| battle.state_hash(),
    );
    result.is_deterministic
}

/// Run N battles on scoped threads and collect final hashes.
///
/// Catches non-determinism that only shows up under thread scheduling or
/// memory layout differences.
pub fn run_parallel_battles<F>(setup_fn: F, num_runs: usize, num_ticks: u64) -> ParallelRunResult
where
    F: Fn() -> Battle<FishCatalog> + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_runs)
            .map(|_| {
                s.spawn(|| {
                    let mut battle = setup_fn();
                    for _ in 0..num_ticks {
                        battle.tick();
                    }
                    battle.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("battle thread panicked"))
            .collect()
    });

    ParallelRunResult {
        hashes,
        ticks: num_ticks,
        num_runs,
    }
}

/// Compare two battle runs tick-by-tick, finding the first divergence.
///
/// # Returns
///
/// `None` if the runs match throughout, `Some(tick)` for the first tick
/// whose state hashes differ (0 means they differed before ticking).
pub fn find_first_divergence<F>(setup_fn: F, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> Battle<FishCatalog>,
{
    let mut first = setup_fn();
    let mut second = setup_fn();

    if first.state_hash() != second.state_hash() {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        first.tick();
        second.tick();
        if first.state_hash() != second.state_hash() {
            return Some(tick);
        }
    }

    None
}

/// Check that a finished result survives a bincode round-trip unchanged.
pub fn verify_result_round_trip(result: &MatchResult) -> bool {
    let Ok(bytes) = result.serialize() else {
        return false;
    };
    MatchResult::deserialize(&bytes).is_ok_and(|restored| &restored == result)
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for battle testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based tests.
pub mod strategies {
    use battle_core::combat::{FACTOR_MAX, FACTOR_MIN};
    use battle_core::math::{Fixed, Vec2Fixed};
    use proptest::prelude::*;

    use crate::fixtures::BUILTIN_FISH;

    /// Generate a coordinate inside the default 600 × 400 tank.
    pub fn arb_tank_point() -> impl Strategy<Value = Vec2Fixed> {
        (-300i32..=300, -200i32..=200).prop_map(|(x, y)| Vec2Fixed::from_ints(x, y))
    }

    /// Generate a fixed-point speed.
    ///
    /// Range: 10 to 150 (units per second)
    pub fn arb_fixed_speed() -> impl Strategy<Value = Fixed> {
        (10i32..150i32).prop_map(Fixed::from_num)
    }

    /// Generate health values (1-1000).
    pub fn arb_health() -> impl Strategy<Value = u32> {
        1u32..1000u32
    }

    /// Generate damage values (1-100).
    pub fn arb_damage() -> impl Strategy<Value = u32> {
        1u32..100u32
    }

    /// Generate a damage roll factor in its full range.
    pub fn arb_factor() -> impl Strategy<Value = u32> {
        FACTOR_MIN..=FACTOR_MAX
    }

    /// Generate one built-in fish type.
    pub fn arb_fish_type() -> impl Strategy<Value = &'static str> {
        proptest::sample::select(BUILTIN_FISH.to_vec())
    }

    /// Generate a lineup of 1 to `max_len` built-in fish.
    pub fn arb_lineup(max_len: usize) -> impl Strategy<Value = Vec<&'static str>> {
        proptest::collection::vec(arb_fish_type(), 1..=max_len)
    }

    /// Generate a battle seed.
    pub fn arb_seed() -> impl Strategy<Value = u64> {
        any::<u64>()
    }
}

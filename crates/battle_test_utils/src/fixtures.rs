//! Test fixtures and helpers.
//!
//! Pre-built units, configs and battles for consistent testing.

use battle_core::battle::{Battle, Phase};
use battle_core::config::BattleConfig;
use battle_core::data::{BattleStats, FishCatalog};
use battle_core::math::{Fixed, Vec2Fixed};
use battle_core::roster::DeployError;
use battle_core::unit::{Role, Side, Unit, UnitId};
use fixed::types::I32F32;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Fish types in the built-in catalog, in catalog order.
pub const BUILTIN_FISH: [&str; 9] = [
    "fish_001", "fish_002", "fish_003", "fish_004", "fish_005", "fish_006", "fish_007",
    "fish_008", "fish_009",
];

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Integer point.
#[must_use]
pub fn point(x: i32, y: i32) -> Vec2Fixed {
    Vec2Fixed::from_ints(x, y)
}

/// Seeded RNG matching the one battles use internally.
#[must_use]
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Combat stats with default speed and range for the role.
#[must_use]
pub fn stats(role: Role, hp: u32, damage: u32) -> BattleStats {
    let (speed, attack_range) = match role {
        Role::Attacker => (60, 100),
        Role::Defender => (50, 90),
        Role::Neutral => (40, 60),
    };
    BattleStats {
        role,
        hp,
        damage,
        speed,
        attack_range,
    }
}

/// Build a unit with detection at twice its attack range.
#[must_use]
pub fn unit_at(id: u32, side: Side, stats: BattleStats, x: i32, y: i32) -> Unit {
    Unit::new(UnitId(id), side, "test_fish", stats, point(x, y), 2)
}

/// Attacker with 100 hp, 20 damage and range 100.
#[must_use]
pub fn attacker(id: u32, side: Side, x: i32, y: i32) -> Unit {
    unit_at(id, side, stats(Role::Attacker, 100, 20), x, y)
}

/// Defender with 100 hp, 15 damage and range 90.
#[must_use]
pub fn defender(id: u32, side: Side, x: i32, y: i32) -> Unit {
    unit_at(id, side, stats(Role::Defender, 100, 15), x, y)
}

/// Neutral with 50 hp that never attacks of its own accord.
#[must_use]
pub fn neutral(id: u32, side: Side, x: i32, y: i32) -> Unit {
    unit_at(id, side, stats(Role::Neutral, 50, 10), x, y)
}

/// The built-in catalog.
///
/// # Panics
///
/// Panics if the compiled-in catalog fails to parse.
#[must_use]
pub fn builtin_catalog() -> FishCatalog {
    FishCatalog::builtin().expect("built-in catalog parses")
}

/// Default config with the player deployment cooldown switched off.
#[must_use]
pub fn quick_config() -> BattleConfig {
    BattleConfig {
        deployment_cooldown_ms: 0,
        ..BattleConfig::default()
    }
}

/// Parse a config from RON, panicking with the parse error.
///
/// # Panics
///
/// Panics if `text` is not a valid config.
#[must_use]
pub fn config_from_ron(text: &str) -> BattleConfig {
    match BattleConfig::from_ron_str(text) {
        Ok(config) => config,
        Err(e) => panic!("invalid test config: {e}"),
    }
}

/// Builder for battles against the built-in catalog.
///
/// # Example
///
/// ```ignore
/// use battle_test_utils::fixtures::BattleBuilder;
///
/// let mut battle = BattleBuilder::new(42)
///     .player(&["fish_002", "fish_002"])
///     .opponent(&["fish_001", "fish_005"])
///     .start();
/// battle.run_to_completion(10_000);
/// ```
#[derive(Debug, Clone)]
pub struct BattleBuilder {
    seed: u64,
    config: BattleConfig,
    player: Vec<(String, Option<Vec2Fixed>)>,
    opponent: Vec<String>,
}

impl BattleBuilder {
    /// Start a builder with the default config.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            config: BattleConfig::default(),
            player: Vec::new(),
            opponent: Vec::new(),
        }
    }

    /// Replace the config.
    #[must_use]
    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    /// Queue player deployments on the left of the tank.
    #[must_use]
    pub fn player(mut self, fish: &[&str]) -> Self {
        self.player
            .extend(fish.iter().map(|id| ((*id).to_string(), None)));
        self
    }

    /// Queue one player deployment at an exact position.
    #[must_use]
    pub fn player_at(mut self, fish: &str, position: Vec2Fixed) -> Self {
        self.player.push((fish.to_string(), Some(position)));
        self
    }

    /// Opponent collection snapshot.
    #[must_use]
    pub fn opponent(mut self, fish: &[&str]) -> Self {
        self.opponent = fish.iter().map(|id| (*id).to_string()).collect();
        self
    }

    /// Deploy everything and stay in the deployment phase.
    ///
    /// Player deployments blocked by the cooldown wait for it by ticking.
    ///
    /// # Panics
    ///
    /// Panics if the config is invalid or a deployment fails for any
    /// reason other than the cooldown.
    #[must_use]
    pub fn build(self) -> Battle<FishCatalog> {
        let mut battle = match Battle::new(self.config, builtin_catalog(), self.seed) {
            Ok(battle) => battle,
            Err(e) => panic!("invalid battle setup: {e}"),
        };
        if let Err(e) = battle.populate_opponent(&self.opponent) {
            panic!("opponent setup failed: {e}");
        }

        let bounds = battle.config().bounds();
        let count = i32::try_from(self.player.len()).unwrap_or(i32::MAX);
        for (index, (fish, position)) in (0_i32..).zip(self.player) {
            let position = position.unwrap_or_else(|| {
                // Spread along a column a third of the way in from the left.
                let height = bounds.max.y - bounds.min.y;
                let y = bounds.min.y + height * fixed(index + 1) / fixed(count + 1);
                Vec2Fixed::new(bounds.min.x + (bounds.max.x - bounds.min.x) / fixed(3), y)
            });
            deploy_waiting(&mut battle, &fish, position);
        }
        battle
    }

    /// Deploy everything and begin combat.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`BattleBuilder::build`].
    #[must_use]
    pub fn start(self) -> Battle<FishCatalog> {
        let mut battle = self.build();
        if let Err(e) = battle.start_combat() {
            panic!("could not start combat: {e}");
        }
        assert_eq!(battle.phase(), Phase::Combat);
        battle
    }
}

fn deploy_waiting(battle: &mut Battle<FishCatalog>, fish: &str, position: Vec2Fixed) -> UnitId {
    // One tick per attempt; the default cooldown clears within a few seconds.
    for _ in 0..1_000 {
        match battle.try_deploy(Side::Player, fish, position) {
            Ok(id) => return id,
            Err(DeployError::CooldownActive { .. }) => {
                battle.tick();
            }
            Err(e) => panic!("player deployment of {fish} failed: {e}"),
        }
    }
    panic!("deployment cooldown for {fish} never cleared");
}

/// Distance helper for assertions.
#[must_use]
pub fn distance(a: &Unit, b: &Unit) -> Fixed {
    a.position.distance(b.position)
}

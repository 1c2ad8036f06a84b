#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic enemy roster generation that scales with the wave number.

use merge_arena_core::{Creature, CreatureIdAllocator, Element, Stats, Tier, CREATURE_BASE_STATS};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

const WAVES_PER_TIER: u32 = 3;
const MAX_TEAM_SIZE: u32 = 3;

/// Per-element adjustment applied to generated enemy stats.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ElementStatMultiplier {
    /// Element the adjustment applies to.
    pub element: Element,
    /// Factor applied to health.
    #[serde(default = "unit")]
    pub health: f64,
    /// Factor applied to attack.
    #[serde(default = "unit")]
    pub attack: f64,
    /// Factor applied to defense.
    #[serde(default = "unit")]
    pub defense: f64,
}

fn unit() -> f64 {
    1.0
}

impl ElementStatMultiplier {
    /// Creates an adjustment entry for `element`.
    #[must_use]
    pub const fn new(element: Element, health: f64, attack: f64, defense: f64) -> Self {
        Self {
            element,
            health,
            attack,
            defense,
        }
    }
}

/// Tuning knobs for enemy roster generation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Waves per additional enemy; the roster holds `ceil(wave / divisor)` enemies.
    pub enemy_count_divisor: u32,
    /// Upper bound on the roster size, itself capped at three.
    pub max_team_size: u32,
    /// Level scaling: enemies are level `floor(wave * multiplier)`, at least one.
    pub enemy_level_multiplier: f64,
    /// Per-level stat growth applied as `1 + multiplier * level`.
    pub enemy_stat_multiplier: f64,
    /// Elements enemies are drawn from, uniformly.
    pub element_pool: Vec<Element>,
    /// Per-element stat adjustments; unlisted elements are unadjusted.
    pub element_multipliers: Vec<ElementStatMultiplier>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enemy_count_divisor: 3,
            max_team_size: MAX_TEAM_SIZE,
            enemy_level_multiplier: 0.5,
            enemy_stat_multiplier: 0.1,
            element_pool: Element::CLASSIC.to_vec(),
            element_multipliers: vec![
                ElementStatMultiplier::new(Element::Fire, 1.0, 1.1, 0.9),
                ElementStatMultiplier::new(Element::Water, 1.1, 1.0, 1.0),
                ElementStatMultiplier::new(Element::Earth, 1.2, 0.9, 1.2),
                ElementStatMultiplier::new(Element::Air, 0.9, 1.1, 0.9),
            ],
        }
    }
}

impl Config {
    /// Checks that every scaling factor is a finite, non-negative number.
    ///
    /// An empty pool, a zero divisor or a zero team size are accepted; they
    /// make the generator fall back to a single starter enemy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_factor("enemy_level_multiplier", self.enemy_level_multiplier)?;
        check_factor("enemy_stat_multiplier", self.enemy_stat_multiplier)?;
        for entry in &self.element_multipliers {
            check_factor("element_multipliers.health", entry.health)?;
            check_factor("element_multipliers.attack", entry.attack)?;
            check_factor("element_multipliers.defense", entry.defense)?;
        }
        Ok(())
    }

    fn element_multiplier(&self, element: Element) -> ElementStatMultiplier {
        self.element_multipliers
            .iter()
            .find(|entry| entry.element == element)
            .copied()
            .unwrap_or(ElementStatMultiplier::new(element, 1.0, 1.0, 1.0))
    }
}

fn check_factor(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidFactor { name, value })
    }
}

/// Reasons a wave generation configuration is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A scaling factor is negative or not a finite number.
    #[error("{name} must be a finite non-negative number, got {value}")]
    InvalidFactor {
        /// Configuration key holding the bad value.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Pure system that builds deterministic enemy rosters for waves.
#[derive(Clone, Debug)]
pub struct WaveGeneration {
    config: Config,
    global_seed: u64,
}

impl WaveGeneration {
    /// Creates a generator whose rosters derive from `global_seed`.
    #[must_use]
    pub fn new(config: Config, global_seed: u64) -> Self {
        Self {
            config,
            global_seed,
        }
    }

    /// Configuration the generator was built from.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of enemies generated for `wave`.
    ///
    /// Returns zero when the configuration cannot produce a roster.
    #[must_use]
    pub fn team_size(&self, wave: u32) -> u32 {
        if self.config.enemy_count_divisor == 0 {
            return 0;
        }
        let cap = self.config.max_team_size.min(MAX_TEAM_SIZE);
        wave.div_ceil(self.config.enemy_count_divisor).max(1).min(cap)
    }

    /// Tier assigned to every enemy of `wave`.
    #[must_use]
    pub fn enemy_tier(wave: u32) -> Tier {
        Tier::clamped(wave.div_ceil(WAVES_PER_TIER))
    }

    /// Level assigned to every enemy of `wave`.
    #[must_use]
    pub fn enemy_level(&self, wave: u32) -> u32 {
        let scaled = (f64::from(wave) * self.config.enemy_level_multiplier).floor();
        if scaled >= f64::from(u32::MAX) {
            u32::MAX
        } else if scaled >= 1.0 {
            scaled as u32
        } else {
            1
        }
    }

    /// Generates the enemy roster for `wave`, drawing identifiers from `ids`.
    ///
    /// The same seed and wave always yield the same roster. A configuration
    /// that cannot produce any enemy falls back to one level-one tier-one
    /// fire creature, so a battle never starts against an empty team.
    pub fn generate_enemy_team(&self, wave: u32, ids: &mut CreatureIdAllocator) -> Vec<Creature> {
        let count = self.team_size(wave);
        if count == 0 || self.config.element_pool.is_empty() {
            tracing::warn!(
                wave,
                divisor = self.config.enemy_count_divisor,
                pool = self.config.element_pool.len(),
                "enemy generation produced no roster; using fallback enemy"
            );
            return vec![fallback_enemy(ids)];
        }

        let tier = Self::enemy_tier(wave);
        let level = self.enemy_level(wave);
        let mut rng = ChaCha8Rng::seed_from_u64(derive_wave_seed(self.global_seed, wave));

        let mut team = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let Some(&element) = self.config.element_pool.choose(&mut rng) else {
                break;
            };
            let stats = self.enemy_stats(element, tier, level);
            team.push(Creature::with_stats(
                ids.allocate(),
                element,
                tier,
                level,
                stats,
            ));
        }

        if team.is_empty() {
            tracing::warn!(wave, "enemy generation produced no roster; using fallback enemy");
            team.push(fallback_enemy(ids));
        }

        tracing::debug!(wave, count = team.len(), tier = tier.get(), level, "generated enemy team");
        team
    }

    /// Stats of a generated enemy before any battle damage.
    ///
    /// Base stats are scaled by the tier multiplier, the element multiplier and
    /// the level multiplier in that order; every result is floored and at least one.
    #[must_use]
    pub fn enemy_stats(&self, element: Element, tier: Tier, level: u32) -> Stats {
        let adjustment = self.config.element_multiplier(element);
        let level_factor = 1.0 + self.config.enemy_stat_multiplier * f64::from(level);
        let scale = |base: u32, element_factor: f64| {
            let value = f64::from(base) * tier.stat_multiplier() * element_factor * level_factor;
            floor_at_least_one(value)
        };
        Stats::new(
            scale(CREATURE_BASE_STATS.max_health, adjustment.health),
            scale(CREATURE_BASE_STATS.attack, adjustment.attack),
            scale(CREATURE_BASE_STATS.defense, adjustment.defense),
        )
    }
}

fn fallback_enemy(ids: &mut CreatureIdAllocator) -> Creature {
    Creature::create(ids.allocate(), Element::FALLBACK, Tier::MIN, 1)
}

fn floor_at_least_one(value: f64) -> u32 {
    if value.is_nan() || value < 1.0 {
        1
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value.floor() as u32
    }
}

fn derive_wave_seed(global_seed: u64, wave: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(wave.to_le_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

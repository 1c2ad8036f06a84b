#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Battle rewards, wave advancement and post-battle roster settlement.

use merge_arena_core::{Creature, CreatureId, Rewards};
use serde::Deserialize;
use thiserror::Error;

/// Tuning knobs for rewards and wave progression.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Coins granted per wave number on victory.
    pub base_coins: u64,
    /// Experience granted per wave number on victory.
    pub base_xp: u32,
    /// Fraction of the victory coins granted on defeat.
    pub defeat_coin_multiplier: f64,
    /// Fraction of the victory experience granted on defeat.
    pub defeat_xp_multiplier: f64,
    /// Highest wave the campaign advances to.
    pub max_wave: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_coins: 10,
            base_xp: 20,
            defeat_coin_multiplier: 0.5,
            defeat_xp_multiplier: 0.25,
            max_wave: 10,
        }
    }
}

impl Config {
    /// Checks that the defeat multipliers are fractions and the wave cap is positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("defeat_coin_multiplier", self.defeat_coin_multiplier),
            ("defeat_xp_multiplier", self.defeat_xp_multiplier),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidMultiplier { name, value });
            }
        }
        if self.max_wave == 0 {
            return Err(ConfigError::ZeroMaxWave);
        }
        Ok(())
    }
}

/// Reasons an economy configuration is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A defeat multiplier lies outside `[0, 1]`.
    #[error("{name} must lie within [0, 1], got {value}")]
    InvalidMultiplier {
        /// Configuration key holding the bad value.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The campaign would have no waves.
    #[error("max_wave must be at least 1")]
    ZeroMaxWave,
}

/// Result of applying a battle outcome to the deployed team.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Coins and experience granted.
    pub rewards: Rewards,
    /// Wave the player faces next.
    pub next_wave: u32,
    /// Surviving creatures after experience was granted, in roster order.
    pub survivors: Vec<Creature>,
    /// Survivors that advanced a level.
    pub leveled_up: Vec<CreatureId>,
    /// Deployed creatures that fell and leave the roster.
    pub retired: Vec<CreatureId>,
}

/// Pure system converting battle outcomes into rewards and progression.
#[derive(Clone, Debug, Default)]
pub struct Economy {
    config: Config,
}

impl Economy {
    /// Creates an economy from the provided configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configuration the economy was built from.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Rewards for finishing `wave` with the provided outcome.
    ///
    /// Victory pays the base amounts times the wave number; defeat pays the
    /// floored product of that and the defeat multipliers.
    #[must_use]
    pub fn calculate_rewards(&self, victory: bool, wave: u32) -> Rewards {
        let coins = self.config.base_coins.saturating_mul(u64::from(wave));
        let xp = self.config.base_xp.saturating_mul(wave);
        if victory {
            return Rewards { coins, xp };
        }

        Rewards {
            coins: (coins as f64 * self.config.defeat_coin_multiplier).floor() as u64,
            xp: (f64::from(xp) * self.config.defeat_xp_multiplier).floor() as u32,
        }
    }

    /// Wave faced after finishing `wave`; only victories advance, up to the cap.
    #[must_use]
    pub fn next_wave(&self, victory: bool, wave: u32) -> u32 {
        if victory {
            wave.saturating_add(1).min(self.config.max_wave)
        } else {
            wave
        }
    }

    /// Applies a battle outcome to the deployed `roster`.
    ///
    /// Creatures listed in `survivors` receive the full experience reward.
    /// Every other deployed creature fell in battle and is retired for good.
    /// Survivor identifiers that were never deployed are ignored.
    #[must_use]
    pub fn settle(
        &self,
        roster: &[Creature],
        survivors: &[CreatureId],
        victory: bool,
        wave: u32,
    ) -> Settlement {
        let rewards = self.calculate_rewards(victory, wave);
        let next_wave = self.next_wave(victory, wave);

        for id in survivors {
            if !roster.iter().any(|creature| creature.id() == *id) {
                tracing::warn!(creature = %id, "ignoring survivor that was not deployed");
            }
        }

        let mut settlement = Settlement {
            rewards,
            next_wave,
            survivors: Vec::new(),
            leveled_up: Vec::new(),
            retired: Vec::new(),
        };

        for creature in roster {
            if !survivors.contains(&creature.id()) {
                settlement.retired.push(creature.id());
                continue;
            }

            let grown = creature.add_experience(rewards.xp);
            if grown.level() > creature.level() {
                settlement.leveled_up.push(grown.id());
            }
            settlement.survivors.push(grown);
        }

        tracing::info!(
            victory,
            wave,
            next_wave,
            coins = rewards.coins,
            xp = rewards.xp,
            survivors = settlement.survivors.len(),
            retired = settlement.retired.len(),
            "battle settled"
        );
        settlement
    }
}

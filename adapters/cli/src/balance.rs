use std::{fs, path::Path};

use anyhow::{Context, Result};
use merge_arena_system_damage::Config as DamageConfig;
use merge_arena_system_economy::Config as EconomyConfig;
use merge_arena_system_wave_generation::Config as WaveConfig;
use merge_arena_world::Config as WorldConfig;
use serde::Deserialize;

/// Every tunable number of a campaign, grouped by the system that reads it.
///
/// Sections and fields omitted from the file keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct BalanceConfig {
    pub(crate) world: WorldConfig,
    pub(crate) damage: DamageConfig,
    pub(crate) wave_generation: WaveConfig,
    pub(crate) economy: EconomyConfig,
}

impl BalanceConfig {
    /// Reads and validates a TOML balance file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read balance file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load balance file {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("balance file is not valid TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.world.validate().context("invalid [world] section")?;
        self.damage.validate().context("invalid [damage] section")?;
        self.wave_generation
            .validate()
            .context("invalid [wave_generation] section")?;
        self.economy.validate().context("invalid [economy] section")?;
        Ok(())
    }
}

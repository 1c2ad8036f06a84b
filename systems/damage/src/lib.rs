#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Damage calculation with data-driven element multipliers and injectable variance.

use merge_arena_core::{CoreError, Creature, Effectiveness, ElementChart};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use thiserror::Error;

/// Tuning knobs for the damage model.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Strong/weak relationships between attacking and defending elements.
    pub chart: ElementChart,
    /// Multiplier applied when the defender is in the attacker's strong set.
    pub strong_multiplier: f64,
    /// Multiplier applied when the defender is in the attacker's weak set.
    pub weak_multiplier: f64,
    /// Lower bound of the seeded variance factor.
    pub variance_min: f64,
    /// Upper bound of the seeded variance factor.
    pub variance_max: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chart: ElementChart::default(),
            strong_multiplier: 1.5,
            weak_multiplier: 0.5,
            variance_min: 0.8,
            variance_max: 1.2,
        }
    }
}

impl Config {
    /// Checks the multipliers, the variance range and the element chart.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let strong = self.strong_multiplier;
        if !strong.is_finite() || strong <= 1.0 {
            return Err(ConfigError::InvalidMultiplier {
                name: "strong_multiplier",
                value: strong,
            });
        }
        let weak = self.weak_multiplier;
        if !weak.is_finite() || weak <= 0.0 || weak >= 1.0 {
            return Err(ConfigError::InvalidMultiplier {
                name: "weak_multiplier",
                value: weak,
            });
        }

        let (min, max) = (self.variance_min, self.variance_max);
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(ConfigError::InvalidVarianceRange { min, max });
        }

        self.chart.validate()?;
        Ok(())
    }
}

/// Reasons a damage configuration is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A multiplier is not finite or points the wrong way: strong hits must
    /// amplify damage and weak hits must reduce it.
    #[error("{name} is out of range, got {value} (strong must exceed 1, weak must lie in (0, 1))")]
    InvalidMultiplier {
        /// Configuration key holding the bad value.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The variance bounds are not a positive, ordered range.
    #[error("variance range [{min}, {max}] must be positive and ordered")]
    InvalidVarianceRange {
        /// Configured lower bound.
        min: f64,
        /// Configured upper bound.
        max: f64,
    },
    /// The element chart is inconsistent.
    #[error(transparent)]
    Chart(#[from] CoreError),
}

/// Source of the multiplicative damage variance factor.
pub trait Variance {
    /// Returns the factor applied to the element-adjusted damage.
    fn factor(&mut self) -> f64;
}

/// Variance source that never perturbs damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoVariance;

impl Variance for NoVariance {
    fn factor(&mut self) -> f64 {
        1.0
    }
}

/// Seeded variance source drawing uniformly from a closed range.
#[derive(Clone, Debug)]
pub struct SeededVariance {
    rng: ChaCha8Rng,
    min: f64,
    max: f64,
}

impl SeededVariance {
    /// Creates a variance source drawing from `[min, max]`.
    ///
    /// Bounds given in the wrong order are swapped.
    #[must_use]
    pub fn new(seed: u64, min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            min,
            max,
        }
    }

    /// Creates a variance source using the range configured in `config`.
    #[must_use]
    pub fn from_config(seed: u64, config: &Config) -> Self {
        Self::new(seed, config.variance_min, config.variance_max)
    }
}

impl Variance for SeededVariance {
    fn factor(&mut self) -> f64 {
        self.rng.gen_range(self.min..=self.max)
    }
}

impl<V: Variance + ?Sized> Variance for &mut V {
    fn factor(&mut self) -> f64 {
        (**self).factor()
    }
}

/// Resolves how much damage one creature deals to another.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DamageModel {
    config: Config,
}

impl DamageModel {
    /// Creates a damage model from a validated configuration.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration the model was built from.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Element multiplier applied when `attacker` hits `defender`.
    #[must_use]
    pub fn multiplier(&self, attacker: &Creature, defender: &Creature) -> f64 {
        match self
            .config
            .chart
            .effectiveness(attacker.element(), defender.element())
        {
            Effectiveness::Strong => self.config.strong_multiplier,
            Effectiveness::Weak => self.config.weak_multiplier,
            Effectiveness::Neutral => 1.0,
        }
    }

    /// Damage `attacker` deals to `defender`; always at least one.
    ///
    /// Half the defender's defense (floored) is subtracted from the attack with
    /// a floor of one, the element multiplier is applied and floored, then the
    /// variance factor is applied and floored.
    pub fn calculate<V>(&self, attacker: &Creature, defender: &Creature, variance: &mut V) -> u32
    where
        V: Variance + ?Sized,
    {
        let base = attacker.attack().saturating_sub(defender.defense() / 2).max(1);
        let elemental = floor_to_u32(f64::from(base) * self.multiplier(attacker, defender));
        let varied = floor_to_u32(f64::from(elemental) * variance.factor());
        varied.max(1)
    }
}

fn floor_to_u32(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value.floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merge_arena_core::{CreatureId, Element, Stats, Tier};
    use proptest::prelude::*;

    fn fighter(id: u64, element: Element, attack: u32, defense: u32) -> Creature {
        Creature::with_stats(
            CreatureId::new(id),
            element,
            Tier::MIN,
            1,
            Stats::new(50, attack, defense),
        )
    }

    struct Fixed(f64);

    impl Variance for Fixed {
        fn factor(&mut self) -> f64 {
            self.0
        }
    }

    #[test]
    fn element_multipliers_follow_chart() {
        let model = DamageModel::default();
        let fire = fighter(1, Element::Fire, 10, 5);
        let water = fighter(2, Element::Water, 10, 5);
        let metal = fighter(3, Element::Metal, 10, 5);

        assert_eq!(model.calculate(&fire, &water, &mut NoVariance), 4);
        assert_eq!(model.calculate(&water, &fire, &mut NoVariance), 12);
        assert_eq!(model.calculate(&metal, &fire, &mut NoVariance), 8);
    }

    #[test]
    fn heavy_armour_still_takes_one_damage() {
        let model = DamageModel::default();
        let weakling = fighter(1, Element::Fire, 2, 0);
        let wall = fighter(2, Element::Water, 10, 400);

        assert_eq!(model.calculate(&weakling, &wall, &mut NoVariance), 1);
        assert_eq!(model.calculate(&weakling, &wall, &mut Fixed(0.0)), 1);
    }

    #[test]
    fn variance_applies_after_element_floor() {
        let model = DamageModel::default();
        let water = fighter(1, Element::Water, 11, 0);
        let fire = fighter(2, Element::Fire, 10, 0);

        // floor(11 * 1.5) = 16, floor(16 * 1.2) = 19
        assert_eq!(model.calculate(&water, &fire, &mut Fixed(1.2)), 19);
        // floor(16 * 0.8) = 12
        assert_eq!(model.calculate(&water, &fire, &mut Fixed(0.8)), 12);
    }

    #[test]
    fn seeded_variance_is_reproducible_and_bounded() {
        let config = Config::default();
        let mut first = SeededVariance::from_config(42, &config);
        let mut second = SeededVariance::from_config(42, &config);

        for _ in 0..64 {
            let factor = first.factor();
            assert_eq!(factor, second.factor());
            assert!((0.8..=1.2).contains(&factor), "factor {factor} out of range");
        }
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let negative = Config {
            weak_multiplier: -0.5,
            ..Config::default()
        };
        assert_eq!(
            DamageModel::new(negative),
            Err(ConfigError::InvalidMultiplier {
                name: "weak_multiplier",
                value: -0.5,
            })
        );

        let flipped = Config {
            strong_multiplier: 0.2,
            weak_multiplier: 3.0,
            ..Config::default()
        };
        assert_eq!(
            flipped.validate(),
            Err(ConfigError::InvalidMultiplier {
                name: "strong_multiplier",
                value: 0.2,
            })
        );

        for weak in [0.0, 1.0, 3.0] {
            let config = Config {
                weak_multiplier: weak,
                ..Config::default()
            };
            assert!(
                DamageModel::new(config).is_err(),
                "weak multiplier {weak} should be rejected"
            );
        }

        let neutral_strong = Config {
            strong_multiplier: 1.0,
            ..Config::default()
        };
        assert!(neutral_strong.validate().is_err());

        let inverted = Config {
            variance_min: 1.3,
            variance_max: 1.1,
            ..Config::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::InvalidVarianceRange { .. })
        ));
    }

    #[test]
    fn config_reads_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            strong_multiplier = 2.0

            [[chart]]
            element = "ice"
            strong = ["nature"]
            "#,
        )
        .expect("config parses");

        assert_eq!(config.strong_multiplier, 2.0);
        assert_eq!(config.weak_multiplier, 0.5);
        let model = DamageModel::new(config).expect("valid config");
        let ice = fighter(1, Element::Ice, 10, 5);
        let nature = fighter(2, Element::Nature, 10, 5);
        assert_eq!(model.calculate(&ice, &nature, &mut NoVariance), 16);
        assert_eq!(model.calculate(&nature, &ice, &mut NoVariance), 8);
    }

    fn element_strategy() -> impl Strategy<Value = Element> {
        prop::sample::select(Element::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn damage_is_always_at_least_one(
            attacker_element in element_strategy(),
            defender_element in element_strategy(),
            attack in 0u32..500,
            defense in 0u32..2_000,
            seed in any::<u64>(),
        ) {
            let model = DamageModel::default();
            let attacker = fighter(1, attacker_element, attack, 0);
            let defender = fighter(2, defender_element, 0, defense);
            let mut variance = SeededVariance::from_config(seed, model.config());

            prop_assert!(model.calculate(&attacker, &defender, &mut NoVariance) >= 1);
            prop_assert!(model.calculate(&attacker, &defender, &mut variance) >= 1);
        }
    }
}

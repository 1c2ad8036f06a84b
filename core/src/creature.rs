//! Creature value type, tier/level stat derivation and the plain persisted record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CreatureId, Element};

/// Experience required per level before a creature advances.
pub const EXPERIENCE_PER_LEVEL: u32 = 100;

/// Base stats every creature starts from before tier and level scaling.
pub const CREATURE_BASE_STATS: Stats = Stats::new(100, 10, 5);

/// Merge-progression rank, from 1 (lowest) to 5 (terminal).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    /// Lowest tier; freshly bought creatures start here.
    pub const MIN: Tier = Tier(1);

    /// Highest tier; creatures at this tier can no longer merge.
    pub const MAX: Tier = Tier(5);

    /// Creates a tier, rejecting values outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, CoreError> {
        if value >= Self::MIN.0 && value <= Self::MAX.0 {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidTier(value))
        }
    }

    /// Creates a tier, substituting [`Tier::MIN`] for out-of-range values.
    #[must_use]
    pub fn new_or_fallback(value: u8) -> Self {
        match Self::new(value) {
            Ok(tier) => tier,
            Err(error) => {
                tracing::warn!(%error, fallback = Self::MIN.0, "substituting fallback tier");
                Self::MIN
            }
        }
    }

    /// Clamps an arbitrary integer into the supported tier range.
    #[must_use]
    pub fn clamped(value: u32) -> Self {
        let clamped = value.clamp(u32::from(Self::MIN.0), u32::from(Self::MAX.0));
        Self(clamped as u8)
    }

    /// Numeric value of the tier.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Reports whether the tier is terminal.
    #[must_use]
    pub const fn is_max(self) -> bool {
        self.0 >= Self::MAX.0
    }

    /// Tier reached by merging two creatures of this tier.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        if self.is_max() {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }

    /// Stat multiplier `1 + (tier - 1) * 0.5` applied to base stats.
    #[must_use]
    pub fn stat_multiplier(self) -> f64 {
        1.0 + f64::from(self.0 - 1) * 0.5
    }
}

impl TryFrom<u8> for Tier {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Combat stats derived from tier and level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    /// Health capacity.
    pub max_health: u32,
    /// Damage potential before defense and element modifiers.
    pub attack: u32,
    /// Mitigation; half of it (floored) is subtracted from incoming attacks.
    pub defense: u32,
}

impl Stats {
    /// Creates a stat block from explicit values.
    #[must_use]
    pub const fn new(max_health: u32, attack: u32, defense: u32) -> Self {
        Self {
            max_health,
            attack,
            defense,
        }
    }

    /// Derives creature stats for the provided tier and level.
    ///
    /// Computes `floor(base * (1 + (tier - 1) * 0.5) * (1 + (level - 1) * 0.1))`
    /// in integer arithmetic so results never drift below whole numbers.
    #[must_use]
    pub fn for_creature(tier: Tier, level: u32) -> Self {
        Self {
            max_health: scale_stat(CREATURE_BASE_STATS.max_health, tier, level),
            attack: scale_stat(CREATURE_BASE_STATS.attack, tier, level),
            defense: scale_stat(CREATURE_BASE_STATS.defense, tier, level),
        }
    }
}

fn scale_stat(base: u32, tier: Tier, level: u32) -> u32 {
    // (1 + (t-1)/2) * (1 + (l-1)/10) == (t+1)(l+9) / 20
    let tier_factor = u64::from(tier.get()) + 1;
    let level_factor = u64::from(level.max(1)) + 9;
    let scaled = u64::from(base) * tier_factor * level_factor / 20;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Display name assigned to a creature of the given element and tier.
#[must_use]
pub fn creature_name(element: Element, tier: Tier) -> &'static str {
    let names: [&'static str; 5] = match element {
        Element::Fire => ["Ember", "Blaze", "Inferno", "Pyre", "Phoenix"],
        Element::Water => ["Splash", "Tide", "Tsunami", "Maelstrom", "Leviathan"],
        Element::Earth => ["Pebble", "Boulder", "Mountain", "Tremor", "Titan"],
        Element::Air => ["Breeze", "Gust", "Cyclone", "Tempest", "Stormlord"],
        Element::Lightning => ["Spark", "Bolt", "Thunder", "Stormcaller", "Fulgur"],
        Element::Ice => ["Frost", "Shard", "Glacier", "Blizzard", "Rimeking"],
        Element::Nature => ["Sprout", "Thorn", "Grove", "Wildwood", "Verdant"],
        Element::Shadow => ["Shade", "Wraith", "Umbra", "Eclipse", "Nightfall"],
        Element::Light => ["Glimmer", "Beam", "Radiance", "Halo", "Solaris"],
        Element::Metal => ["Rivet", "Anvil", "Ironclad", "Bastion", "Colossus"],
    };
    names[usize::from(tier.get() - 1)]
}

/// Immutable value describing a single creature.
///
/// Every update returns a new value. Stats are recomputed together whenever
/// the tier or level changes, so they cannot drift from each other.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CreatureRecord", into = "CreatureRecord")]
pub struct Creature {
    id: CreatureId,
    name: String,
    element: Element,
    tier: Tier,
    level: u32,
    experience: u32,
    health: u32,
    stats: Stats,
}

impl Creature {
    /// Creates a creature at full health with stats derived from tier and level.
    #[must_use]
    pub fn create(id: CreatureId, element: Element, tier: Tier, level: u32) -> Self {
        let level = level.max(1);
        let stats = Stats::for_creature(tier, level);
        Self {
            id,
            name: creature_name(element, tier).to_owned(),
            element,
            tier,
            level,
            experience: 0,
            health: stats.max_health,
            stats,
        }
    }

    /// Creates a creature at full health with explicitly supplied stats.
    ///
    /// Used for generated enemies whose stats follow the wave scaling table.
    /// A zero health capacity is raised to one.
    #[must_use]
    pub fn with_stats(
        id: CreatureId,
        element: Element,
        tier: Tier,
        level: u32,
        stats: Stats,
    ) -> Self {
        let stats = Stats {
            max_health: stats.max_health.max(1),
            ..stats
        };
        Self {
            id,
            name: creature_name(element, tier).to_owned(),
            element,
            tier,
            level: level.max(1),
            experience: 0,
            health: stats.max_health,
            stats,
        }
    }

    /// Returns a copy carrying a different display name.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Unique identifier of the creature.
    #[must_use]
    pub const fn id(&self) -> CreatureId {
        self.id
    }

    /// Display name used in battle logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element of the creature.
    #[must_use]
    pub const fn element(&self) -> Element {
        self.element
    }

    /// Merge tier of the creature.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    /// Current level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Experience accumulated toward the next level.
    #[must_use]
    pub const fn experience(&self) -> u32 {
        self.experience
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Health capacity.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.stats.max_health
    }

    /// Attack stat.
    #[must_use]
    pub const fn attack(&self) -> u32 {
        self.stats.attack
    }

    /// Defense stat.
    #[must_use]
    pub const fn defense(&self) -> u32 {
        self.stats.defense
    }

    /// Complete stat block.
    #[must_use]
    pub const fn stats(&self) -> Stats {
        self.stats
    }

    /// Experience required to reach the next level (`100 * level`).
    #[must_use]
    pub const fn experience_to_next_level(&self) -> u32 {
        EXPERIENCE_PER_LEVEL.saturating_mul(self.level)
    }

    /// Reports whether the creature has no health left.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Returns a copy that gained `amount` experience.
    ///
    /// Reaching the threshold raises the level by one, keeps the remainder as
    /// experience, and recomputes every stat for the new level. Current health
    /// is carried over (clamped to the new capacity); refilling it is the job of
    /// [`Creature::reset_health`].
    #[must_use]
    pub fn add_experience(&self, amount: u32) -> Self {
        let threshold = self.experience_to_next_level();
        let total = self.experience.saturating_add(amount);
        if total < threshold {
            return Self {
                experience: total,
                ..self.clone()
            };
        }

        let level = self.level.saturating_add(1);
        let stats = Stats::for_creature(self.tier, level);
        Self {
            level,
            experience: total - threshold,
            health: self.health.min(stats.max_health),
            stats,
            ..self.clone()
        }
    }

    /// Returns a copy whose stats are recomputed from its tier and level.
    ///
    /// Current health is clamped to the recomputed capacity. Roster creatures
    /// loaded from a save go through this so persisted stats cannot drift.
    #[must_use]
    pub fn with_derived_stats(&self) -> Self {
        let stats = Stats::for_creature(self.tier, self.level);
        Self {
            health: self.health.min(stats.max_health),
            stats,
            ..self.clone()
        }
    }

    /// Returns a copy restored to full health.
    #[must_use]
    pub fn reset_health(&self) -> Self {
        Self {
            health: self.stats.max_health,
            ..self.clone()
        }
    }

    /// Returns a copy with `amount` health removed, never dropping below zero.
    #[must_use]
    pub fn take_damage(&self, amount: u32) -> Self {
        Self {
            health: self.health.saturating_sub(amount),
            ..self.clone()
        }
    }
}

/// Plain-data representation of a creature used for persistence.
///
/// Every field is a primitive so that saves stay readable and a creature can
/// be rebuilt without hidden runtime state. Converting a record into a
/// [`Creature`] is lossy only for corrupt input: unknown elements and tiers
/// fall back with a warning, and health is clamped into `[0, max_health]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRecord {
    /// Numeric identifier.
    pub id: u64,
    /// Display name; empty names are regenerated from element and tier.
    #[serde(default)]
    pub name: String,
    /// Lowercase element name.
    pub element: String,
    /// Tier value, expected in `1..=5`.
    pub tier: u8,
    /// Level, expected to be at least one.
    pub level: u32,
    /// Experience toward the next level.
    #[serde(default)]
    pub experience: u32,
    /// Remaining health.
    pub health: u32,
    /// Health capacity.
    pub max_health: u32,
    /// Attack stat.
    pub attack: u32,
    /// Defense stat.
    pub defense: u32,
}

impl From<Creature> for CreatureRecord {
    fn from(creature: Creature) -> Self {
        Self {
            id: creature.id.get(),
            name: creature.name,
            element: creature.element.as_str().to_owned(),
            tier: creature.tier.get(),
            level: creature.level,
            experience: creature.experience,
            health: creature.health,
            max_health: creature.stats.max_health,
            attack: creature.stats.attack,
            defense: creature.stats.defense,
        }
    }
}

impl From<CreatureRecord> for Creature {
    fn from(record: CreatureRecord) -> Self {
        let element = Element::parse_or_fallback(&record.element);
        let tier = Tier::new_or_fallback(record.tier);
        let name = if record.name.trim().is_empty() {
            creature_name(element, tier).to_owned()
        } else {
            record.name
        };
        let stats = Stats::new(record.max_health.max(1), record.attack, record.defense);
        Self {
            id: CreatureId::new(record.id),
            name,
            element,
            tier,
            level: record.level.max(1),
            experience: record.experience,
            health: record.health.min(stats.max_health),
            stats,
        }
    }
}

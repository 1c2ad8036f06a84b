//! Element typing and the data-driven strong/weak relationship table.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Typing axis that drives the strong/weak damage multiplier table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    /// Fire creatures burn through earth.
    Fire,
    /// Water creatures douse fire.
    Water,
    /// Earth creatures soak up water.
    Earth,
    /// Air creatures erode earth.
    Air,
    /// Lightning element.
    Lightning,
    /// Ice element.
    Ice,
    /// Nature element.
    Nature,
    /// Shadow element.
    Shadow,
    /// Light element.
    Light,
    /// Metal element.
    Metal,
}

impl Element {
    /// Every supported element in declaration order.
    pub const ALL: [Element; 10] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Air,
        Element::Lightning,
        Element::Ice,
        Element::Nature,
        Element::Shadow,
        Element::Light,
        Element::Metal,
    ];

    /// The four classic elements used by the default enemy pool.
    pub const CLASSIC: [Element; 4] = [Element::Fire, Element::Water, Element::Earth, Element::Air];

    /// Element substituted when a persisted name cannot be recognised.
    pub const FALLBACK: Element = Element::Fire;

    /// Lowercase name used in persisted records and configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Earth => "earth",
            Self::Air => "air",
            Self::Lightning => "lightning",
            Self::Ice => "ice",
            Self::Nature => "nature",
            Self::Shadow => "shadow",
            Self::Light => "light",
            Self::Metal => "metal",
        }
    }

    /// Parses an element name, substituting [`Element::FALLBACK`] for unknown input.
    ///
    /// The substitution is reported through `tracing` so that corrupted saves
    /// remain loadable without hiding the problem.
    #[must_use]
    pub fn parse_or_fallback(name: &str) -> Self {
        match name.parse() {
            Ok(element) => element,
            Err(error) => {
                tracing::warn!(%error, fallback = %Self::FALLBACK, "substituting fallback element");
                Self::FALLBACK
            }
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Element {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|element| element.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownElement(value.to_owned()))
    }
}

/// Relationship between an attacking and a defending element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effectiveness {
    /// The defender's element is in the attacker's strong set.
    Strong,
    /// The defender's element is in the attacker's weak set.
    Weak,
    /// No relationship is configured between the two elements.
    Neutral,
}

/// Strong and weak sets configured for a single attacking element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affinity {
    /// Attacking element described by this entry.
    pub element: Element,
    /// Elements this element deals boosted damage against.
    #[serde(default)]
    pub strong: Vec<Element>,
    /// Elements this element deals reduced damage against.
    #[serde(default)]
    pub weak: Vec<Element>,
}

impl Affinity {
    /// Creates a new affinity entry for the provided attacking element.
    #[must_use]
    pub fn new(element: Element, strong: Vec<Element>, weak: Vec<Element>) -> Self {
        Self {
            element,
            strong,
            weak,
        }
    }
}

/// Data-driven element relationship table.
///
/// Attacking elements without an entry are neutral against everything, so new
/// elements only need a table row, never new code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementChart {
    entries: Vec<Affinity>,
}

impl ElementChart {
    /// Creates a chart from explicit affinity entries.
    #[must_use]
    pub fn new(entries: Vec<Affinity>) -> Self {
        Self { entries }
    }

    /// Creates a chart in which every pairing is neutral.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Affinity entries in configuration order.
    #[must_use]
    pub fn entries(&self) -> &[Affinity] {
        &self.entries
    }

    /// Resolves how effective `attacker` is against `defender`.
    ///
    /// A strong listing takes precedence over a weak listing for the same pair.
    #[must_use]
    pub fn effectiveness(&self, attacker: Element, defender: Element) -> Effectiveness {
        let Some(affinity) = self.entries.iter().find(|entry| entry.element == attacker) else {
            return Effectiveness::Neutral;
        };

        if affinity.strong.contains(&defender) {
            Effectiveness::Strong
        } else if affinity.weak.contains(&defender) {
            Effectiveness::Weak
        } else {
            Effectiveness::Neutral
        }
    }

    /// Checks that no attacking element is listed twice and no pair is both strong and weak.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (index, entry) in self.entries.iter().enumerate() {
            if self.entries[..index]
                .iter()
                .any(|earlier| earlier.element == entry.element)
            {
                return Err(CoreError::DuplicateAffinity(entry.element));
            }

            if let Some(conflict) = entry.strong.iter().find(|element| entry.weak.contains(element))
            {
                return Err(CoreError::ConflictingAffinity {
                    attacker: entry.element,
                    defender: *conflict,
                });
            }
        }
        Ok(())
    }
}

impl Default for ElementChart {
    fn default() -> Self {
        Self::new(vec![
            Affinity::new(Element::Fire, vec![Element::Earth], vec![Element::Water]),
            Affinity::new(Element::Water, vec![Element::Fire], vec![Element::Earth]),
            Affinity::new(Element::Earth, vec![Element::Water], vec![Element::Air]),
            Affinity::new(Element::Air, vec![Element::Earth], vec![Element::Fire]),
        ])
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Merge Arena engine.
//!
//! This crate defines the creature model and the message surface that
//! connects adapters, the authoritative roster world, and pure systems.
//! Adapters submit [`Command`] values describing desired roster mutations, the
//! world executes them via its `apply` entry point, and reports [`Event`]
//! values describing what changed or why a request was rejected. The merge,
//! damage, battle, wave generation and economy systems operate on
//! [`Creature`] values and never reach into shared mutable state.

mod creature;
mod element;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use creature::{
    creature_name, Creature, CreatureRecord, Stats, Tier, CREATURE_BASE_STATS,
    EXPERIENCE_PER_LEVEL,
};
pub use element::{Affinity, Effectiveness, Element, ElementChart};

/// Errors raised by strict constructors and table validation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A tier outside `1..=5` was requested.
    #[error("tier {0} is outside the supported range 1..=5")]
    InvalidTier(u8),
    /// An element name did not match any supported element.
    #[error("unknown element `{0}`")]
    UnknownElement(String),
    /// The element chart lists the same attacking element more than once.
    #[error("element chart lists `{0}` more than once")]
    DuplicateAffinity(Element),
    /// The element chart marks a pairing as both strong and weak.
    #[error("element chart marks {attacker} as both strong and weak against {defender}")]
    ConflictingAffinity {
        /// Attacking element of the conflicting row.
        attacker: Element,
        /// Defending element listed in both sets.
        defender: Element,
    },
}

/// Unique identifier assigned to a creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(u64);

impl CreatureId {
    /// Creates a new creature identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic source of fresh creature identifiers.
///
/// Allocation is deterministic so that replaying the same command sequence
/// yields the same identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureIdAllocator {
    next: u64,
}

impl CreatureIdAllocator {
    /// Creates an allocator whose first identifier is `first`.
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Returns a fresh identifier and advances the allocator.
    pub fn allocate(&mut self) -> CreatureId {
        let id = CreatureId::new(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// Identifier that the next call to [`CreatureIdAllocator::allocate`] returns.
    #[must_use]
    pub const fn peek(&self) -> CreatureId {
        CreatureId::new(self.next)
    }

    /// Ensures future identifiers never collide with `id`.
    pub fn reserve(&mut self, id: CreatureId) {
        if id.get() >= self.next {
            self.next = id.get().saturating_add(1);
        }
    }
}

impl Default for CreatureIdAllocator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

/// Unique identifier assigned to a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(u32);

impl CellId {
    /// Creates a new cell identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Severity attached to rejection reasons so presentation layers can pick a banner style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; the request was harmless but did nothing.
    Info,
    /// The player asked for something the rules forbid right now.
    Warning,
    /// The request referenced state that does not exist.
    Error,
    /// The roster is in a state the engine cannot recover from on its own.
    Critical,
}

/// Coins and experience granted after a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rewards {
    /// Coins added to the player's balance.
    pub coins: u64,
    /// Experience granted to every surviving creature.
    pub xp: u32,
}

/// Commands that express all permissible roster mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests a new tier-one creature placed in the first empty cell.
    BuyCreature {
        /// Element of the creature to purchase.
        element: Element,
    },
    /// Requests that a creature move to the provided cell.
    ///
    /// Moving onto a creature it can merge with merges the two; moving onto
    /// any other occupant swaps them. Moving onto its own cell does nothing.
    MoveCreature {
        /// Creature being moved.
        creature: CreatureId,
        /// Destination cell.
        cell: CellId,
    },
    /// Requests that two creatures merge into a higher-tier creature.
    MergeCreatures {
        /// Creature dragged onto the target.
        source: CreatureId,
        /// Creature whose cell receives the merged result.
        target: CreatureId,
    },
    /// Requests that every creature on the grid be deployed into battle.
    DeployTeam,
    /// Reports the outcome of the deployed team's battle.
    SettleBattle {
        /// Whether the player team won.
        victory: bool,
        /// Deployed creatures still standing when the battle ended.
        survivors: Vec<CreatureId>,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a creature was bought and placed.
    CreaturePurchased {
        /// Identifier assigned to the new creature.
        creature: CreatureId,
        /// Element of the new creature.
        element: Element,
        /// Cell that received the creature.
        cell: CellId,
        /// Coins spent on the purchase.
        cost: u64,
    },
    /// Reports that a purchase request was rejected.
    PurchaseRejected {
        /// Element requested for purchase.
        element: Element,
        /// Specific reason the purchase failed.
        reason: PurchaseError,
    },
    /// Confirms that a creature moved into an empty cell.
    CreatureMoved {
        /// Creature that moved.
        creature: CreatureId,
        /// Cell the creature occupied before the move.
        from: CellId,
        /// Cell the creature occupies after the move.
        to: CellId,
    },
    /// Confirms that two creatures exchanged cells.
    CreaturesSwapped {
        /// Creature that initiated the move.
        moved: CreatureId,
        /// Creature that previously occupied the destination.
        displaced: CreatureId,
        /// Cell the initiating creature now occupies.
        moved_to: CellId,
        /// Cell the displaced creature now occupies.
        displaced_to: CellId,
    },
    /// Reports that a move request was rejected.
    MoveRejected {
        /// Creature named in the request.
        creature: CreatureId,
        /// Destination named in the request.
        cell: CellId,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Confirms that two creatures merged.
    CreaturesMerged {
        /// Creatures consumed by the merge.
        consumed: [CreatureId; 2],
        /// Creature produced by the merge.
        created: CreatureId,
        /// Tier of the produced creature.
        tier: Tier,
        /// Cell holding the produced creature.
        cell: CellId,
    },
    /// Reports that a merge request was rejected.
    MergeRejected {
        /// Creature dragged onto the target.
        source: CreatureId,
        /// Creature named as merge target.
        target: CreatureId,
        /// Specific reason the merge failed.
        reason: MergeRejection,
    },
    /// Confirms that the grid occupants were deployed, in grid order, at full health.
    TeamDeployed {
        /// Deployed creatures in pairing order.
        team: Vec<CreatureId>,
    },
    /// Reports that a deployment request was rejected.
    DeployRejected {
        /// Specific reason the deployment failed.
        reason: DeployError,
    },
    /// Reports that a surviving creature advanced a level during settlement.
    CreatureLeveledUp {
        /// Creature that advanced.
        creature: CreatureId,
        /// Level reached.
        level: u32,
    },
    /// Reports that a deployed creature fell in battle and left the roster for good.
    CreatureRetired {
        /// Creature removed from the roster.
        creature: CreatureId,
    },
    /// Confirms that a battle outcome was applied to the roster.
    BattleSettled {
        /// Whether the player team won.
        victory: bool,
        /// Coins and experience granted.
        rewards: Rewards,
        /// Wave the player faces next.
        wave: u32,
    },
    /// Reports that a settlement request was rejected.
    SettleRejected {
        /// Specific reason the settlement failed.
        reason: SettleError,
    },
}

/// Reasons two creatures are not merge-eligible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum MergeError {
    /// The creatures have different elements.
    #[error("creatures must share an element to merge")]
    ElementMismatch,
    /// The creatures have different tiers.
    #[error("creatures must share a tier to merge")]
    TierMismatch,
    /// The creatures are already at the highest tier.
    #[error("creatures at the highest tier cannot merge")]
    MaxTier,
    /// Both sides name the same creature.
    #[error("a creature cannot merge with itself")]
    SameCreature,
}

impl MergeError {
    /// Severity presentation layers should use when surfacing the reason.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::ElementMismatch | Self::TierMismatch | Self::MaxTier => Severity::Warning,
            Self::SameCreature => Severity::Info,
        }
    }
}

/// Reasons a merge request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum MergeRejection {
    /// A battle is in progress, so the roster is locked.
    #[error("the roster is locked while a battle is in progress")]
    BattleInProgress,
    /// No creature with the provided identifier exists.
    #[error("creature {0} does not exist")]
    UnknownCreature(CreatureId),
    /// The creatures exist but the merge rules forbid combining them.
    #[error(transparent)]
    Ineligible(#[from] MergeError),
}

impl MergeRejection {
    /// Severity presentation layers should use when surfacing the reason.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::BattleInProgress => Severity::Warning,
            Self::UnknownCreature(_) => Severity::Error,
            Self::Ineligible(reason) => reason.severity(),
        }
    }
}

/// Reasons a purchase request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PurchaseError {
    /// A battle is in progress, so the roster is locked.
    #[error("the roster is locked while a battle is in progress")]
    BattleInProgress,
    /// The balance does not cover the price.
    #[error("not enough coins: {available} available, {required} required")]
    InsufficientCoins {
        /// Coins required for the purchase.
        required: u64,
        /// Coins currently held.
        available: u64,
    },
    /// Every grid cell is occupied.
    #[error("no space left on the grid")]
    GridFull,
}

impl PurchaseError {
    /// Severity presentation layers should use when surfacing the reason.
    #[must_use]
    pub const fn severity(self) -> Severity {
        Severity::Warning
    }
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum MoveError {
    /// A battle is in progress, so the roster is locked.
    #[error("the roster is locked while a battle is in progress")]
    BattleInProgress,
    /// No creature with the provided identifier exists.
    #[error("creature {0} does not exist")]
    UnknownCreature(CreatureId),
    /// No cell with the provided identifier exists.
    #[error("cell {} does not exist", .0.get())]
    UnknownCell(CellId),
}

impl MoveError {
    /// Severity presentation layers should use when surfacing the reason.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::BattleInProgress => Severity::Warning,
            Self::UnknownCreature(_) | Self::UnknownCell(_) => Severity::Error,
        }
    }
}

/// Reasons a deployment request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum DeployError {
    /// A team is already deployed.
    #[error("a battle is already in progress")]
    BattleInProgress,
    /// The grid holds no creatures.
    #[error("no creatures are available to deploy")]
    EmptyTeam,
    /// The grid holds no creatures and the coin balance cannot buy one.
    #[error("no creatures are available and {available} coins cannot buy one costing {cost}")]
    Bankrupt {
        /// Price of a tier-one creature.
        cost: u64,
        /// Coins held by the player.
        available: u64,
    },
}

impl DeployError {
    /// Severity presentation layers should use when surfacing the reason.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::BattleInProgress | Self::EmptyTeam => Severity::Warning,
            Self::Bankrupt { .. } => Severity::Critical,
        }
    }
}

/// Reasons a settlement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum SettleError {
    /// No team is currently deployed.
    #[error("no battle is in progress")]
    NoBattle,
}

impl SettleError {
    /// Severity presentation layers should use when surfacing the reason.
    #[must_use]
    pub const fn severity(self) -> Severity {
        Severity::Error
    }
}

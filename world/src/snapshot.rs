//! Plain-data persistence format for the roster world.

use merge_arena_core::CreatureRecord;
use serde::{Deserialize, Serialize};

/// Serializable copy of everything a roster world needs to resume.
///
/// A pending deployment is not part of the snapshot; loading always resumes
/// with the roster unlocked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Occupant identifier for every grid cell, in cell order.
    pub cells: Vec<Option<u64>>,
    /// Every creature on the roster.
    pub creatures: Vec<CreatureRecord>,
    /// Coin balance.
    pub coins: u64,
    /// Wave the player faces next.
    pub wave: u32,
    /// Identifier the next allocated creature receives.
    pub next_creature_id: u64,
}

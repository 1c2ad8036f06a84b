#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure merge rules: eligibility checks and construction of merged creatures.

use merge_arena_core::{Command, Creature, CreatureId, MergeError};

/// Reports why `a` and `b` cannot merge, or `Ok(())` when they can.
///
/// Checks run in a fixed order so the reported reason is stable: identity,
/// element, tier, then the tier ceiling.
pub fn merge_check(a: &Creature, b: &Creature) -> Result<(), MergeError> {
    if a.id() == b.id() {
        return Err(MergeError::SameCreature);
    }
    if a.element() != b.element() {
        return Err(MergeError::ElementMismatch);
    }
    if a.tier() != b.tier() {
        return Err(MergeError::TierMismatch);
    }
    if a.tier().is_max() {
        return Err(MergeError::MaxTier);
    }
    Ok(())
}

/// Reports whether two creatures may merge.
#[must_use]
pub fn can_merge(a: &Creature, b: &Creature) -> bool {
    merge_check(a, b).is_ok()
}

/// Merges two creatures into a level-one creature of the next tier.
///
/// The result carries `id`, the shared element, and the floored mean of both
/// inputs' experience, applied through [`Creature::add_experience`]. Returns
/// `None` when the pair is not eligible.
#[must_use]
pub fn merge(a: &Creature, b: &Creature, id: CreatureId) -> Option<Creature> {
    if !can_merge(a, b) {
        return None;
    }
    let tier = a.tier().next()?;
    let pooled = (u64::from(a.experience()) + u64::from(b.experience())) / 2;
    let inherited = u32::try_from(pooled).unwrap_or(u32::MAX);
    Some(Creature::create(id, a.element(), tier, 1).add_experience(inherited))
}

/// Pure system that proposes merges for every eligible pair in a roster.
#[derive(Debug, Default)]
pub struct MergePlanner {
    claimed: Vec<CreatureId>,
}

impl MergePlanner {
    /// Creates a planner with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::MergeCreatures` for disjoint eligible pairs.
    ///
    /// Creatures are considered in roster order; each one is paired with the
    /// first later creature it can merge with. The earlier creature becomes the
    /// merge target so results stay in the earlier cell.
    pub fn handle(&mut self, roster: &[Creature], out: &mut Vec<Command>) {
        self.claimed.clear();

        for (index, target) in roster.iter().enumerate() {
            if self.claimed.contains(&target.id()) {
                continue;
            }

            let partner = roster[index + 1..].iter().find(|candidate| {
                !self.claimed.contains(&candidate.id()) && can_merge(target, candidate)
            });

            if let Some(source) = partner {
                self.claimed.push(target.id());
                self.claimed.push(source.id());
                out.push(Command::MergeCreatures {
                    source: source.id(),
                    target: target.id(),
                });
            }
        }
    }
}

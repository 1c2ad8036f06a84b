#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-based battle engine pairing player and enemy creatures by team index.
//!
//! A [`Battle`] owns deep copies of both teams. Each call to
//! [`Battle::resolve_turn`] runs a player sub-turn followed by an enemy
//! sub-turn, removes defeated creatures, and moves the battle into its
//! terminal state once a side is emptied. Damage comes from the injected
//! [`DamageModel`] and [`Variance`] source, so a battle replays exactly for the
//! same inputs.

use std::collections::HashSet;

use merge_arena_core::{Creature, CreatureId};
use merge_arena_system_damage::{DamageModel, Variance};
use serde::{Deserialize, Serialize};

/// Final result of a battle from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Every enemy was defeated.
    Victory,
    /// Every player creature was defeated, or the turn cap was reached.
    Defeat,
}

/// Lifecycle state of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BattleState {
    /// Both teams still have creatures standing.
    Active,
    /// The battle is over; no further turns resolve.
    Ended(Outcome),
}

/// Single attack performed during a sub-turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResult {
    /// Attacking creature.
    pub attacker: CreatureId,
    /// Display name of the attacker.
    pub attacker_name: String,
    /// Creature that was hit.
    pub defender: CreatureId,
    /// Display name of the defender.
    pub defender_name: String,
    /// Damage dealt.
    pub damage: u32,
    /// Whether the hit reduced the defender to zero health.
    pub defeated: bool,
}

/// Everything that happened while resolving one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Attacks made by the player team, in pairing order.
    pub player_attacks: Vec<AttackResult>,
    /// Attacks made by the surviving enemies, in pairing order.
    pub enemy_attacks: Vec<AttackResult>,
    /// Player creatures defeated during the turn.
    pub defeated_players: Vec<CreatureId>,
    /// Enemy creatures defeated during the turn.
    pub defeated_enemies: Vec<CreatureId>,
    /// Outcome reached at the end of the turn, if any.
    pub outcome: Option<Outcome>,
}

impl TurnReport {
    /// Reports whether no attacks were made.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.player_attacks.is_empty() && self.enemy_attacks.is_empty()
    }
}

/// Battle between a player team and an enemy team.
#[derive(Clone, Debug)]
pub struct Battle {
    player_team: Vec<Creature>,
    enemy_team: Vec<Creature>,
    turn: u32,
    log: Vec<String>,
    state: BattleState,
    defeated_players: Vec<CreatureId>,
}

impl Battle {
    /// Starts a battle from copies of both teams.
    ///
    /// Creatures entering with zero health are restored to full health and
    /// repeated identifiers within a team are dropped. An empty player team
    /// ends the battle immediately in defeat; otherwise an empty enemy team
    /// ends it immediately in victory.
    #[must_use]
    pub fn new(player_team: &[Creature], enemy_team: &[Creature]) -> Self {
        let player_team = prepare_team(player_team, "player");
        let enemy_team = prepare_team(enemy_team, "enemy");

        let state = if player_team.is_empty() {
            BattleState::Ended(Outcome::Defeat)
        } else if enemy_team.is_empty() {
            BattleState::Ended(Outcome::Victory)
        } else {
            BattleState::Active
        };

        if let BattleState::Ended(outcome) = state {
            tracing::info!(?outcome, "battle ended before the first turn");
        }

        Self {
            player_team,
            enemy_team,
            turn: 0,
            log: Vec::new(),
            state,
            defeated_players: Vec::new(),
        }
    }

    /// Resolves one player sub-turn followed by one enemy sub-turn.
    ///
    /// Enemies defeated by the player sub-turn are removed before the enemy
    /// sub-turn, so the remaining enemies attack the player team by their new
    /// positions. Resolving a turn on an ended battle returns an empty report.
    pub fn resolve_turn<V>(&mut self, model: &DamageModel, variance: &mut V) -> TurnReport
    where
        V: Variance + ?Sized,
    {
        if self.is_over() {
            return TurnReport::default();
        }

        let mut report = TurnReport::default();

        let (player_attacks, defeated_enemies) = strike(
            &self.player_team,
            &mut self.enemy_team,
            model,
            variance,
            &mut self.log,
        );
        report.player_attacks = player_attacks;
        report.defeated_enemies = defeated_enemies;

        if self.enemy_team.is_empty() {
            self.finish(Outcome::Victory);
            report.outcome = Some(Outcome::Victory);
            return report;
        }

        let (enemy_attacks, defeated_players) = strike(
            &self.enemy_team,
            &mut self.player_team,
            model,
            variance,
            &mut self.log,
        );
        report.enemy_attacks = enemy_attacks;
        self.defeated_players.extend_from_slice(&defeated_players);
        report.defeated_players = defeated_players;

        if self.player_team.is_empty() {
            self.finish(Outcome::Defeat);
            report.outcome = Some(Outcome::Defeat);
            return report;
        }

        self.turn += 1;
        tracing::debug!(
            turn = self.turn,
            players = self.player_team.len(),
            enemies = self.enemy_team.len(),
            "turn resolved"
        );
        report
    }

    /// Resolves turns until the battle ends, giving up after `max_turns`.
    ///
    /// A battle still active after `max_turns` turns ends in defeat.
    pub fn run_to_end<V>(&mut self, model: &DamageModel, variance: &mut V, max_turns: u32) -> Outcome
    where
        V: Variance + ?Sized,
    {
        let mut resolved = 0;
        while let BattleState::Active = self.state {
            if resolved >= max_turns {
                tracing::warn!(max_turns, "battle hit the turn cap; scoring it as a defeat");
                self.finish(Outcome::Defeat);
                break;
            }
            let _ = self.resolve_turn(model, variance);
            resolved += 1;
        }
        self.outcome().unwrap_or(Outcome::Defeat)
    }

    fn finish(&mut self, outcome: Outcome) {
        self.state = BattleState::Ended(outcome);
        tracing::info!(
            ?outcome,
            turn = self.turn,
            survivors = self.player_team.len(),
            "battle ended"
        );
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> BattleState {
        self.state
    }

    /// Reports whether the battle has ended.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self.state, BattleState::Ended(_))
    }

    /// Reports whether the battle ended in a player victory.
    #[must_use]
    pub const fn is_victory(&self) -> bool {
        matches!(self.state, BattleState::Ended(Outcome::Victory))
    }

    /// Outcome of the battle once it has ended.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        match self.state {
            BattleState::Active => None,
            BattleState::Ended(outcome) => Some(outcome),
        }
    }

    /// Number of turns that completed with both teams still standing.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Human-readable log lines in the order they occurred.
    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Player creatures still standing, in pairing order.
    #[must_use]
    pub fn player_team(&self) -> &[Creature] {
        &self.player_team
    }

    /// Enemy creatures still standing, in pairing order.
    #[must_use]
    pub fn enemy_team(&self) -> &[Creature] {
        &self.enemy_team
    }

    /// Identifiers of player creatures still standing.
    #[must_use]
    pub fn survivor_ids(&self) -> Vec<CreatureId> {
        self.player_team.iter().map(Creature::id).collect()
    }

    /// Identifiers of player creatures defeated so far, in defeat order.
    #[must_use]
    pub fn defeated_player_ids(&self) -> &[CreatureId] {
        &self.defeated_players
    }
}

fn prepare_team(team: &[Creature], side: &'static str) -> Vec<Creature> {
    let mut seen = HashSet::with_capacity(team.len());
    let mut prepared = Vec::with_capacity(team.len());

    for creature in team {
        if !seen.insert(creature.id()) {
            tracing::warn!(side, creature = %creature.id(), "dropping duplicate creature");
            continue;
        }
        if creature.is_defeated() {
            prepared.push(creature.reset_health());
        } else {
            prepared.push(creature.clone());
        }
    }

    prepared
}

/// Pairs `attackers[i]` with `defenders[i]`, then removes defeated defenders.
fn strike<V>(
    attackers: &[Creature],
    defenders: &mut Vec<Creature>,
    model: &DamageModel,
    variance: &mut V,
    log: &mut Vec<String>,
) -> (Vec<AttackResult>, Vec<CreatureId>)
where
    V: Variance + ?Sized,
{
    let pairs = attackers.len().min(defenders.len());
    let mut attacks = Vec::with_capacity(pairs);

    for (attacker, slot) in attackers.iter().zip(defenders.iter_mut()) {
        let damage = model.calculate(attacker, slot, variance);
        *slot = slot.take_damage(damage);
        log.push(format!(
            "{} attacks {} for {} damage!",
            attacker.name(),
            slot.name(),
            damage
        ));
        attacks.push(AttackResult {
            attacker: attacker.id(),
            attacker_name: attacker.name().to_owned(),
            defender: slot.id(),
            defender_name: slot.name().to_owned(),
            damage,
            defeated: slot.is_defeated(),
        });
    }

    let mut defeated = Vec::new();
    for attack in attacks.iter().filter(|attack| attack.defeated) {
        log.push(format!("{} is defeated!", attack.defender_name));
        defeated.push(attack.defender);
    }
    defenders.retain(|creature| !creature.is_defeated());

    (attacks, defeated)
}

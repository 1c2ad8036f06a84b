use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use merge_arena_core::{Creature, CreatureId, CreatureIdAllocator, Element, Tier};
use merge_arena_system_battle::{Battle, Outcome};
use merge_arena_system_damage::{DamageModel, SeededVariance};
use merge_arena_system_wave_generation::{Config, WaveGeneration};

#[test]
fn deterministic_replay_produces_identical_battles() {
    let first = replay(0x5eed, 6);
    let second = replay(0x5eed, 6);

    assert_eq!(first, second, "replay diverged between runs");
    assert!(!first.log.is_empty());
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn starter_team_beats_wave_one_and_falls_to_wave_fifteen() {
    let early = replay(42, 1);
    assert_eq!(early.outcome, Outcome::Victory);
    assert!(!early.survivors.is_empty());

    let late = replay(42, 15);
    assert_eq!(late.outcome, Outcome::Defeat);
    assert!(late.survivors.is_empty());
    assert!(late.turns < 200, "wave 15 hit the turn cap");
}

fn replay(seed: u64, wave: u32) -> ReplayOutcome {
    let mut ids = CreatureIdAllocator::starting_at(100);
    let enemies = WaveGeneration::new(Config::default(), seed).generate_enemy_team(wave, &mut ids);
    let players = starter_team();
    let model = DamageModel::default();
    let mut variance = SeededVariance::from_config(seed, model.config());

    let mut battle = Battle::new(&players, &enemies);
    let outcome = battle.run_to_end(&model, &mut variance, 200);

    ReplayOutcome {
        outcome,
        turns: battle.turn(),
        survivors: battle
            .player_team()
            .iter()
            .map(|creature| (creature.id(), creature.health()))
            .collect(),
        log: battle.log().to_vec(),
    }
}

fn starter_team() -> Vec<Creature> {
    [
        (1, Element::Fire, 2),
        (2, Element::Water, 2),
        (3, Element::Earth, 3),
    ]
    .into_iter()
    .map(|(id, element, tier)| {
        Creature::create(
            CreatureId::new(id),
            element,
            Tier::new(tier).expect("tier"),
            2,
        )
    })
    .collect()
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    outcome: Outcome,
    turns: u32,
    survivors: Vec<(CreatureId, u32)>,
    log: Vec<String>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

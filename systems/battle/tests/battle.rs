use merge_arena_core::{Creature, CreatureId, Element, Stats, Tier};
use merge_arena_system_battle::{Battle, BattleState, Outcome};
use merge_arena_system_damage::{DamageModel, NoVariance, SeededVariance};
use proptest::prelude::*;

fn creature(id: u64, element: Element, health: u32, attack: u32, defense: u32) -> Creature {
    Creature::with_stats(
        CreatureId::new(id),
        element,
        Tier::MIN,
        1,
        Stats::new(health, attack, defense),
    )
}

#[test]
fn fire_against_water_first_turn() {
    let player = [creature(1, Element::Fire, 50, 10, 5)];
    let enemy = [creature(2, Element::Water, 50, 10, 5)];
    let mut battle = Battle::new(&player, &enemy);

    let report = battle.resolve_turn(&DamageModel::default(), &mut NoVariance);

    assert_eq!(report.player_attacks.len(), 1);
    assert_eq!(report.player_attacks[0].damage, 4);
    assert_eq!(report.enemy_attacks[0].damage, 12);
    assert_eq!(battle.enemy_team()[0].health(), 46);
    assert_eq!(battle.player_team()[0].health(), 38);
    assert_eq!(battle.turn(), 1);
    assert_eq!(battle.state(), BattleState::Active);
    assert_eq!(report.outcome, None);
    assert_eq!(
        battle.log(),
        [
            "Ember attacks Splash for 4 damage!",
            "Splash attacks Ember for 12 damage!",
        ]
    );
}

#[test]
fn callers_keep_their_own_teams() {
    let player = vec![creature(1, Element::Fire, 50, 10, 5)];
    let enemy = vec![creature(2, Element::Water, 50, 10, 5)];
    let mut battle = Battle::new(&player, &enemy);

    let _ = battle.resolve_turn(&DamageModel::default(), &mut NoVariance);

    assert_eq!(player[0].health(), 50);
    assert_eq!(enemy[0].health(), 50);
}

#[test]
fn empty_teams_end_immediately() {
    let team = [creature(1, Element::Fire, 50, 10, 5)];

    let no_enemies = Battle::new(&team, &[]);
    assert!(no_enemies.is_over());
    assert!(no_enemies.is_victory());

    let no_players = Battle::new(&[], &team);
    assert_eq!(no_players.outcome(), Some(Outcome::Defeat));

    let nobody = Battle::new(&[], &[]);
    assert_eq!(nobody.outcome(), Some(Outcome::Defeat));
}

#[test]
fn ended_battles_ignore_further_turns() {
    let mut battle = Battle::new(&[creature(1, Element::Fire, 50, 10, 5)], &[]);

    let report = battle.resolve_turn(&DamageModel::default(), &mut NoVariance);

    assert!(report.is_empty());
    assert_eq!(report.outcome, None);
    assert!(battle.log().is_empty());
    assert_eq!(battle.turn(), 0);
}

#[test]
fn enemies_defeated_in_player_sub_turn_never_attack() {
    let player = [
        creature(1, Element::Metal, 100, 50, 0),
        creature(2, Element::Metal, 100, 5, 0),
    ];
    let enemy = [
        creature(3, Element::Metal, 10, 30, 0),
        creature(4, Element::Metal, 100, 7, 0),
    ];
    let mut battle = Battle::new(&player, &enemy);

    let report = battle.resolve_turn(&DamageModel::default(), &mut NoVariance);

    assert_eq!(report.defeated_enemies, vec![CreatureId::new(3)]);
    assert_eq!(report.enemy_attacks.len(), 1);
    let counter = &report.enemy_attacks[0];
    assert_eq!(counter.attacker, CreatureId::new(4));
    assert_eq!(counter.defender, CreatureId::new(1));
    assert_eq!(counter.damage, 7);
    assert_eq!(battle.player_team()[0].health(), 93);
    assert_eq!(battle.player_team()[1].health(), 100);
    assert_eq!(battle.enemy_team()[0].health(), 95);
}

#[test]
fn defeated_players_are_tracked_until_defeat() {
    let player = [
        creature(1, Element::Metal, 5, 1, 0),
        creature(2, Element::Metal, 30, 1, 0),
    ];
    let enemy = [
        creature(3, Element::Metal, 500, 10, 0),
        creature(4, Element::Metal, 500, 10, 0),
    ];
    let mut battle = Battle::new(&player, &enemy);

    let outcome = battle.run_to_end(&DamageModel::default(), &mut NoVariance, 100);

    assert_eq!(outcome, Outcome::Defeat);
    assert!(battle.survivor_ids().is_empty());
    assert_eq!(
        battle.defeated_player_ids(),
        [CreatureId::new(1), CreatureId::new(2)]
    );
    assert!(battle.log().contains(&"Rivet is defeated!".to_owned()));
}

#[test]
fn unmatched_attackers_sit_out() {
    let player = [
        creature(1, Element::Metal, 100, 10, 0),
        creature(2, Element::Metal, 100, 10, 0),
        creature(3, Element::Metal, 100, 10, 0),
    ];
    let enemy = [creature(4, Element::Metal, 100, 10, 0)];
    let mut battle = Battle::new(&player, &enemy);

    let report = battle.resolve_turn(&DamageModel::default(), &mut NoVariance);

    assert_eq!(report.player_attacks.len(), 1);
    assert_eq!(report.enemy_attacks.len(), 1);
    assert_eq!(battle.enemy_team()[0].health(), 90);
}

proptest! {
    #[test]
    fn seeded_battles_finish_with_valid_health(
        seed in any::<u64>(),
        player_health in prop::collection::vec(1u32..200, 1..4),
        enemy_health in prop::collection::vec(1u32..200, 1..4),
    ) {
        let player: Vec<Creature> = player_health
            .iter()
            .enumerate()
            .map(|(index, health)| creature(index as u64 + 1, Element::Fire, *health, 12, 4))
            .collect();
        let enemy: Vec<Creature> = enemy_health
            .iter()
            .enumerate()
            .map(|(index, health)| creature(index as u64 + 100, Element::Earth, *health, 11, 6))
            .collect();
        let model = DamageModel::default();
        let mut variance = SeededVariance::from_config(seed, model.config());
        let mut battle = Battle::new(&player, &enemy);

        let outcome = battle.run_to_end(&model, &mut variance, 1_000);

        prop_assert!(battle.is_over());
        prop_assert_eq!(battle.is_victory(), outcome == Outcome::Victory);
        for survivor in battle.player_team() {
            prop_assert!(survivor.health() > 0);
            prop_assert!(survivor.health() <= survivor.max_health());
        }
        if outcome == Outcome::Victory {
            prop_assert!(battle.enemy_team().is_empty());
        }
    }
}

use anyhow::{bail, Context, Result};
use merge_arena_core::{Command, Creature, CreatureIdAllocator, Element, Event, Rewards, Tier};
use merge_arena_system_battle::{Battle, Outcome};
use merge_arena_system_damage::{DamageModel, SeededVariance};
use merge_arena_system_merge::MergePlanner;
use merge_arena_system_wave_generation::WaveGeneration;
use merge_arena_world::{self as world, query, World};

use crate::balance::BalanceConfig;

/// Turn cap for a single autoplayed battle.
const MAX_TURNS: u32 = 500;

/// Enemy identifiers start far above anything a roster allocates.
const FIRST_ENEMY_ID: u64 = 1_000_000;

/// Result of one autoplayed wave.
#[derive(Debug)]
pub(crate) struct WaveReport {
    pub(crate) wave: u32,
    pub(crate) outcome: Outcome,
    pub(crate) turns: u32,
    pub(crate) log: Vec<String>,
    pub(crate) rewards: Rewards,
    pub(crate) events: Vec<Event>,
}

/// Drives a roster world through shop, merge, battle and settlement phases.
#[derive(Debug)]
pub(crate) struct Campaign {
    world: World,
    generator: WaveGeneration,
    model: DamageModel,
    variance: SeededVariance,
    enemy_ids: CreatureIdAllocator,
    planner: MergePlanner,
    purchases: usize,
}

impl Campaign {
    pub(crate) fn new(world: World, balance: &BalanceConfig, seed: u64) -> Result<Self> {
        let model =
            DamageModel::new(balance.damage.clone()).context("invalid damage configuration")?;
        let variance = SeededVariance::from_config(seed, model.config());
        Ok(Self {
            world,
            generator: WaveGeneration::new(balance.wave_generation.clone(), seed),
            model,
            variance,
            enemy_ids: CreatureIdAllocator::starting_at(FIRST_ENEMY_ID),
            planner: MergePlanner::new(),
            purchases: 0,
        })
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Spends coins, merges everything mergeable, then fights and settles the current wave.
    pub(crate) fn play_wave(&mut self) -> Result<WaveReport> {
        let mut events = Vec::new();
        self.shop(&mut events);
        self.merge_all(&mut events);

        let wave = query::wave(&self.world);
        world::apply(&mut self.world, Command::DeployTeam, &mut events);
        if let Some(Event::DeployRejected { reason }) = events.last() {
            bail!("cannot deploy a team for wave {wave}: {reason}");
        }

        let team = query::deployed_team(&self.world);
        let enemies = self
            .generator
            .generate_enemy_team(wave, &mut self.enemy_ids);
        let mut battle = Battle::new(&team, &enemies);
        let outcome = battle.run_to_end(&self.model, &mut self.variance, MAX_TURNS);

        world::apply(
            &mut self.world,
            Command::SettleBattle {
                victory: outcome == Outcome::Victory,
                survivors: battle.survivor_ids(),
            },
            &mut events,
        );
        let rewards = events
            .iter()
            .rev()
            .find_map(|event| match event {
                Event::BattleSettled { rewards, .. } => Some(*rewards),
                _ => None,
            })
            .with_context(|| format!("wave {wave} battle was not settled"))?;

        Ok(WaveReport {
            wave,
            outcome,
            turns: battle.turn(),
            log: battle.log().to_vec(),
            rewards,
            events,
        })
    }

    fn shop(&mut self, events: &mut Vec<Event>) {
        while query::coins(&self.world) >= query::creature_cost(&self.world) {
            let element = self.next_purchase();
            let mut purchase = Vec::new();
            world::apply(
                &mut self.world,
                Command::BuyCreature { element },
                &mut purchase,
            );
            let bought = matches!(purchase.as_slice(), [Event::CreaturePurchased { .. }]);
            events.extend(purchase);
            if !bought {
                break;
            }
            self.purchases += 1;
        }
    }

    /// Buys a twin for an unpaired tier-one creature, otherwise rotates the classic elements.
    fn next_purchase(&self) -> Element {
        let roster = query::roster(&self.world);
        unpaired_starter(&roster)
            .unwrap_or(Element::CLASSIC[self.purchases % Element::CLASSIC.len()])
    }

    fn merge_all(&mut self, events: &mut Vec<Event>) {
        loop {
            let roster = query::roster(&self.world);
            let mut commands = Vec::new();
            self.planner.handle(&roster, &mut commands);

            let before = events.len();
            for command in commands {
                world::apply(&mut self.world, command, events);
            }
            let merged = events[before..]
                .iter()
                .any(|event| matches!(event, Event::CreaturesMerged { .. }));
            if !merged {
                break;
            }
        }
    }
}

fn unpaired_starter(roster: &[Creature]) -> Option<Element> {
    let starters = || roster.iter().filter(|creature| creature.tier() == Tier::MIN);
    starters()
        .map(Creature::element)
        .find(|element| starters().filter(|other| other.element() == *element).count() % 2 == 1)
}

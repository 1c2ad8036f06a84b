#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative roster state for Merge Arena.
//!
//! The world owns the placement grid, every creature on the roster, the coin
//! balance, the wave counter and the team currently deployed to battle. It is
//! mutated only through [`apply`]; read access goes through [`query`].

mod grid;
mod snapshot;

use std::collections::{BTreeMap, HashSet};

use merge_arena_core::{
    CellId, Command, Creature, CreatureId, CreatureIdAllocator, DeployError, Element, Event,
    MergeError, MergeRejection, MoveError, PurchaseError, SettleError, Tier,
};
use merge_arena_system_economy::Economy;
use merge_arena_system_merge::{can_merge, merge, merge_check};
use serde::Deserialize;
use thiserror::Error;

use grid::Grid;
pub use snapshot::WorldSnapshot;

/// Tuning knobs for a fresh roster world.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of placement cells.
    pub grid_cells: u32,
    /// Coin balance of a new game.
    pub starting_coins: u64,
    /// Price of a tier-one creature.
    pub creature_cost: u64,
    /// Elements of the tier-one creatures a new game starts with, placed in cell order.
    pub starter_elements: Vec<Element>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_cells: 9,
            starting_coins: 100,
            creature_cost: 10,
            starter_elements: vec![Element::Earth, Element::Fire, Element::Air],
        }
    }
}

impl Config {
    /// Checks that the grid exists and can hold the starter roster.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_cells == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.starter_elements.len() > self.grid_cells as usize {
            return Err(ConfigError::TooManyStarters {
                starters: self.starter_elements.len(),
                cells: self.grid_cells,
            });
        }
        Ok(())
    }
}

/// Reasons a world configuration is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The grid has no cells.
    #[error("grid_cells must be at least 1")]
    EmptyGrid,
    /// The starter roster does not fit on the grid.
    #[error("{starters} starter creatures do not fit on {cells} cells")]
    TooManyStarters {
        /// Configured starter count.
        starters: usize,
        /// Configured cell count.
        cells: u32,
    },
}

/// Represents the authoritative Merge Arena roster state.
#[derive(Clone, Debug)]
pub struct World {
    config: Config,
    economy: Economy,
    grid: Grid,
    creatures: BTreeMap<CreatureId, Creature>,
    coins: u64,
    wave: u32,
    ids: CreatureIdAllocator,
    deployed: Option<Vec<CreatureId>>,
}

impl World {
    /// Creates a new game using default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default(), Economy::default())
    }

    /// Creates a new game with the provided tuning and starter roster.
    #[must_use]
    pub fn with_config(config: Config, economy: Economy) -> Self {
        let mut world = Self {
            grid: Grid::new(config.grid_cells),
            creatures: BTreeMap::new(),
            coins: config.starting_coins,
            wave: 1,
            ids: CreatureIdAllocator::default(),
            deployed: None,
            economy,
            config,
        };
        world.seed_starters();
        world
    }

    /// Restores a world from a snapshot.
    ///
    /// Creature stats are recomputed from tier and level, cell occupants
    /// without a creature record are dropped, creatures without a cell are
    /// placed in the first free cell (or dropped when the grid is
    /// full), and the wave is clamped into the campaign range. The restored
    /// world never has a team deployed.
    #[must_use]
    pub fn from_snapshot(snapshot: WorldSnapshot, config: Config, economy: Economy) -> Self {
        let mut ids = CreatureIdAllocator::starting_at(snapshot.next_creature_id.max(1));
        let mut creatures = BTreeMap::new();
        for record in snapshot.creatures {
            let stored = Creature::from(record);
            let creature = stored.with_derived_stats();
            if creature.stats() != stored.stats() {
                tracing::warn!(creature = %creature.id(), "recomputing stats that disagree with tier and level");
            }
            ids.reserve(creature.id());
            if creatures.contains_key(&creature.id()) {
                tracing::warn!(creature = %creature.id(), "dropping duplicate creature record");
                continue;
            }
            let _ = creatures.insert(creature.id(), creature);
        }

        let size = if snapshot.cells.is_empty() {
            config.grid_cells as usize
        } else {
            snapshot.cells.len()
        };
        let mut cells = vec![None; size];
        let mut placed = HashSet::new();
        for (index, occupant) in snapshot.cells.into_iter().enumerate() {
            let Some(raw) = occupant else {
                continue;
            };
            let id = CreatureId::new(raw);
            if !creatures.contains_key(&id) {
                tracing::warn!(cell = index, creature = %id, "dropping occupant without a creature record");
                continue;
            }
            if !placed.insert(id) {
                tracing::warn!(cell = index, creature = %id, "dropping repeated placement");
                continue;
            }
            cells[index] = Some(id);
        }

        let mut grid = Grid::from_cells(cells);
        let unplaced: Vec<CreatureId> = creatures
            .keys()
            .filter(|id| !placed.contains(*id))
            .copied()
            .collect();
        for id in unplaced {
            if let Some(cell) = grid.first_empty() {
                grid.set(cell, Some(id));
            } else {
                tracing::warn!(creature = %id, "dropping creature that no longer fits on the grid");
                let _ = creatures.remove(&id);
            }
        }

        let wave = snapshot.wave.clamp(1, economy.config().max_wave.max(1));
        Self {
            config,
            economy,
            grid,
            creatures,
            coins: snapshot.coins,
            wave,
            ids,
            deployed: None,
        }
    }

    fn seed_starters(&mut self) {
        for element in self.config.starter_elements.clone() {
            let Some(cell) = self.grid.first_empty() else {
                tracing::warn!(%element, "no room for starter creature");
                break;
            };
            let creature = Creature::create(self.ids.allocate(), element, Tier::MIN, 1);
            self.place(cell, creature);
        }
    }

    fn place(&mut self, cell: CellId, creature: Creature) {
        self.grid.set(cell, Some(creature.id()));
        let _ = self.creatures.insert(creature.id(), creature);
    }

    fn remove(&mut self, creature: CreatureId) -> Option<Creature> {
        self.grid.vacate(creature);
        self.creatures.remove(&creature)
    }

    fn ensure_unlocked<E>(&self, locked: E) -> Result<(), E> {
        if self.deployed.is_some() {
            Err(locked)
        } else {
            Ok(())
        }
    }

    fn buy(&mut self, element: Element) -> Result<Event, PurchaseError> {
        self.ensure_unlocked(PurchaseError::BattleInProgress)?;
        let cost = self.config.creature_cost;
        if self.coins < cost {
            return Err(PurchaseError::InsufficientCoins {
                required: cost,
                available: self.coins,
            });
        }
        let cell = self.grid.first_empty().ok_or(PurchaseError::GridFull)?;

        self.coins -= cost;
        let creature = Creature::create(self.ids.allocate(), element, Tier::MIN, 1);
        let id = creature.id();
        self.place(cell, creature);
        Ok(Event::CreaturePurchased {
            creature: id,
            element,
            cell,
            cost,
        })
    }

    fn move_creature(
        &mut self,
        creature: CreatureId,
        cell: CellId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), MoveError> {
        self.ensure_unlocked(MoveError::BattleInProgress)?;
        let from = self
            .grid
            .cell_of(creature)
            .ok_or(MoveError::UnknownCreature(creature))?;
        if !self.grid.contains(cell) {
            return Err(MoveError::UnknownCell(cell));
        }

        match self.grid.occupant(cell) {
            None => {
                self.grid.set(from, None);
                self.grid.set(cell, Some(creature));
                out_events.push(Event::CreatureMoved {
                    creature,
                    from,
                    to: cell,
                });
            }
            Some(occupant) if occupant == creature => {}
            Some(occupant) => {
                let mergeable = match (self.creatures.get(&creature), self.creatures.get(&occupant)) {
                    (Some(moving), Some(resident)) => can_merge(moving, resident),
                    _ => false,
                };
                if mergeable {
                    self.merge_into(creature, occupant, out_events);
                } else {
                    self.grid.set(from, Some(occupant));
                    self.grid.set(cell, Some(creature));
                    out_events.push(Event::CreaturesSwapped {
                        moved: creature,
                        displaced: occupant,
                        moved_to: cell,
                        displaced_to: from,
                    });
                }
            }
        }
        Ok(())
    }

    fn merge_into(&mut self, source: CreatureId, target: CreatureId, out_events: &mut Vec<Event>) {
        match self.merge_creatures(source, target) {
            Ok(event) => out_events.push(event),
            Err(reason) => {
                tracing::warn!(%source, %target, %reason, "merge rejected");
                out_events.push(Event::MergeRejected {
                    source,
                    target,
                    reason,
                });
            }
        }
    }

    fn merge_creatures(
        &mut self,
        source: CreatureId,
        target: CreatureId,
    ) -> Result<Event, MergeRejection> {
        self.ensure_unlocked(MergeRejection::BattleInProgress)?;
        let moving = self
            .creatures
            .get(&source)
            .ok_or(MergeRejection::UnknownCreature(source))?;
        let resident = self
            .creatures
            .get(&target)
            .ok_or(MergeRejection::UnknownCreature(target))?;
        merge_check(moving, resident)?;
        let cell = self
            .grid
            .cell_of(target)
            .ok_or(MergeRejection::UnknownCreature(target))?;
        // an eligible pair can only fail to merge at the tier ceiling
        let merged = merge(moving, resident, self.ids.peek())
            .ok_or(MergeRejection::Ineligible(MergeError::MaxTier))?;
        let _ = self.ids.allocate();

        let created = merged.id();
        let tier = merged.tier();
        let _ = self.remove(source);
        let _ = self.remove(target);
        self.place(cell, merged);
        Ok(Event::CreaturesMerged {
            consumed: [source, target],
            created,
            tier,
            cell,
        })
    }

    fn deploy(&mut self) -> Result<Event, DeployError> {
        self.ensure_unlocked(DeployError::BattleInProgress)?;
        let team: Vec<CreatureId> = self.grid.occupants().map(|(_, id)| id).collect();
        if team.is_empty() {
            let cost = self.config.creature_cost;
            if self.coins < cost {
                return Err(DeployError::Bankrupt {
                    cost,
                    available: self.coins,
                });
            }
            return Err(DeployError::EmptyTeam);
        }

        for id in &team {
            if let Some(creature) = self.creatures.get_mut(id) {
                *creature = creature.reset_health();
            }
        }
        self.deployed = Some(team.clone());
        tracing::debug!(size = team.len(), wave = self.wave, "team deployed");
        Ok(Event::TeamDeployed { team })
    }

    fn settle(
        &mut self,
        victory: bool,
        survivors: &[CreatureId],
        out_events: &mut Vec<Event>,
    ) -> Result<(), SettleError> {
        let deployed = self.deployed.take().ok_or(SettleError::NoBattle)?;
        let roster: Vec<Creature> = deployed
            .iter()
            .filter_map(|id| self.creatures.get(id).cloned())
            .collect();
        let settlement = self.economy.settle(&roster, survivors, victory, self.wave);

        self.coins = self.coins.saturating_add(settlement.rewards.coins);
        for creature in settlement.survivors {
            if settlement.leveled_up.contains(&creature.id()) {
                out_events.push(Event::CreatureLeveledUp {
                    creature: creature.id(),
                    level: creature.level(),
                });
            }
            let _ = self.creatures.insert(creature.id(), creature);
        }
        for id in settlement.retired {
            let _ = self.remove(id);
            out_events.push(Event::CreatureRetired { creature: id });
        }
        self.wave = settlement.next_wave;
        out_events.push(Event::BattleSettled {
            victory,
            rewards: settlement.rewards,
            wave: self.wave,
        });
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Rejected commands leave the world untouched and report a `*Rejected` event.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BuyCreature { element } => match world.buy(element) {
            Ok(event) => out_events.push(event),
            Err(reason) => {
                tracing::warn!(%element, %reason, "purchase rejected");
                out_events.push(Event::PurchaseRejected { element, reason });
            }
        },
        Command::MoveCreature { creature, cell } => {
            if let Err(reason) = world.move_creature(creature, cell, out_events) {
                tracing::warn!(%creature, cell = cell.get(), %reason, "move rejected");
                out_events.push(Event::MoveRejected {
                    creature,
                    cell,
                    reason,
                });
            }
        }
        Command::MergeCreatures { source, target } => world.merge_into(source, target, out_events),
        Command::DeployTeam => match world.deploy() {
            Ok(event) => out_events.push(event),
            Err(reason) => {
                tracing::warn!(%reason, "deployment rejected");
                out_events.push(Event::DeployRejected { reason });
            }
        },
        Command::SettleBattle { victory, survivors } => {
            if let Err(reason) = world.settle(victory, &survivors, out_events) {
                tracing::warn!(%reason, "settlement rejected");
                out_events.push(Event::SettleRejected { reason });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use merge_arena_core::{CellId, Creature, CreatureId, CreatureRecord};

    use super::{World, WorldSnapshot};

    /// Read-only view of a single grid cell.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct GridCell {
        /// Identifier of the cell.
        pub id: CellId,
        /// Creature placed in the cell, if any.
        pub occupant: Option<CreatureId>,
    }

    /// Current coin balance.
    #[must_use]
    pub fn coins(world: &World) -> u64 {
        world.coins
    }

    /// Wave the player faces next.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Highest wave of the campaign.
    #[must_use]
    pub fn max_wave(world: &World) -> u32 {
        world.economy.config().max_wave
    }

    /// Price of a tier-one creature.
    #[must_use]
    pub fn creature_cost(world: &World) -> u64 {
        world.config.creature_cost
    }

    /// Number of placement cells.
    #[must_use]
    pub fn cell_count(world: &World) -> usize {
        world.grid.len()
    }

    /// Every grid cell in order.
    #[must_use]
    pub fn grid(world: &World) -> Vec<GridCell> {
        world
            .grid
            .cells()
            .iter()
            .enumerate()
            .map(|(index, occupant)| GridCell {
                id: CellId::new(u32::try_from(index).unwrap_or(u32::MAX)),
                occupant: *occupant,
            })
            .collect()
    }

    /// Looks up a creature by identifier.
    #[must_use]
    pub fn creature(world: &World, id: CreatureId) -> Option<&Creature> {
        world.creatures.get(&id)
    }

    /// Cell holding the provided creature.
    #[must_use]
    pub fn cell_of(world: &World, id: CreatureId) -> Option<CellId> {
        world.grid.cell_of(id)
    }

    /// Creatures on the grid, in cell order.
    #[must_use]
    pub fn roster(world: &World) -> Vec<Creature> {
        world
            .grid
            .occupants()
            .filter_map(|(_, id)| world.creatures.get(&id).cloned())
            .collect()
    }

    /// Reports whether a team is deployed and the roster is locked.
    #[must_use]
    pub fn is_battle_in_progress(world: &World) -> bool {
        world.deployed.is_some()
    }

    /// Deployed creatures in pairing order; empty when no battle is in progress.
    #[must_use]
    pub fn deployed_team(world: &World) -> Vec<Creature> {
        world
            .deployed
            .iter()
            .flatten()
            .filter_map(|id| world.creatures.get(id).cloned())
            .collect()
    }

    /// Captures a persistable copy of the world.
    #[must_use]
    pub fn snapshot(world: &World) -> WorldSnapshot {
        WorldSnapshot {
            cells: world
                .grid
                .cells()
                .iter()
                .map(|occupant| occupant.map(|id| id.get()))
                .collect(),
            creatures: world
                .creatures
                .values()
                .cloned()
                .map(CreatureRecord::from)
                .collect(),
            coins: world.coins,
            wave: world.wave,
            next_creature_id: world.ids.peek().get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merge_arena_core::{Rewards, Severity};

    fn apply_one(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    fn empty_world(coins: u64) -> World {
        World::with_config(
            Config {
                starting_coins: coins,
                starter_elements: Vec::new(),
                ..Config::default()
            },
            Economy::default(),
        )
    }

    #[test]
    fn new_world_starts_with_starter_roster() {
        let world = World::new();
        let roster = query::roster(&world);

        assert_eq!(query::coins(&world), 100);
        assert_eq!(query::wave(&world), 1);
        assert_eq!(query::max_wave(&world), 10);
        assert_eq!(query::cell_count(&world), 9);
        let names: Vec<&str> = roster.iter().map(Creature::name).collect();
        assert_eq!(names, vec!["Pebble", "Ember", "Breeze"]);
        assert_eq!(query::cell_of(&world, roster[2].id()), Some(CellId::new(2)));
    }

    #[test]
    fn purchase_spends_coins_and_fills_first_empty_cell() {
        let mut world = World::new();

        let events = apply_one(&mut world, Command::BuyCreature { element: Element::Ice });

        assert_eq!(
            events,
            vec![Event::CreaturePurchased {
                creature: CreatureId::new(4),
                element: Element::Ice,
                cell: CellId::new(3),
                cost: 10,
            }]
        );
        assert_eq!(query::coins(&world), 90);
    }

    #[test]
    fn purchase_rejections_leave_state_untouched() {
        let mut poor = empty_world(5);
        let events = apply_one(&mut poor, Command::BuyCreature { element: Element::Fire });
        assert_eq!(
            events,
            vec![Event::PurchaseRejected {
                element: Element::Fire,
                reason: PurchaseError::InsufficientCoins {
                    required: 10,
                    available: 5,
                },
            }]
        );
        assert_eq!(query::coins(&poor), 5);
        assert!(query::roster(&poor).is_empty());

        let mut crowded = World::with_config(
            Config {
                grid_cells: 2,
                starter_elements: vec![Element::Fire, Element::Water],
                ..Config::default()
            },
            Economy::default(),
        );
        let events = apply_one(&mut crowded, Command::BuyCreature { element: Element::Air });
        assert!(matches!(
            events.as_slice(),
            [Event::PurchaseRejected {
                reason: PurchaseError::GridFull,
                ..
            }]
        ));
        assert_eq!(query::coins(&crowded), 100);
    }

    #[test]
    fn moves_swap_incompatible_occupants() {
        let mut world = World::new();
        let pebble = CreatureId::new(1);
        let ember = CreatureId::new(2);

        let events = apply_one(
            &mut world,
            Command::MoveCreature {
                creature: pebble,
                cell: CellId::new(1),
            },
        );
        assert_eq!(
            events,
            vec![Event::CreaturesSwapped {
                moved: pebble,
                displaced: ember,
                moved_to: CellId::new(1),
                displaced_to: CellId::new(0),
            }]
        );

        let events = apply_one(
            &mut world,
            Command::MoveCreature {
                creature: pebble,
                cell: CellId::new(8),
            },
        );
        assert_eq!(
            events,
            vec![Event::CreatureMoved {
                creature: pebble,
                from: CellId::new(1),
                to: CellId::new(8),
            }]
        );

        let events = apply_one(
            &mut world,
            Command::MoveCreature {
                creature: pebble,
                cell: CellId::new(8),
            },
        );
        assert!(events.is_empty());
    }

    #[test]
    fn moving_onto_a_matching_creature_merges() {
        let mut world = empty_world(100);
        let _ = apply_one(&mut world, Command::BuyCreature { element: Element::Fire });
        let _ = apply_one(&mut world, Command::BuyCreature { element: Element::Fire });

        let events = apply_one(
            &mut world,
            Command::MoveCreature {
                creature: CreatureId::new(2),
                cell: CellId::new(0),
            },
        );

        assert_eq!(
            events,
            vec![Event::CreaturesMerged {
                consumed: [CreatureId::new(2), CreatureId::new(1)],
                created: CreatureId::new(3),
                tier: Tier::new(2).expect("tier"),
                cell: CellId::new(0),
            }]
        );
        let roster = query::roster(&world);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name(), "Blaze");
    }

    #[test]
    fn move_rejections_name_the_bad_reference() {
        let mut world = World::new();

        let events = apply_one(
            &mut world,
            Command::MoveCreature {
                creature: CreatureId::new(77),
                cell: CellId::new(0),
            },
        );
        assert!(matches!(
            events.as_slice(),
            [Event::MoveRejected {
                reason: MoveError::UnknownCreature(_),
                ..
            }]
        ));

        let events = apply_one(
            &mut world,
            Command::MoveCreature {
                creature: CreatureId::new(1),
                cell: CellId::new(40),
            },
        );
        assert!(matches!(
            events.as_slice(),
            [Event::MoveRejected {
                reason: MoveError::UnknownCell(_),
                ..
            }]
        ));
    }

    #[test]
    fn merge_rejections_report_the_rule() {
        let mut world = World::new();

        let events = apply_one(
            &mut world,
            Command::MergeCreatures {
                source: CreatureId::new(1),
                target: CreatureId::new(2),
            },
        );

        assert_eq!(
            events,
            vec![Event::MergeRejected {
                source: CreatureId::new(1),
                target: CreatureId::new(2),
                reason: MergeRejection::Ineligible(MergeError::ElementMismatch),
            }]
        );
        assert_eq!(query::roster(&world).len(), 3);
    }

    #[test]
    fn deployment_locks_the_roster_until_settled() {
        let mut world = World::new();

        let events = apply_one(&mut world, Command::DeployTeam);
        assert_eq!(
            events,
            vec![Event::TeamDeployed {
                team: vec![CreatureId::new(1), CreatureId::new(2), CreatureId::new(3)],
            }]
        );
        assert!(query::is_battle_in_progress(&world));
        assert_eq!(query::deployed_team(&world).len(), 3);

        let events = apply_one(&mut world, Command::BuyCreature { element: Element::Fire });
        assert!(matches!(
            events.as_slice(),
            [Event::PurchaseRejected {
                reason: PurchaseError::BattleInProgress,
                ..
            }]
        ));
        let events = apply_one(&mut world, Command::DeployTeam);
        assert_eq!(
            events,
            vec![Event::DeployRejected {
                reason: DeployError::BattleInProgress,
            }]
        );
    }

    #[test]
    fn settlement_pays_out_and_retires_the_fallen() {
        let mut world = World::new();
        let _ = apply_one(&mut world, Command::DeployTeam);

        let events = apply_one(
            &mut world,
            Command::SettleBattle {
                victory: true,
                survivors: vec![CreatureId::new(2), CreatureId::new(3)],
            },
        );

        assert_eq!(
            events,
            vec![
                Event::CreatureRetired {
                    creature: CreatureId::new(1),
                },
                Event::BattleSettled {
                    victory: true,
                    rewards: Rewards { coins: 10, xp: 20 },
                    wave: 2,
                },
            ]
        );
        assert_eq!(query::coins(&world), 110);
        assert_eq!(query::wave(&world), 2);
        assert!(!query::is_battle_in_progress(&world));
        assert!(query::creature(&world, CreatureId::new(1)).is_none());
        assert_eq!(query::grid(&world)[0].occupant, None);
        let ember = query::creature(&world, CreatureId::new(2)).expect("survivor");
        assert_eq!(ember.experience(), 20);
    }

    #[test]
    fn settlement_without_deployment_is_rejected() {
        let mut world = World::new();
        let events = apply_one(
            &mut world,
            Command::SettleBattle {
                victory: true,
                survivors: Vec::new(),
            },
        );
        assert_eq!(
            events,
            vec![Event::SettleRejected {
                reason: SettleError::NoBattle,
            }]
        );
        assert_eq!(query::wave(&world), 1);
    }

    #[test]
    fn deploying_an_empty_grid_is_rejected() {
        let mut world = empty_world(50);
        let events = apply_one(&mut world, Command::DeployTeam);
        assert_eq!(
            events,
            vec![Event::DeployRejected {
                reason: DeployError::EmptyTeam,
            }]
        );
        assert!(!query::is_battle_in_progress(&world));
    }

    #[test]
    fn empty_grid_without_coins_for_a_creature_is_critical() {
        let mut world = empty_world(9);
        let events = apply_one(&mut world, Command::DeployTeam);
        let reason = DeployError::Bankrupt {
            cost: 10,
            available: 9,
        };
        assert_eq!(events, vec![Event::DeployRejected { reason }]);
        assert_eq!(reason.severity(), Severity::Critical);
        assert_eq!(query::coins(&world), 9);
    }

    #[test]
    fn config_validation_catches_impossible_layouts() {
        assert_eq!(
            Config {
                grid_cells: 0,
                ..Config::default()
            }
            .validate(),
            Err(ConfigError::EmptyGrid)
        );
        assert_eq!(
            Config {
                grid_cells: 2,
                ..Config::default()
            }
            .validate(),
            Err(ConfigError::TooManyStarters {
                starters: 3,
                cells: 2,
            })
        );
        assert!(Config::default().validate().is_ok());
    }
}

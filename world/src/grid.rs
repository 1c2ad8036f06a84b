//! Fixed-size placement grid holding at most one creature per cell.

use merge_arena_core::{CellId, CreatureId};

/// Ordered cells, each optionally occupied by a creature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Grid {
    cells: Vec<Option<CreatureId>>,
}

impl Grid {
    /// Creates an empty grid with `size` cells.
    pub(crate) fn new(size: u32) -> Self {
        Self {
            cells: vec![None; size as usize],
        }
    }

    /// Creates a grid from explicit occupants in cell order.
    pub(crate) fn from_cells(cells: Vec<Option<CreatureId>>) -> Self {
        Self { cells }
    }

    /// Number of cells in the grid.
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether `cell` lies within the grid.
    pub(crate) fn contains(&self, cell: CellId) -> bool {
        (cell.get() as usize) < self.cells.len()
    }

    /// Creature occupying `cell`, if any.
    pub(crate) fn occupant(&self, cell: CellId) -> Option<CreatureId> {
        self.cells.get(cell.get() as usize).copied().flatten()
    }

    /// Cell holding `creature`, if it is placed.
    pub(crate) fn cell_of(&self, creature: CreatureId) -> Option<CellId> {
        self.cells
            .iter()
            .position(|occupant| *occupant == Some(creature))
            .map(cell_id)
    }

    /// First cell without an occupant.
    pub(crate) fn first_empty(&self) -> Option<CellId> {
        self.cells.iter().position(Option::is_none).map(cell_id)
    }

    /// Replaces the occupant of `cell`. Out-of-range cells are ignored.
    pub(crate) fn set(&mut self, cell: CellId, occupant: Option<CreatureId>) {
        if let Some(slot) = self.cells.get_mut(cell.get() as usize) {
            *slot = occupant;
        }
    }

    /// Clears whichever cell holds `creature`.
    pub(crate) fn vacate(&mut self, creature: CreatureId) {
        if let Some(cell) = self.cell_of(creature) {
            self.set(cell, None);
        }
    }

    /// Occupied cells in grid order.
    pub(crate) fn occupants(&self) -> impl Iterator<Item = (CellId, CreatureId)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, occupant)| occupant.map(|creature| (cell_id(index), creature)))
    }

    /// Every cell in grid order.
    pub(crate) fn cells(&self) -> &[Option<CreatureId>] {
        &self.cells
    }
}

fn cell_id(index: usize) -> CellId {
    CellId::new(u32::try_from(index).unwrap_or(u32::MAX))
}

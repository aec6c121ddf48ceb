//! Sticky Wild Registry
//!
//! During bonus mode a wild that lands in the middle band stays on the grid
//! for every remaining free spin. The registry owns those overlays; the grid
//! only carries a flag per cell.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::grid::CellPos;
use crate::symbols::SymbolRoles;

/// A wild pinned to a grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickyWildRef {
    pub pos: CellPos,
    pub symbol: u32,
}

/// Result of [`StickyWildRegistry::add_if_eligible`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickyOutcome {
    /// A new sticky wild was created
    Added,
    /// The cell already holds a sticky wild; nothing changed
    AlreadyPresent,
    /// Not bonus mode, outside the middle band, or not a wild
    Ineligible,
}

#[derive(Debug, Clone)]
pub struct StickyWildRegistry {
    grid: GridSpec,
    roles: SymbolRoles,
    wilds: BTreeMap<CellPos, StickyWildRef>,
}

impl StickyWildRegistry {
    pub fn new(grid: GridSpec, roles: SymbolRoles) -> Self {
        Self {
            grid,
            roles,
            wilds: BTreeMap::new(),
        }
    }

    /// Pin the wild at `(col, row)` if the rule allows it. Idempotent per cell.
    pub fn add_if_eligible(&mut self, col: u8, row: u8, symbol: u32, is_bonus: bool) -> StickyOutcome {
        let pos = CellPos::new(col, row);
        if self.wilds.contains_key(&pos) {
            return StickyOutcome::AlreadyPresent;
        }
        if !is_bonus
            || !self.grid.contains(col, row)
            || !self.grid.is_middle_band(row)
            || !self.roles.is_wild(symbol)
        {
            return StickyOutcome::Ineligible;
        }

        self.wilds.insert(pos, StickyWildRef { pos, symbol });
        StickyOutcome::Added
    }

    pub fn has(&self, col: u8, row: u8) -> bool {
        self.wilds.contains_key(&CellPos::new(col, row))
    }

    pub fn get(&self, pos: CellPos) -> Option<&StickyWildRef> {
        self.wilds.get(&pos)
    }

    /// Remove every sticky wild. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.wilds.len();
        self.wilds.clear();
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &StickyWildRef> {
        self.wilds.values()
    }

    pub fn len(&self) -> usize {
        self.wilds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wilds.is_empty()
    }
}

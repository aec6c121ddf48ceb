//! Grid state — the authoritative cell occupants of the current spin

use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::sticky::StickyWildRegistry;

/// Cell coordinate. Ordering is left-to-right (column first, then row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub col: u8,
    pub row: u8,
}

impl CellPos {
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }
}

/// Animation clips a cell can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationClip {
    /// Resting animation once a reel has landed
    Idle,
    /// Win celebration
    Winning,
}

impl AnimationClip {
    /// Animation name handed to the renderer
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Winning => "win",
        }
    }

    /// Win animations loop until the next spin clears them
    pub fn looped(&self) -> bool {
        matches!(self, Self::Winning)
    }

    pub fn kind(&self) -> VisualKind {
        match self {
            Self::Idle => VisualKind::Idle,
            Self::Winning => VisualKind::Winning,
        }
    }
}

/// Presentation form the renderer is asked to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualKind {
    Static,
    Idle,
    Winning,
}

/// What a cell currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellVisual {
    /// Plain sprite, also the fallback when an animation is unavailable
    #[default]
    Static,
    /// Animation playing
    Animated { clip: AnimationClip, looped: bool },
}

impl CellVisual {
    pub fn animated(clip: AnimationClip) -> Self {
        Self::Animated {
            clip,
            looped: clip.looped(),
        }
    }

    pub fn kind(&self) -> VisualKind {
        match self {
            Self::Static => VisualKind::Static,
            Self::Animated { clip, .. } => clip.kind(),
        }
    }
}

/// One grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCell {
    pub symbol: u32,
    pub visual: CellVisual,
    /// Covered by a sticky-wild overlay; the base symbol is not drawn
    pub sticky: bool,
}

/// Grid of cells (reels × rows) plus the last raw symbol matrix
#[derive(Debug, Clone)]
pub struct GridState {
    spec: GridSpec,
    cells: Vec<Vec<GridCell>>,
    raw: Vec<Vec<u32>>,
}

impl GridState {
    pub fn new(spec: GridSpec) -> Self {
        Self {
            spec,
            cells: vec![vec![GridCell::default(); spec.rows as usize]; spec.reels as usize],
            raw: Vec::new(),
        }
    }

    pub fn spec(&self) -> GridSpec {
        self.spec
    }

    pub fn cell(&self, pos: CellPos) -> Option<&GridCell> {
        self.cells.get(pos.col as usize)?.get(pos.row as usize)
    }

    fn cell_mut(&mut self, pos: CellPos) -> Option<&mut GridCell> {
        self.cells.get_mut(pos.col as usize)?.get_mut(pos.row as usize)
    }

    /// Last symbol matrix received from the backend, as received
    pub fn raw_values(&self) -> &[Vec<u32>] {
        &self.raw
    }

    /// Symbol matrix as held by the cells (always `reels × rows`)
    pub fn values(&self) -> Vec<Vec<u32>> {
        self.cells
            .iter()
            .map(|col| col.iter().map(|c| c.symbol).collect())
            .collect()
    }

    /// Every position of one reel, top to bottom
    pub fn reel(&self, col: u8) -> impl Iterator<Item = CellPos> + '_ {
        (0..self.spec.rows).map(move |row| CellPos::new(col, row))
    }

    /// Every position, reel by reel
    pub fn positions(&self) -> impl Iterator<Item = CellPos> + '_ {
        (0..self.spec.reels).flat_map(move |col| self.reel(col))
    }

    /// Reset every cell to its static visual.
    ///
    /// Sticky flags survive when `keep_sticky` is set. Returns the cells that
    /// were showing something other than the static form.
    pub fn reset_visuals(&mut self, keep_sticky: bool) -> Vec<CellPos> {
        let mut changed = Vec::new();
        for (col, cells) in self.cells.iter_mut().enumerate() {
            for (row, cell) in cells.iter_mut().enumerate() {
                if cell.visual != CellVisual::Static {
                    changed.push(CellPos::new(col as u8, row as u8));
                }
                cell.visual = CellVisual::Static;
                if !keep_sticky {
                    cell.sticky = false;
                }
            }
        }
        changed
    }

    /// Replace the grid with a new symbol matrix.
    ///
    /// Cells covered by the registry are flagged sticky. Positions missing
    /// from a ragged matrix keep their previous symbol. Returns the number of
    /// missing positions.
    pub fn replace(&mut self, values: &[Vec<u32>], sticky: &StickyWildRegistry) -> usize {
        let mut missing = 0;
        for (col, cells) in self.cells.iter_mut().enumerate() {
            for (row, cell) in cells.iter_mut().enumerate() {
                match values.get(col).and_then(|c| c.get(row)) {
                    Some(&symbol) => cell.symbol = symbol,
                    None => missing += 1,
                }
                cell.visual = CellVisual::Static;
                cell.sticky = sticky.has(col as u8, row as u8);
            }
        }
        self.raw = values.to_vec();
        missing
    }

    pub fn set_visual(&mut self, pos: CellPos, visual: CellVisual) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.visual = visual;
        }
    }

    pub fn mark_sticky(&mut self, pos: CellPos) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.sticky = true;
        }
    }

    pub fn clear_sticky(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.sticky = false;
        }
    }

    /// Cells whose base symbol is suppressed by a sticky overlay
    pub fn suppressed(&self) -> Vec<CellPos> {
        self.positions()
            .filter(|&pos| self.cell(pos).is_some_and(|c| c.sticky))
            .collect()
    }
}

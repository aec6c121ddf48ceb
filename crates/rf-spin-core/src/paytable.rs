//! Line shapes
//!
//! The backend reports winning lines by key; this table maps each key to the
//! grid cells the line covers. Pay values live on the backend.

use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::grid::CellPos;

/// A payline shape: boolean mask over the grid, column-major (`mask[col][row]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineShape {
    pub mask: Vec<Vec<bool>>,
}

impl LineShape {
    /// Build a shape from one row index per reel (e.g. `[1, 0, 0, 0, 1]`)
    pub fn from_rows(rows_per_reel: &[u8], rows: u8) -> Self {
        let mask = rows_per_reel
            .iter()
            .map(|&hit| (0..rows).map(|row| row == hit).collect())
            .collect();
        Self { mask }
    }

    /// Straight line along one row
    pub fn straight(row: u8, grid: GridSpec) -> Self {
        Self::from_rows(&vec![row; grid.reels as usize], grid.rows)
    }

    /// Masked positions, left-to-right (column first, then row)
    pub fn positions(&self) -> Vec<CellPos> {
        let mut positions: Vec<CellPos> = self
            .mask
            .iter()
            .enumerate()
            .flat_map(|(col, rows)| {
                rows.iter()
                    .enumerate()
                    .filter(|(_, hit)| **hit)
                    .map(move |(row, _)| CellPos::new(col as u8, row as u8))
            })
            .collect();
        positions.sort();
        positions
    }

    /// Check the mask matches the grid dimensions
    pub fn fits(&self, grid: GridSpec) -> bool {
        self.mask.len() == grid.reels as usize
            && self.mask.iter().all(|rows| rows.len() == grid.rows as usize)
    }
}

/// Fixed table of line shapes, indexed by line key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineShapeTable {
    shapes: Vec<LineShape>,
}

impl LineShapeTable {
    pub fn new(shapes: Vec<LineShape>) -> Self {
        Self { shapes }
    }

    /// Standard table: every straight row, then V shapes and zigzags that fit
    pub fn standard(grid: GridSpec) -> Self {
        let mut shapes: Vec<LineShape> = (0..grid.rows).map(|row| LineShape::straight(row, grid)).collect();

        if grid.rows >= 3 && grid.reels >= 3 {
            let top = 0u8;
            let bottom = grid.rows - 1;
            let mid = grid.reels / 2;
            let depth = |reel: u8| -> u8 {
                let from_edge = if reel <= mid { reel } else { grid.reels - 1 - reel };
                from_edge.min(bottom)
            };

            // V and inverted V
            let v: Vec<u8> = (0..grid.reels).map(|r| top + depth(r)).collect();
            let inverted: Vec<u8> = (0..grid.reels).map(|r| bottom - depth(r)).collect();
            shapes.push(LineShape::from_rows(&v, grid.rows));
            shapes.push(LineShape::from_rows(&inverted, grid.rows));

            // Zigzags between the first two and last two rows
            let zig: Vec<u8> = (0..grid.reels).map(|r| if r % 2 == 0 { top } else { top + 1 }).collect();
            let zag: Vec<u8> = (0..grid.reels).map(|r| if r % 2 == 0 { bottom } else { bottom - 1 }).collect();
            shapes.push(LineShape::from_rows(&zig, grid.rows));
            shapes.push(LineShape::from_rows(&zag, grid.rows));
        }

        Self { shapes }
    }

    pub fn get(&self, line_key: usize) -> Option<&LineShape> {
        self.shapes.get(line_key)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineShape> {
        self.shapes.iter()
    }
}

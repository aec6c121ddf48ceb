//! Win/Scatter interpreter
//!
//! Turns backend payline data into winning cells. The backend already decided
//! which lines won and how much; this only maps line keys onto the grid.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::error::InterpretIssue;
use crate::grid::CellPos;
use crate::paytable::LineShapeTable;
use crate::spin::SpinResult;
use crate::symbols::{SCATTER_TRIGGER_COUNT, SymbolRoles};

/// One resolved winning line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineWin {
    pub line_key: usize,
    /// Winning cells left-to-right with the symbol at each
    pub cells: Vec<(CellPos, u32)>,
    pub win_amount: f64,
}

/// Interpreted spin
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    /// Union of the winning cells of every line
    pub winning_cells: BTreeSet<CellPos>,
    pub line_wins: Vec<LineWin>,
    /// Sum of the win amounts of the lines that resolved
    pub total_win: f64,
    pub scatter_cells: Vec<CellPos>,
    /// Skipped paylines and cells
    pub issues: Vec<InterpretIssue>,
}

impl Interpretation {
    pub fn is_win(&self) -> bool {
        !self.winning_cells.is_empty()
    }

    pub fn scatter_count(&self) -> usize {
        self.scatter_cells.len()
    }

    pub fn triggers_bonus(&self) -> bool {
        self.scatter_cells.len() >= SCATTER_TRIGGER_COUNT
    }

    pub fn is_winning(&self, pos: CellPos) -> bool {
        self.winning_cells.contains(&pos)
    }
}

#[derive(Debug, Clone)]
pub struct WinInterpreter {
    grid: GridSpec,
    roles: SymbolRoles,
    shapes: LineShapeTable,
}

impl WinInterpreter {
    pub fn new(grid: GridSpec, roles: SymbolRoles, shapes: LineShapeTable) -> Self {
        Self { grid, roles, shapes }
    }

    pub fn interpret(&self, result: &SpinResult) -> Interpretation {
        let mut out = Interpretation::default();
        let symbol_at = |pos: CellPos| -> Option<u32> {
            result
                .symbol_grid
                .get(pos.col as usize)?
                .get(pos.row as usize)
                .copied()
        };

        for (index, payline) in result.paylines.iter().enumerate() {
            let Some(shape) = self.shapes.get(payline.line_key) else {
                let issue = InterpretIssue::UnknownLineKey {
                    index,
                    line_key: payline.line_key,
                    table_len: self.shapes.len(),
                };
                log::warn!("[Interpret] {issue}");
                out.issues.push(issue);
                continue;
            };

            let positions = shape.positions();
            if payline.symbol_count > positions.len() {
                let issue = InterpretIssue::SymbolCountOverflow {
                    index,
                    line_key: payline.line_key,
                    symbol_count: payline.symbol_count,
                    available: positions.len(),
                };
                log::warn!("[Interpret] {issue}");
                out.issues.push(issue);
            }

            let mut cells = Vec::with_capacity(payline.symbol_count);
            for pos in positions.into_iter().take(payline.symbol_count) {
                match symbol_at(pos) {
                    Some(symbol) => cells.push((pos, symbol)),
                    None => {
                        let issue = InterpretIssue::MissingCell {
                            index,
                            col: pos.col,
                            row: pos.row,
                        };
                        log::warn!("[Interpret] {issue}");
                        out.issues.push(issue);
                    }
                }
            }

            out.winning_cells.extend(cells.iter().map(|(pos, _)| *pos));
            out.total_win += payline.win_amount;
            out.line_wins.push(LineWin {
                line_key: payline.line_key,
                cells,
                win_amount: payline.win_amount,
            });
        }

        for (col, reel) in result.symbol_grid.iter().enumerate() {
            for (row, &symbol) in reel.iter().enumerate() {
                if !self.roles.is_scatter(symbol) {
                    continue;
                }
                match (u8::try_from(col), u8::try_from(row)) {
                    (Ok(c), Ok(r)) if self.grid.contains(c, r) => {
                        out.scatter_cells.push(CellPos::new(c, r));
                    }
                    _ => {
                        log::warn!("[Interpret] scatter at ({col}, {row}) lies outside the grid, ignored");
                    }
                }
            }
        }

        out
    }
}

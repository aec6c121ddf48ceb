//! Spin result — the backend's already-computed outcome of one spin

use serde::{Deserialize, Serialize};

/// One winning payline as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaylineWin {
    /// Index into the line-shape table
    pub line_key: usize,
    /// Number of matching symbols, counted from the left
    pub symbol_count: usize,
    /// Win amount for this line
    pub win_amount: f64,
}

/// Per-spin free-spin progress item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSpinItem {
    /// Bonus win accumulated up to and including this spin
    pub sub_total_win: f64,
}

/// Free-spin data attached by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FreeSpinInfo {
    /// Free spins awarded, when the backend decides the award
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub items: Vec<FreeSpinItem>,
}

impl FreeSpinInfo {
    /// Latest running bonus total, if any item was supplied
    pub fn latest_sub_total(&self) -> Option<f64> {
        self.items.last().map(|item| item.sub_total_win)
    }
}

/// Complete backend spin result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinResult {
    /// Symbol values, reels × rows
    pub symbol_grid: Vec<Vec<u32>>,
    #[serde(default)]
    pub paylines: Vec<PaylineWin>,
    /// Bet placed
    #[serde(default)]
    pub bet: f64,
    #[serde(default)]
    pub free_spin_info: Option<FreeSpinInfo>,
}

impl SpinResult {
    pub fn new(symbol_grid: Vec<Vec<u32>>, bet: f64) -> Self {
        Self {
            symbol_grid,
            paylines: Vec::new(),
            bet,
            free_spin_info: None,
        }
    }

    /// Builder: add a winning payline
    pub fn with_payline(mut self, line_key: usize, symbol_count: usize, win_amount: f64) -> Self {
        self.paylines.push(PaylineWin {
            line_key,
            symbol_count,
            win_amount,
        });
        self
    }

    /// Builder: attach free-spin data
    pub fn with_free_spin_info(mut self, info: FreeSpinInfo) -> Self {
        self.free_spin_info = Some(info);
        self
    }

    /// Decode a backend JSON payload
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Backend-supplied free-spin award
    pub fn awarded_free_spins(&self) -> Option<u32> {
        self.free_spin_info.as_ref().and_then(|info| info.count)
    }
}

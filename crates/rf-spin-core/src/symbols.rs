//! Symbol roles
//!
//! The core does not know paytable values. It only needs to recognise the
//! scatter sentinel and the wild values that can become sticky.

use serde::{Deserialize, Serialize};

/// Scatter cells needed to trigger the bonus
pub const SCATTER_TRIGGER_COUNT: usize = 3;

/// Which symbol values carry special meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolRoles {
    /// Scatter sentinel value
    pub scatter: u32,
    /// Wild values
    pub wilds: Vec<u32>,
}

impl SymbolRoles {
    pub fn is_scatter(&self, symbol: u32) -> bool {
        symbol == self.scatter
    }

    pub fn is_wild(&self, symbol: u32) -> bool {
        self.wilds.contains(&symbol)
    }
}

impl Default for SymbolRoles {
    fn default() -> Self {
        Self {
            scatter: 0,
            wilds: vec![10],
        }
    }
}

//! Stage — what just happened in the round
//!
//! A Stage is NOT a command. It is emitted after the core has changed its own
//! state, so observers can follow along without the core depending on them.

use serde::{Deserialize, Serialize};

/// Which autoplay sequence a notification refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoplayKind {
    /// Player-requested repeated spins in base mode
    Normal,
    /// Backend-awarded spins while bonus mode is active
    FreeSpins,
}

impl AutoplayKind {
    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "autoplay",
            Self::FreeSpins => "free_spins",
        }
    }
}

/// Canonical round notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// A spin was requested from the backend
    SpinStarted {
        /// Monotonic spin sequence number (1-based)
        spin_index: u64,
        /// Bet placed for this spin
        bet: f64,
        /// Whether this spin is a free spin
        #[serde(default)]
        free_spin: bool,
    },

    /// Every reel finished its drop animation
    ReelsStopped {
        /// Spin sequence number
        spin_index: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // WIN DISPLAY
    // ═══════════════════════════════════════════════════════════════════════
    /// Winning cells switched to their win presentation
    WinDisplayStarted {
        /// Total win of the spin
        win_amount: f64,
        /// Number of winning paylines
        line_count: usize,
    },

    /// Win presentation from the previous spin was cleared
    WinDisplayStopped,

    // ═══════════════════════════════════════════════════════════════════════
    // BONUS
    // ═══════════════════════════════════════════════════════════════════════
    /// Enough scatters landed to trigger the bonus
    ScatterDetected {
        /// Number of scatter cells on the grid
        scatter_count: usize,
    },

    /// Bonus mode entered with an awarded number of free spins
    BonusActivated {
        /// Free spins awarded
        free_spins: u32,
    },

    /// More free spins were added while bonus mode was already active
    FreeSpinsRetriggered {
        /// Spins added
        added: u32,
        /// Spins remaining after the addition
        remaining: u32,
    },

    /// An autoplay sequence stopped
    AutoplayStopped {
        /// Which sequence stopped
        kind: AutoplayKind,
        /// Spins that were still pending when it stopped
        #[serde(default)]
        spins_remaining: u32,
    },

    /// Bonus mode ended
    BonusFinished {
        /// Total won across the bonus
        #[serde(default)]
        total_win: f64,
    },
}

impl Stage {
    /// Get stage type name (matches the serde tag)
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::SpinStarted { .. } => "spin_started",
            Stage::ReelsStopped { .. } => "reels_stopped",
            Stage::WinDisplayStarted { .. } => "win_display_started",
            Stage::WinDisplayStopped => "win_display_stopped",
            Stage::ScatterDetected { .. } => "scatter_detected",
            Stage::BonusActivated { .. } => "bonus_activated",
            Stage::FreeSpinsRetriggered { .. } => "free_spins_retriggered",
            Stage::AutoplayStopped { .. } => "autoplay_stopped",
            Stage::BonusFinished { .. } => "bonus_finished",
        }
    }
}

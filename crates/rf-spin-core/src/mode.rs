//! Game mode flags
//!
//! One instance lives in the engine runtime. Only the sequencers mutate it;
//! hosts get a read-only view through [`crate::SpinEngine::mode`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMode {
    /// Bonus (free-spin) mode active
    pub is_bonus: bool,
    /// Scatter bonus sequence in progress
    pub is_scatter: bool,
    /// Player turbo toggle
    pub is_turbo: bool,
    /// Any autoplay sequence running
    pub is_auto_playing: bool,
    /// The running autoplay is the free-spin sequence
    pub is_free_spin_autoplay: bool,
    /// Win-amount dialog visible
    pub is_showing_win_dialog: bool,
    /// Reels dropping
    pub is_reel_spinning: bool,
    /// Free spins awarded for the current bonus, as shown to the player
    pub free_spins_awarded: u32,
}

impl GameMode {
    /// Something the player has to wait for before the next autoplay spin
    pub fn blocks_autoplay(&self) -> bool {
        self.is_showing_win_dialog || self.is_scatter
    }
}

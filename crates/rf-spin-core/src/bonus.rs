//! Scatter Bonus Sequencer
//!
//! ```text
//! Inactive → Detected ─(win dialog closed)→ RevealWindow ─(timer)→ AwaitingPlayerAck
//!                                                                        │
//!                        BonusActive ◄── ComputeAward ◄─(dismissed)──────┘
//! ```
//!
//! A failed reveal dialog goes straight to `ComputeAward`. Scatters landing
//! while the bonus is already running retrigger it and run the same sequence.

use rf_stage::Stage;

use crate::collab::SoundEffect;
use crate::runtime::{Runtime, Wakeup};
use crate::scheduler::TimerId;
use crate::symbols::SCATTER_TRIGGER_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusPhase {
    Inactive,
    Detected,
    RevealWindow,
    AwaitingPlayerAck,
    ComputeAward,
    BonusActive,
}

/// Signals for the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BonusSignal {
    /// The spin phase machine may go back to idle
    HandoffAccepted,
    /// Bonus mode entered with this many free spins
    Activated(u32),
    /// Running bonus extended by this many free spins
    Retriggered(u32),
}

/// Free spins for a scatter count.
///
/// The backend's count wins when it sends one. Otherwise the award table is
/// indexed from the trigger count up, clamped to its last entry.
pub fn award_for(scatter_count: usize, backend_count: Option<u32>, table: &[u32]) -> u32 {
    if let Some(count) = backend_count {
        return count;
    }
    let Some(last) = table.len().checked_sub(1) else {
        return 0;
    };
    let index = scatter_count.saturating_sub(SCATTER_TRIGGER_COUNT).min(last);
    table[index]
}

#[derive(Debug)]
pub struct ScatterBonusSequencer {
    phase: BonusPhase,
    scatter_count: usize,
    award: u32,
    retrigger: bool,
    reveal_timer: Option<TimerId>,
}

impl Default for ScatterBonusSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScatterBonusSequencer {
    pub fn new() -> Self {
        Self {
            phase: BonusPhase::Inactive,
            scatter_count: 0,
            award: 0,
            retrigger: false,
            reveal_timer: None,
        }
    }

    pub fn phase(&self) -> BonusPhase {
        self.phase
    }

    /// Free spins of the sequence in progress (or the last one)
    pub fn award(&self) -> u32 {
        self.award
    }

    pub fn scatter_count(&self) -> usize {
        self.scatter_count
    }

    pub fn is_retrigger(&self) -> bool {
        self.retrigger
    }

    pub(crate) fn detect(
        &mut self,
        rt: &mut Runtime,
        scatter_count: usize,
        backend_count: Option<u32>,
    ) -> Vec<BonusSignal> {
        if !matches!(self.phase, BonusPhase::Inactive | BonusPhase::BonusActive) {
            log::debug!("[ScatterBonus] scatter ignored, sequence already in {:?}", self.phase);
            return Vec::new();
        }

        self.retrigger = rt.mode.is_bonus;
        self.scatter_count = scatter_count;
        self.award = award_for(scatter_count, backend_count, &rt.config.award_table);
        self.phase = BonusPhase::Detected;
        log::info!(
            "[ScatterBonus] {} scatters detected, {} free spins{}",
            scatter_count,
            self.award,
            if self.retrigger { " (retrigger)" } else { "" }
        );

        if rt.mode.is_showing_win_dialog {
            log::debug!("[ScatterBonus] waiting for the win dialog to close");
            return Vec::new();
        }
        self.enter_reveal(rt)
    }

    pub(crate) fn on_win_dialog_complete(&mut self, rt: &mut Runtime) -> Vec<BonusSignal> {
        if self.phase != BonusPhase::Detected {
            return Vec::new();
        }
        self.enter_reveal(rt)
    }

    fn enter_reveal(&mut self, rt: &mut Runtime) -> Vec<BonusSignal> {
        self.phase = BonusPhase::RevealWindow;
        // Not turbo-adjusted
        let delay = rt.config.timing.scatter_reveal_ms;
        self.reveal_timer = Some(rt.scheduler.schedule(delay, Wakeup::ScatterReveal));
        vec![BonusSignal::HandoffAccepted]
    }

    pub(crate) fn on_reveal_elapsed(&mut self, rt: &mut Runtime, id: TimerId) -> Vec<BonusSignal> {
        if self.phase != BonusPhase::RevealWindow || self.reveal_timer != Some(id) {
            log::debug!("[ScatterBonus] stale reveal timer ignored");
            return Vec::new();
        }
        self.reveal_timer = None;

        match rt.collab.dialogs.show_scatter_reveal(self.award) {
            Ok(()) => {
                self.phase = BonusPhase::AwaitingPlayerAck;
                Vec::new()
            }
            Err(err) => {
                log::warn!("[ScatterBonus] {err}, skipping the reveal");
                self.compute_award(rt)
            }
        }
    }

    pub(crate) fn on_reveal_dismissed(&mut self, rt: &mut Runtime) -> Vec<BonusSignal> {
        if self.phase != BonusPhase::AwaitingPlayerAck {
            log::debug!("[ScatterBonus] reveal dismissal ignored in {:?}", self.phase);
            return Vec::new();
        }
        self.compute_award(rt)
    }

    fn compute_award(&mut self, rt: &mut Runtime) -> Vec<BonusSignal> {
        self.phase = BonusPhase::ComputeAward;
        let award = self.award;
        rt.mode.is_scatter = false;

        if self.retrigger {
            rt.mode.free_spins_awarded = rt.mode.free_spins_awarded.saturating_add(award);
            self.phase = BonusPhase::BonusActive;
            log::info!("[ScatterBonus] bonus extended by {award} free spins");
            return vec![BonusSignal::Retriggered(award)];
        }

        rt.mode.is_bonus = true;
        rt.mode.free_spins_awarded = award;
        self.phase = BonusPhase::BonusActive;
        rt.sound(SoundEffect::BonusStart);
        rt.emit(Stage::BonusActivated { free_spins: award });
        log::info!("[ScatterBonus] bonus started with {award} free spins");
        vec![BonusSignal::Activated(award)]
    }

    /// Back to `Inactive`, cancelling a pending reveal
    pub(crate) fn reset(&mut self, rt: &mut Runtime) {
        if let Some(id) = self.reveal_timer.take() {
            rt.scheduler.cancel(id);
        }
        self.phase = BonusPhase::Inactive;
        self.scatter_count = 0;
        self.award = 0;
        self.retrigger = false;
    }
}

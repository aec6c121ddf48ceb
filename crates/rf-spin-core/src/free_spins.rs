//! Free-spin autoplay
//!
//! Runs the awarded free spins through an [`AutoplaySession`], tracks the
//! bonus win and drives the congrats dialog at the end.

use rf_stage::{AutoplayKind, Stage};

use crate::autoplay::{AutoplayAction, AutoplaySession};
use crate::runtime::Runtime;

#[derive(Debug, Clone)]
pub struct FreeSpinAutoplay {
    pub(crate) session: AutoplaySession,
    bonus_win: f64,
    spins_played: u32,
    awaiting_congrats: bool,
}

impl Default for FreeSpinAutoplay {
    fn default() -> Self {
        Self::new()
    }
}

impl FreeSpinAutoplay {
    pub fn new() -> Self {
        Self {
            session: AutoplaySession::new(AutoplayKind::FreeSpins),
            bonus_win: 0.0,
            spins_played: 0,
            awaiting_congrats: false,
        }
    }

    pub fn session(&self) -> &AutoplaySession {
        &self.session
    }

    /// Accumulated win of the current bonus
    pub fn bonus_win(&self) -> f64 {
        self.bonus_win
    }

    pub fn spins_played(&self) -> u32 {
        self.spins_played
    }

    pub fn is_awaiting_congrats(&self) -> bool {
        self.awaiting_congrats
    }

    pub(crate) fn start(&mut self, rt: &mut Runtime, award: u32) -> AutoplayAction {
        self.bonus_win = 0.0;
        self.spins_played = 0;
        self.awaiting_congrats = false;
        rt.mode.is_free_spin_autoplay = true;
        self.session.start(rt, award)
    }

    pub(crate) fn retrigger(&mut self, rt: &mut Runtime, added: u32) {
        self.session.add_spins(added);
        rt.emit(Stage::FreeSpinsRetriggered {
            added,
            remaining: self.session.spins_remaining(),
        });
        self.session.resume(rt);
    }

    /// Book one settled free spin. The backend's running total wins when present.
    pub(crate) fn record_spin(&mut self, total_win: f64, bonus_sub_total: Option<f64>) {
        self.spins_played += 1;
        self.bonus_win = bonus_sub_total.unwrap_or(self.bonus_win + total_win);
    }

    pub(crate) fn stop(&mut self, rt: &mut Runtime) -> bool {
        self.session.stop(rt)
    }

    /// Show the congrats dialog. False when it could not be shown.
    pub(crate) fn begin_congrats(&mut self, rt: &mut Runtime) -> bool {
        match rt.collab.dialogs.show_congrats(self.bonus_win) {
            Ok(()) => {
                self.awaiting_congrats = true;
                true
            }
            Err(err) => {
                log::warn!("[free_spins] {err}, ending bonus without congrats");
                false
            }
        }
    }

    pub(crate) fn on_congrats_dismissed(&mut self) -> bool {
        std::mem::take(&mut self.awaiting_congrats)
    }

    pub(crate) fn reset(&mut self) {
        self.bonus_win = 0.0;
        self.spins_played = 0;
        self.awaiting_congrats = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_record_spin_prefers_backend_total() {
        let mut free = FreeSpinAutoplay::new();
        free.record_spin(2.0, None);
        free.record_spin(3.0, None);
        assert_relative_eq!(free.bonus_win(), 5.0);

        free.record_spin(1.0, Some(12.5));
        assert_relative_eq!(free.bonus_win(), 12.5);
        assert_eq!(free.spins_played(), 3);
    }
}

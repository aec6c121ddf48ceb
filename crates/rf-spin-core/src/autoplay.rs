//! Autoplay session
//!
//! One iteration per spin:
//!
//! ```text
//! iterate ─► RequestSpin ─► (reels stopped) ─► (win lines resolved) ─► gap timer ─► iterate
//!    │
//!    ├─ win dialog / scatter sequence visible → suspended until resumed
//!    └─ no spins left (or bonus over)         → Finished
//! ```
//!
//! The same session drives the player's normal autoplay and the free-spin
//! sequence. [`NormalAutoplay`] wraps it for base mode; the free-spin wrapper
//! lives in [`crate::free_spins`].

use rf_stage::{AutoplayKind, Stage};

use crate::runtime::{Runtime, Wakeup};
use crate::scheduler::TimerId;

/// What the engine should do after an autoplay step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AutoplayAction {
    /// Nothing right now
    Wait,
    /// Start the next spin
    RequestSpin,
    /// Sequence is over; stop it
    Finished,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SESSION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct AutoplaySession {
    kind: AutoplayKind,
    spins_remaining: u32,
    waiting_for_reels_stop: bool,
    waiting_for_win_lines: bool,
    triggered: bool,
    suspended: bool,
    timer: Option<TimerId>,
}

impl AutoplaySession {
    pub fn new(kind: AutoplayKind) -> Self {
        Self {
            kind,
            spins_remaining: 0,
            waiting_for_reels_stop: false,
            waiting_for_win_lines: false,
            triggered: false,
            suspended: false,
            timer: None,
        }
    }

    pub fn kind(&self) -> AutoplayKind {
        self.kind
    }

    pub fn spins_remaining(&self) -> u32 {
        self.spins_remaining
    }

    pub fn is_active(&self) -> bool {
        self.triggered
    }

    pub fn is_waiting_for_reels_stop(&self) -> bool {
        self.waiting_for_reels_stop
    }

    pub fn is_waiting_for_win_lines(&self) -> bool {
        self.waiting_for_win_lines
    }

    /// Held back by a dialog or the scatter sequence
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn has_pending_iteration(&self) -> bool {
        self.timer.is_some()
    }

    pub(crate) fn start(&mut self, rt: &mut Runtime, count: u32) -> AutoplayAction {
        self.spins_remaining = count;
        self.triggered = true;
        self.suspended = false;
        self.waiting_for_reels_stop = false;
        self.waiting_for_win_lines = false;

        rt.mode.is_auto_playing = true;
        rt.win_line_cycle_ms = rt.adjust(rt.config.timing.win_line_cycle_ms);
        log::info!("[{}] started with {} spins", self.kind.label(), count);
        self.iterate(rt)
    }

    fn iterate(&mut self, rt: &mut Runtime) -> AutoplayAction {
        if !self.triggered {
            return AutoplayAction::Wait;
        }
        if self.kind == AutoplayKind::FreeSpins && !rt.mode.is_bonus {
            return AutoplayAction::Finished;
        }
        // Checked before the spin count so a retrigger on the last spin still lands
        if rt.mode.blocks_autoplay() {
            log::debug!("[{}] suspended while a dialog is open", self.kind.label());
            self.suspended = true;
            return AutoplayAction::Wait;
        }
        if self.spins_remaining == 0 {
            return AutoplayAction::Finished;
        }

        self.spins_remaining -= 1;
        self.waiting_for_reels_stop = true;
        log::debug!(
            "[{}] spin requested, {} left",
            self.kind.label(),
            self.spins_remaining
        );
        AutoplayAction::RequestSpin
    }

    pub(crate) fn on_timer(&mut self, rt: &mut Runtime, id: TimerId) -> AutoplayAction {
        if self.timer != Some(id) {
            log::debug!("[{}] stale iteration timer ignored", self.kind.label());
            return AutoplayAction::Wait;
        }
        self.timer = None;
        self.iterate(rt)
    }

    /// The spin phase machine refused the spin; give the count back and try again later
    pub(crate) fn spin_rejected(&mut self, rt: &mut Runtime) {
        self.spins_remaining += 1;
        self.waiting_for_reels_stop = false;
        let gap = rt.config.timing.autoplay_gap_ms;
        self.schedule_next(rt, gap);
    }

    pub(crate) fn on_reels_stopped(&mut self) {
        if self.triggered && self.waiting_for_reels_stop {
            self.waiting_for_reels_stop = false;
            self.waiting_for_win_lines = true;
        }
    }

    pub(crate) fn on_win_lines_resolved(&mut self, rt: &mut Runtime) {
        if !self.triggered || !self.waiting_for_win_lines {
            return;
        }
        self.waiting_for_win_lines = false;
        let gap = rt.config.timing.autoplay_gap_ms;
        self.schedule_next(rt, gap);
    }

    /// Pick up again after whatever suspended the session went away
    pub(crate) fn resume(&mut self, rt: &mut Runtime) {
        if self.triggered && self.suspended {
            self.suspended = false;
            let delay = rt.config.timing.dialog_resume_ms;
            self.schedule_next(rt, delay);
        }
    }

    pub(crate) fn add_spins(&mut self, count: u32) {
        self.spins_remaining = self.spins_remaining.saturating_add(count);
    }

    fn schedule_next(&mut self, rt: &mut Runtime, base_ms: u64) {
        if let Some(id) = self.timer.take() {
            rt.scheduler.cancel(id);
        }
        let delay = rt.adjust(base_ms);
        self.timer = Some(rt.scheduler.schedule(delay, Wakeup::AutoplayNext(self.kind)));
    }

    /// Stop the session. Returns false if it was not running.
    pub(crate) fn stop(&mut self, rt: &mut Runtime) -> bool {
        if !self.triggered {
            return false;
        }
        if let Some(id) = self.timer.take() {
            rt.scheduler.cancel(id);
        }

        let spins_remaining = self.spins_remaining;
        self.triggered = false;
        self.suspended = false;
        self.waiting_for_reels_stop = false;
        self.waiting_for_win_lines = false;
        self.spins_remaining = 0;

        rt.mode.is_auto_playing = false;
        if self.kind == AutoplayKind::FreeSpins {
            rt.mode.is_free_spin_autoplay = false;
        }
        rt.restore_win_line_baseline();
        rt.emit(Stage::AutoplayStopped {
            kind: self.kind,
            spins_remaining,
        });
        log::info!(
            "[{}] stopped with {} spins left",
            self.kind.label(),
            spins_remaining
        );
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NORMAL AUTOPLAY
// ═══════════════════════════════════════════════════════════════════════════════

/// Player-requested autoplay in base mode
#[derive(Debug, Clone)]
pub struct NormalAutoplay {
    pub(crate) session: AutoplaySession,
}

impl Default for NormalAutoplay {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalAutoplay {
    pub fn new() -> Self {
        Self {
            session: AutoplaySession::new(AutoplayKind::Normal),
        }
    }

    pub fn session(&self) -> &AutoplaySession {
        &self.session
    }

    /// Start `count` spins. `None` if autoplay cannot start in the current mode.
    pub(crate) fn start(&mut self, rt: &mut Runtime, count: u32) -> Option<AutoplayAction> {
        if count == 0 || rt.mode.is_bonus || rt.mode.is_scatter || rt.mode.is_auto_playing {
            log::debug!("[autoplay] start of {count} spins refused");
            return None;
        }
        Some(self.session.start(rt, count))
    }

    pub(crate) fn stop(&mut self, rt: &mut Runtime) -> bool {
        self.session.stop(rt)
    }
}

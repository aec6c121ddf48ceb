//! Spin Engine — wires the sequencers together
//!
//! Single-threaded and event driven. Every inbound signal (player command,
//! collaborator reply, elapsed time) runs to completion before the next one;
//! nothing inside the engine blocks or sleeps.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use rf_stage::{AutoplayKind, Stage};

use crate::autoplay::{AutoplayAction, AutoplaySession, NormalAutoplay};
use crate::bonus::{BonusPhase, BonusSignal, ScatterBonusSequencer};
use crate::collab::Collaborators;
use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::free_spins::FreeSpinAutoplay;
use crate::grid::GridState;
use crate::interpret::Interpretation;
use crate::mode::GameMode;
use crate::phase::{SettleOutcome, SpinPhase, SpinPhaseMachine, SpinSignal};
use crate::runtime::{Runtime, Wakeup};
use crate::scheduler::TimerId;
use crate::spin::SpinResult;
use crate::sticky::StickyWildRegistry;

/// Inbound signals from the backend client, the renderer, dialogs and the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Input {
    /// Backend answered a spin request
    SpinResult(SpinResult),
    /// One reel finished its drop
    ReelStopped(u8),
    /// Win-line cycle finished
    WinLinesResolved,
    /// Win-amount dialog closed
    WinDialogComplete,
    /// Player dismissed the scatter reveal
    ScatterRevealDismissed,
    /// Player dismissed the end-of-bonus summary
    CongratsDismissed,
    /// Host switched bonus mode off
    BonusModeOff,
    /// Host asked for a free-spin state reset
    ResetFreeSpinState,
}

/// Engine shared with other threads of the host
pub type SharedEngine = Arc<Mutex<SpinEngine>>;

/// Spin Resolution & Bonus Sequencing Engine
pub struct SpinEngine {
    rt: Runtime,
    spin: SpinPhaseMachine,
    bonus: ScatterBonusSequencer,
    free_spins: FreeSpinAutoplay,
    autoplay: NormalAutoplay,
}

impl SpinEngine {
    /// Validate `config` and build an idle engine
    pub fn new(config: EngineConfig, collab: Collaborators) -> Result<Self, ConfigError> {
        config.validate()?;
        let spin = SpinPhaseMachine::new(&config);
        log::info!(
            "[SpinEngine] ready: {}x{} grid, {} line shapes",
            config.grid.reels,
            config.grid.rows,
            config.line_shapes.len()
        );
        Ok(Self {
            rt: Runtime::new(config, collab),
            spin,
            bonus: ScatterBonusSequencer::new(),
            free_spins: FreeSpinAutoplay::new(),
            autoplay: NormalAutoplay::new(),
        })
    }

    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PLAYER COMMANDS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Manual spin. Refused during autoplay, bonus sequences and mid-spin.
    pub fn spin(&mut self) -> bool {
        let mode = &self.rt.mode;
        if mode.is_auto_playing || mode.is_bonus || mode.is_scatter {
            log::debug!("[SpinEngine] manual spin refused in current mode");
            return false;
        }
        self.spin.begin(&mut self.rt, false)
    }

    /// Set the bet for the following spins. Non-positive bets are refused.
    pub fn set_bet(&mut self, bet: f64) -> bool {
        if !(bet.is_finite() && bet > 0.0) {
            log::warn!("[SpinEngine] bet {bet} refused");
            return false;
        }
        self.rt.bet = bet;
        true
    }

    pub fn set_turbo(&mut self, is_turbo: bool) {
        self.rt.mode.is_turbo = is_turbo;
        if self.rt.mode.is_auto_playing {
            self.rt.win_line_cycle_ms = self.rt.adjust(self.rt.config.timing.win_line_cycle_ms);
        }
    }

    /// Start normal autoplay for `count` spins. Only from idle base mode.
    pub fn start_autoplay(&mut self, count: u32) -> bool {
        if self.spin.phase() != SpinPhase::Idle {
            log::debug!("[SpinEngine] autoplay refused mid-spin");
            return false;
        }
        match self.autoplay.start(&mut self.rt, count) {
            Some(action) => {
                self.run_autoplay_action(AutoplayKind::Normal, action);
                true
            }
            None => false,
        }
    }

    /// Stop normal autoplay. Safe to call repeatedly.
    pub fn stop_autoplay(&mut self) -> bool {
        self.autoplay.stop(&mut self.rt)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INBOUND SIGNALS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn handle(&mut self, input: Input) {
        match input {
            Input::SpinResult(result) => self.spin.on_result(&mut self.rt, result),
            Input::ReelStopped(reel) => {
                let signals = self.spin.on_reel_stopped(&mut self.rt, reel);
                self.dispatch_spin_signals(signals);
            }
            Input::WinLinesResolved => {
                if let Some(signal) = self.spin.on_win_lines_resolved() {
                    self.dispatch_spin_signals(vec![signal]);
                }
            }
            Input::WinDialogComplete => self.on_win_dialog_complete(),
            Input::ScatterRevealDismissed => {
                let signals = self.bonus.on_reveal_dismissed(&mut self.rt);
                self.dispatch_bonus_signals(signals);
            }
            Input::CongratsDismissed => {
                if self.free_spins.on_congrats_dismissed() {
                    self.end_bonus("congrats dismissed");
                } else {
                    log::debug!("[SpinEngine] congrats dismissal with no dialog open ignored");
                }
            }
            Input::BonusModeOff => self.force_end_bonus("bonus mode off"),
            Input::ResetFreeSpinState => self.force_end_bonus("free-spin reset"),
        }
    }

    /// Move the virtual clock forward, firing every timer that comes due
    pub fn advance(&mut self, elapsed_ms: u64) {
        let target = self.rt.scheduler.now().saturating_add(elapsed_ms);
        while let Some((id, wakeup)) = self.rt.scheduler.pop_due(target) {
            self.on_wakeup(id, wakeup);
        }
        self.rt.scheduler.advance_to(target);
    }

    fn on_wakeup(&mut self, id: TimerId, wakeup: Wakeup) {
        match wakeup {
            Wakeup::ScatterReveal => {
                let signals = self.bonus.on_reveal_elapsed(&mut self.rt, id);
                self.dispatch_bonus_signals(signals);
            }
            Wakeup::AutoplayNext(kind) => {
                let action = match kind {
                    AutoplayKind::Normal => self.autoplay.session.on_timer(&mut self.rt, id),
                    AutoplayKind::FreeSpins => self.free_spins.session.on_timer(&mut self.rt, id),
                };
                self.run_autoplay_action(kind, action);
            }
            Wakeup::AssetRetry {
                spin_index,
                pos,
                clip,
                attempt,
            } => self
                .spin
                .on_asset_retry(&mut self.rt, spin_index, pos, clip, attempt),
        }
    }

    fn on_win_dialog_complete(&mut self) {
        if !self.rt.mode.is_showing_win_dialog {
            log::debug!("[SpinEngine] win dialog completion with no dialog open ignored");
            return;
        }
        self.rt.mode.is_showing_win_dialog = false;

        let signals = self.bonus.on_win_dialog_complete(&mut self.rt);
        self.dispatch_bonus_signals(signals);
        self.autoplay.session.resume(&mut self.rt);
        self.free_spins.session.resume(&mut self.rt);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ROUTING
    // ═══════════════════════════════════════════════════════════════════════════

    fn dispatch_spin_signals(&mut self, signals: Vec<SpinSignal>) {
        for signal in signals {
            match signal {
                SpinSignal::ReelsStopped => {
                    self.autoplay.session.on_reels_stopped();
                    self.free_spins.session.on_reels_stopped();
                }
                SpinSignal::Settled {
                    total_win,
                    free_spin,
                    bonus_sub_total,
                } => {
                    if free_spin {
                        self.free_spins.record_spin(total_win, bonus_sub_total);
                    }
                }
                SpinSignal::ScatterDetected {
                    scatter_count,
                    awarded,
                } => {
                    if self.autoplay.stop(&mut self.rt) {
                        log::info!("[SpinEngine] autoplay stopped by scatter trigger");
                    }
                    let signals = self.bonus.detect(&mut self.rt, scatter_count, awarded);
                    self.dispatch_bonus_signals(signals);
                }
                SpinSignal::WinLinesResolved => {
                    self.autoplay.session.on_win_lines_resolved(&mut self.rt);
                    self.free_spins.session.on_win_lines_resolved(&mut self.rt);
                }
            }
        }
    }

    fn dispatch_bonus_signals(&mut self, signals: Vec<BonusSignal>) {
        for signal in signals {
            match signal {
                BonusSignal::HandoffAccepted => self.spin.release_handoff(),
                BonusSignal::Activated(award) => {
                    let action = self.free_spins.start(&mut self.rt, award);
                    self.run_autoplay_action(AutoplayKind::FreeSpins, action);
                }
                BonusSignal::Retriggered(added) => self.free_spins.retrigger(&mut self.rt, added),
            }
        }
    }

    fn run_autoplay_action(&mut self, kind: AutoplayKind, action: AutoplayAction) {
        match action {
            AutoplayAction::Wait => {}
            AutoplayAction::RequestSpin => {
                let free_spin = kind == AutoplayKind::FreeSpins;
                if !self.spin.begin(&mut self.rt, free_spin) {
                    match kind {
                        AutoplayKind::Normal => self.autoplay.session.spin_rejected(&mut self.rt),
                        AutoplayKind::FreeSpins => {
                            self.free_spins.session.spin_rejected(&mut self.rt)
                        }
                    }
                }
            }
            AutoplayAction::Finished => match kind {
                AutoplayKind::Normal => {
                    self.autoplay.stop(&mut self.rt);
                }
                AutoplayKind::FreeSpins => self.finish_free_spins(),
            },
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BONUS END
    // ═══════════════════════════════════════════════════════════════════════════

    fn finish_free_spins(&mut self) {
        self.free_spins.stop(&mut self.rt);
        if !self.rt.mode.is_bonus {
            return;
        }
        if !self.free_spins.begin_congrats(&mut self.rt) {
            self.end_bonus("congrats unavailable");
        }
    }

    fn force_end_bonus(&mut self, reason: &str) {
        self.free_spins.stop(&mut self.rt);
        self.end_bonus(reason);
    }

    fn end_bonus(&mut self, reason: &str) {
        let total_win = self.free_spins.bonus_win();
        let was_bonus = self.rt.mode.is_bonus;

        self.free_spins.reset();
        self.bonus.reset(&mut self.rt);
        self.spin.release_handoff();

        let removed = self.rt.sticky.clear_all();
        self.rt.grid.clear_sticky();
        self.rt.collab.renderer.clear_sticky_overlays();

        self.rt.mode.is_bonus = false;
        self.rt.mode.is_scatter = false;
        self.rt.mode.free_spins_awarded = 0;

        if was_bonus {
            self.rt.emit(Stage::BonusFinished { total_win });
            log::info!(
                "[SpinEngine] bonus finished ({reason}): total win {total_win}, {removed} sticky wilds cleared"
            );
        } else {
            log::debug!("[SpinEngine] bonus state reset ({reason}) outside bonus mode");
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &EngineConfig {
        &self.rt.config
    }

    pub fn mode(&self) -> &GameMode {
        &self.rt.mode
    }

    pub fn bet(&self) -> f64 {
        self.rt.bet
    }

    pub fn grid(&self) -> &GridState {
        &self.rt.grid
    }

    pub fn sticky_wilds(&self) -> &StickyWildRegistry {
        &self.rt.sticky
    }

    pub fn spin_phase(&self) -> SpinPhase {
        self.spin.phase()
    }

    pub fn spin_index(&self) -> u64 {
        self.spin.spin_index()
    }

    /// Outcome of the last settled spin
    pub fn last_settle(&self) -> Option<SettleOutcome> {
        self.spin.last_outcome()
    }

    pub fn interpretation(&self) -> &Interpretation {
        self.spin.interpretation()
    }

    pub fn current_result(&self) -> Option<&SpinResult> {
        self.spin.current_result()
    }

    pub fn bonus_phase(&self) -> BonusPhase {
        self.bonus.phase()
    }

    pub fn autoplay(&self) -> &AutoplaySession {
        self.autoplay.session()
    }

    pub fn free_spins(&self) -> &FreeSpinAutoplay {
        &self.free_spins
    }

    /// Current win-line cycle (ms)
    pub fn win_line_cycle_ms(&self) -> u64 {
        self.rt.win_line_cycle_ms
    }

    pub fn now_ms(&self) -> u64 {
        self.rt.scheduler.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.rt.scheduler.pending()
    }
}

//! Spin Phase State Machine
//!
//! Drives one spin from request to settle:
//!
//! ```text
//! Idle → Clearing → AwaitingResult → Dropping → SettlingWins → ScatterCheck
//!                                                                  │
//!                                              Idle ◄──────────────┴──► BonusHandoff
//! ```
//!
//! `Dropping` is the only phase that asks the renderer to drop symbols. Each
//! reel reports back on its own; idle conversion and sticky-wild landing are
//! therefore done per reel, and the phase advances once the barrier is full.

use rf_stage::Stage;

use crate::barrier::{BarrierStep, ReelBarrier};
use crate::collab::{DropPlan, SoundEffect};
use crate::config::EngineConfig;
use crate::grid::{AnimationClip, CellPos, CellVisual, VisualKind};
use crate::interpret::{Interpretation, WinInterpreter};
use crate::retry::Readiness;
use crate::runtime::{Runtime, Wakeup};
use crate::spin::SpinResult;
use crate::sticky::StickyOutcome;
use crate::symbols::SymbolRoles;

/// Reels whose scatters arm the anticipation extension
const ANTICIPATION_REELS: [usize; 2] = [0, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    Idle,
    Clearing,
    AwaitingResult,
    Dropping,
    SettlingWins,
    ScatterCheck,
    BonusHandoff,
}

/// Where the last settled spin ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    Idle,
    BonusHandoff,
}

/// Signals for the other sequencers
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SpinSignal {
    ReelsStopped,
    Settled {
        total_win: f64,
        free_spin: bool,
        bonus_sub_total: Option<f64>,
    },
    ScatterDetected {
        scatter_count: usize,
        awarded: Option<u32>,
    },
    WinLinesResolved,
}

/// Scatter on reel 0 and reel 2 of the incoming grid.
///
/// Reel 1 is deliberately not consulted.
pub fn scatter_anticipation(grid: &[Vec<u32>], roles: &SymbolRoles) -> bool {
    ANTICIPATION_REELS.iter().all(|&reel| {
        grid.get(reel)
            .is_some_and(|symbols| symbols.iter().any(|&s| roles.is_scatter(s)))
    })
}

pub struct SpinPhaseMachine {
    phase: SpinPhase,
    interpreter: WinInterpreter,
    spin_index: u64,
    free_spin: bool,
    current: Option<SpinResult>,
    interpretation: Interpretation,
    anticipation: bool,
    barrier: ReelBarrier,
    win_display_active: bool,
    win_lines_pending: bool,
    last_outcome: Option<SettleOutcome>,
}

impl SpinPhaseMachine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            phase: SpinPhase::Idle,
            interpreter: WinInterpreter::new(
                config.grid,
                config.symbols.clone(),
                config.line_shapes.clone(),
            ),
            spin_index: 0,
            free_spin: false,
            current: None,
            interpretation: Interpretation::default(),
            anticipation: false,
            barrier: ReelBarrier::default(),
            win_display_active: false,
            win_lines_pending: false,
            last_outcome: None,
        }
    }

    pub fn phase(&self) -> SpinPhase {
        self.phase
    }

    pub fn spin_index(&self) -> u64 {
        self.spin_index
    }

    /// Current spin data, held until the next result replaces it
    pub fn current_result(&self) -> Option<&SpinResult> {
        self.current.as_ref()
    }

    pub fn interpretation(&self) -> &Interpretation {
        &self.interpretation
    }

    /// Anticipation armed for the spin being dropped
    pub fn anticipation(&self) -> bool {
        self.anticipation
    }

    pub fn last_outcome(&self) -> Option<SettleOutcome> {
        self.last_outcome
    }

    pub fn is_win_display_active(&self) -> bool {
        self.win_display_active
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CLEARING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Start a spin. Returns false (and does nothing) unless idle.
    pub(crate) fn begin(&mut self, rt: &mut Runtime, free_spin: bool) -> bool {
        if self.phase != SpinPhase::Idle {
            log::debug!("[SpinPhase] spin request ignored in {:?}", self.phase);
            return false;
        }

        self.phase = SpinPhase::Clearing;
        self.clear_previous(rt);

        self.spin_index += 1;
        self.free_spin = free_spin;
        self.anticipation = false;
        self.last_outcome = None;
        self.phase = SpinPhase::AwaitingResult;

        rt.mode.is_reel_spinning = true;
        let bet = rt.bet;
        rt.emit(Stage::SpinStarted {
            spin_index: self.spin_index,
            bet,
            free_spin,
        });
        rt.collab.backend.request_spin(bet);
        true
    }

    fn clear_previous(&mut self, rt: &mut Runtime) {
        if self.win_display_active {
            rt.collab.renderer.hide_win_lines();
            rt.collab.renderer.hide_dim_overlay();
            rt.emit(Stage::WinDisplayStopped);
            self.win_display_active = false;
        }
        self.win_lines_pending = false;

        // Sticky wilds outlive the spin only while the bonus runs
        let keep_sticky = rt.mode.is_bonus;
        for pos in rt.grid.reset_visuals(keep_sticky) {
            rt.collab.renderer.set_cell_visual(pos, VisualKind::Static);
        }
        self.interpretation = Interpretation::default();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DROPPING
    // ═══════════════════════════════════════════════════════════════════════════

    pub(crate) fn on_result(&mut self, rt: &mut Runtime, result: SpinResult) {
        if self.phase != SpinPhase::AwaitingResult {
            log::debug!("[SpinPhase] spin result ignored in {:?}", self.phase);
            return;
        }

        let interpretation = self.interpreter.interpret(&result);
        self.anticipation = scatter_anticipation(&result.symbol_grid, &rt.config.symbols);

        let missing = rt.grid.replace(&result.symbol_grid, &rt.sticky);
        if missing > 0 {
            log::warn!(
                "[SpinPhase] spin #{} grid is missing {} cells, previous symbols kept",
                self.spin_index,
                missing
            );
        }

        let spec = rt.grid.spec();
        let plan = DropPlan {
            spin_index: self.spin_index,
            values: rt.grid.values(),
            reel_durations_ms: rt.config.timing.reel_drop_durations(
                spec.reels,
                rt.mode.is_turbo,
                self.anticipation,
            ),
            suppressed: rt.grid.suppressed(),
            anticipation: self.anticipation,
            animation_speed: rt.animation_speed(),
        };

        self.barrier.reset(spec.reels as usize);
        self.interpretation = interpretation;
        self.current = Some(result);
        self.phase = SpinPhase::Dropping;

        if rt.mode.is_turbo {
            rt.sound(SoundEffect::TurboDrop);
        }
        rt.collab.renderer.drop_grid(&plan);
    }

    pub(crate) fn on_reel_stopped(&mut self, rt: &mut Runtime, reel: u8) -> Vec<SpinSignal> {
        if self.phase != SpinPhase::Dropping {
            log::debug!("[SpinPhase] reel {reel} stop ignored in {:?}", self.phase);
            return Vec::new();
        }
        let complete = match self.barrier.record(reel as usize) {
            BarrierStep::Recorded { complete } => complete,
            BarrierStep::Rejected => {
                log::debug!("[SpinPhase] duplicate or unknown reel {reel} ignored");
                return Vec::new();
            }
        };

        rt.sound(SoundEffect::ReelStop);
        self.land_reel(rt, reel);

        if self.anticipation && reel + 1 == rt.grid.spec().reels {
            self.anticipation = false;
        }
        if !complete {
            return Vec::new();
        }

        rt.mode.is_reel_spinning = false;
        rt.emit(Stage::ReelsStopped {
            spin_index: self.spin_index,
        });

        let mut signals = vec![SpinSignal::ReelsStopped];
        signals.extend(self.settle(rt));
        signals
    }

    /// Sticky-wild landing and idle conversion for one reel
    fn land_reel(&mut self, rt: &mut Runtime, reel: u8) {
        let positions: Vec<CellPos> = rt.grid.reel(reel).collect();
        for pos in positions {
            let Some(cell) = rt.grid.cell(pos).copied() else {
                continue;
            };

            let is_bonus = rt.mode.is_bonus;
            if rt.sticky.add_if_eligible(pos.col, pos.row, cell.symbol, is_bonus) == StickyOutcome::Added {
                if let Some(wild) = rt.sticky.get(pos).copied() {
                    rt.collab.renderer.attach_sticky_overlay(&wild);
                }
                rt.grid.mark_sticky(pos);
                log::debug!("[SpinPhase] sticky wild {} pinned at ({}, {})", cell.symbol, pos.col, pos.row);
            }

            if rt.sticky.has(pos.col, pos.row) || self.interpretation.is_winning(pos) {
                continue;
            }
            self.apply_visual(rt, pos, AnimationClip::Idle, 0);
        }
    }

    /// Switch a cell to an animated visual, retrying while the asset loads
    fn apply_visual(&self, rt: &mut Runtime, pos: CellPos, clip: AnimationClip, attempt: u32) {
        let Some(symbol) = rt.grid.cell(pos).map(|c| c.symbol) else {
            return;
        };
        let policy = rt.config.retry;
        let renderer = &rt.collab.renderer;

        match policy.check(attempt, || renderer.is_animation_ready(clip, symbol)) {
            Readiness::Ready => {
                let speed = rt.animation_speed();
                rt.grid.set_visual(pos, CellVisual::animated(clip));
                rt.collab.renderer.set_cell_visual(pos, clip.kind());
                rt.collab
                    .renderer
                    .play_cell_animation(pos, clip.name(), clip.looped(), speed);
            }
            Readiness::RetryAfter(delay) => {
                rt.scheduler.schedule(
                    delay,
                    Wakeup::AssetRetry {
                        spin_index: self.spin_index,
                        pos,
                        clip,
                        attempt: attempt + 1,
                    },
                );
            }
            Readiness::GiveUp => {
                log::warn!(
                    "[SpinPhase] {} animation for symbol {} at ({}, {}) not ready after {} attempts, keeping static",
                    clip.name(),
                    symbol,
                    pos.col,
                    pos.row,
                    policy.max_attempts
                );
                rt.grid.set_visual(pos, CellVisual::Static);
                rt.collab.renderer.set_cell_visual(pos, VisualKind::Static);
            }
        }
    }

    pub(crate) fn on_asset_retry(
        &mut self,
        rt: &mut Runtime,
        spin_index: u64,
        pos: CellPos,
        clip: AnimationClip,
        attempt: u32,
    ) {
        if spin_index != self.spin_index {
            log::debug!("[SpinPhase] asset retry for stale spin #{spin_index} dropped");
            return;
        }
        let still_wanted = match clip {
            AnimationClip::Idle => {
                !self.interpretation.is_winning(pos) && !rt.sticky.has(pos.col, pos.row)
            }
            AnimationClip::Winning => {
                self.win_display_active && !rt.sticky.has(pos.col, pos.row)
            }
        };
        if still_wanted {
            self.apply_visual(rt, pos, clip, attempt);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SETTLING / SCATTER CHECK
    // ═══════════════════════════════════════════════════════════════════════════

    fn settle(&mut self, rt: &mut Runtime) -> Vec<SpinSignal> {
        self.phase = SpinPhase::SettlingWins;
        let mut signals = Vec::new();

        let bet = self
            .current
            .as_ref()
            .map(|r| r.bet)
            .filter(|&bet| bet > 0.0)
            .unwrap_or(rt.bet);
        let total_win = self.interpretation.total_win;

        if self.interpretation.is_win() {
            // Cells under a sticky overlay stay suppressed
            let cells: Vec<CellPos> = self
                .interpretation
                .winning_cells
                .iter()
                .copied()
                .filter(|pos| !rt.sticky.has(pos.col, pos.row))
                .collect();
            for pos in cells {
                self.apply_visual(rt, pos, AnimationClip::Winning, 0);
            }
            let cycle_ms = rt.win_line_cycle_ms;
            rt.collab.renderer.show_dim_overlay();
            rt.collab
                .renderer
                .show_win_lines(&self.interpretation.line_wins, cycle_ms);
            self.win_display_active = true;
            self.win_lines_pending = true;

            rt.sound(SoundEffect::WinSettle);
            rt.emit(Stage::WinDisplayStarted {
                win_amount: total_win,
                line_count: self.interpretation.line_wins.len(),
            });

            if total_win > 0.0 && total_win >= bet * rt.config.win_dialog_threshold {
                rt.mode.is_showing_win_dialog = true;
                rt.collab.dialogs.show_win_summary(total_win);
            }
        }

        signals.push(SpinSignal::Settled {
            total_win,
            free_spin: self.free_spin,
            bonus_sub_total: self
                .current
                .as_ref()
                .and_then(|r| r.free_spin_info.as_ref())
                .and_then(|info| info.latest_sub_total()),
        });

        self.phase = SpinPhase::ScatterCheck;
        if self.interpretation.triggers_bonus() {
            let scatter_count = self.interpretation.scatter_count();
            rt.mode.is_scatter = true;
            rt.sound(SoundEffect::Scatter);
            rt.emit(Stage::ScatterDetected { scatter_count });
            log::info!(
                "[SpinPhase] spin #{} landed {} scatters, handing off to bonus",
                self.spin_index,
                scatter_count
            );

            self.phase = SpinPhase::BonusHandoff;
            self.last_outcome = Some(SettleOutcome::BonusHandoff);
            signals.push(SpinSignal::ScatterDetected {
                scatter_count,
                awarded: self.current.as_ref().and_then(|r| r.awarded_free_spins()),
            });
        } else {
            self.phase = SpinPhase::Idle;
            self.last_outcome = Some(SettleOutcome::Idle);
        }

        if !self.win_lines_pending {
            signals.push(SpinSignal::WinLinesResolved);
        }
        signals
    }

    pub(crate) fn on_win_lines_resolved(&mut self) -> Option<SpinSignal> {
        if !self.win_lines_pending {
            log::debug!("[SpinPhase] win-lines signal with nothing pending ignored");
            return None;
        }
        self.win_lines_pending = false;
        Some(SpinSignal::WinLinesResolved)
    }

    /// The bonus sequencer took over; spins may be requested again
    pub(crate) fn release_handoff(&mut self) {
        if self.phase == SpinPhase::BonusHandoff {
            self.phase = SpinPhase::Idle;
        }
    }
}

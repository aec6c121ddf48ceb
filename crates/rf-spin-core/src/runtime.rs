//! Shared runtime state
//!
//! Everything the sequencers read or write lives here, owned by the engine and
//! lent out as `&mut Runtime` for the duration of one inbound signal.

use rf_stage::{AutoplayKind, Stage, StageEvent};

use crate::collab::{Collaborators, SoundEffect};
use crate::config::EngineConfig;
use crate::grid::{AnimationClip, CellPos, GridState};
use crate::mode::GameMode;
use crate::scheduler::Scheduler;
use crate::sticky::StickyWildRegistry;

/// Timer payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wakeup {
    /// Scatter reveal window elapsed
    ScatterReveal,
    /// Next autoplay iteration
    AutoplayNext(AutoplayKind),
    /// Re-check an animation asset
    AssetRetry {
        spin_index: u64,
        pos: CellPos,
        clip: AnimationClip,
        attempt: u32,
    },
}

pub(crate) struct Runtime {
    pub config: EngineConfig,
    pub mode: GameMode,
    pub grid: GridState,
    pub sticky: StickyWildRegistry,
    pub scheduler: Scheduler<Wakeup>,
    pub collab: Collaborators,
    pub bet: f64,
    /// Current win-line cycle; turbo-adjusted only while autoplay runs
    pub win_line_cycle_ms: u64,
}

impl Runtime {
    pub fn new(config: EngineConfig, collab: Collaborators) -> Self {
        Self {
            mode: GameMode::default(),
            grid: GridState::new(config.grid),
            sticky: StickyWildRegistry::new(config.grid, config.symbols.clone()),
            scheduler: Scheduler::new(),
            collab,
            bet: config.default_bet,
            win_line_cycle_ms: config.timing.win_line_cycle_ms,
            config,
        }
    }

    pub fn emit(&mut self, stage: Stage) {
        let event = StageEvent::new(stage, self.scheduler.now());
        self.collab.stages.emit(event);
    }

    pub fn sound(&mut self, effect: SoundEffect) {
        self.collab.audio.play_sound_effect(effect);
    }

    /// Turbo-adjusted duration
    pub fn adjust(&self, base_ms: u64) -> u64 {
        self.config.timing.adjust(base_ms, self.mode.is_turbo)
    }

    pub fn animation_speed(&self) -> f64 {
        self.config.timing.animation_speed(self.mode.is_turbo)
    }

    pub fn restore_win_line_baseline(&mut self) {
        self.win_line_cycle_ms = self.config.timing.win_line_cycle_ms;
    }
}

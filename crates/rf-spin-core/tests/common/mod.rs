//! Recording collaborators and a harness shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use rf_spin_core::{
    AnimationClip, Audio, Backend, CellPos, Collaborators, DialogError, Dialogs, DropPlan,
    EngineConfig, Input, LineWin, Renderer, SoundEffect, SpinEngine, SpinResult, StageRecorder,
    StickyWildRef, VisualKind,
};

/// Plain symbol with no role
pub const PLAIN: u32 = 4;
pub const SCATTER: u32 = 0;
pub const WILD: u32 = 10;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// CALL LOG
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything the collaborators were asked to do
#[derive(Debug, Default)]
pub struct CallLog {
    pub bets: Vec<f64>,
    pub drops: Vec<DropPlan>,
    pub visuals: Vec<(CellPos, VisualKind)>,
    pub animations: Vec<(CellPos, String, bool, f64)>,
    pub readiness_checks: usize,
    pub dim_shown: usize,
    pub dim_hidden: usize,
    pub win_lines: Vec<(Vec<LineWin>, u64)>,
    pub win_lines_hidden: usize,
    pub sticky_overlays: Vec<StickyWildRef>,
    pub sticky_clears: usize,
    pub win_summaries: Vec<f64>,
    pub scatter_reveals: Vec<u32>,
    pub congrats: Vec<f64>,
    pub sounds: Vec<SoundEffect>,
}

impl CallLog {
    pub fn sound_count(&self, effect: SoundEffect) -> usize {
        self.sounds.iter().filter(|&&s| s == effect).count()
    }

    pub fn animations_at(&self, pos: CellPos) -> Vec<String> {
        self.animations
            .iter()
            .filter(|(p, ..)| *p == pos)
            .map(|(_, name, ..)| name.clone())
            .collect()
    }
}

/// Knobs the tests flip on the doubles
#[derive(Debug, Clone)]
pub struct DoubleSettings {
    pub assets_ready: bool,
    pub reveal_available: bool,
    pub congrats_available: bool,
}

impl Default for DoubleSettings {
    fn default() -> Self {
        Self {
            assets_ready: true,
            reveal_available: true,
            congrats_available: true,
        }
    }
}

type Shared<T> = Arc<Mutex<T>>;

// ═══════════════════════════════════════════════════════════════════════════════
// DOUBLES
// ═══════════════════════════════════════════════════════════════════════════════

struct RecordingBackend(Shared<CallLog>);

impl Backend for RecordingBackend {
    fn request_spin(&mut self, bet: f64) {
        self.0.lock().bets.push(bet);
    }
}

struct RecordingRenderer {
    log: Shared<CallLog>,
    settings: Shared<DoubleSettings>,
}

impl Renderer for RecordingRenderer {
    fn drop_grid(&mut self, plan: &DropPlan) {
        self.log.lock().drops.push(plan.clone());
    }

    fn set_cell_visual(&mut self, pos: CellPos, kind: VisualKind) {
        self.log.lock().visuals.push((pos, kind));
    }

    fn play_cell_animation(&mut self, pos: CellPos, name: &str, looped: bool, speed: f64) {
        self.log
            .lock()
            .animations
            .push((pos, name.to_string(), looped, speed));
    }

    fn is_animation_ready(&self, _clip: AnimationClip, _symbol: u32) -> bool {
        self.log.lock().readiness_checks += 1;
        self.settings.lock().assets_ready
    }

    fn show_dim_overlay(&mut self) {
        self.log.lock().dim_shown += 1;
    }

    fn hide_dim_overlay(&mut self) {
        self.log.lock().dim_hidden += 1;
    }

    fn show_win_lines(&mut self, lines: &[LineWin], cycle_ms: u64) {
        self.log.lock().win_lines.push((lines.to_vec(), cycle_ms));
    }

    fn hide_win_lines(&mut self) {
        self.log.lock().win_lines_hidden += 1;
    }

    fn attach_sticky_overlay(&mut self, wild: &StickyWildRef) {
        self.log.lock().sticky_overlays.push(*wild);
    }

    fn clear_sticky_overlays(&mut self) {
        self.log.lock().sticky_clears += 1;
    }
}

struct RecordingDialogs {
    log: Shared<CallLog>,
    settings: Shared<DoubleSettings>,
}

impl Dialogs for RecordingDialogs {
    fn show_win_summary(&mut self, amount: f64) {
        self.log.lock().win_summaries.push(amount);
    }

    fn show_scatter_reveal(&mut self, free_spins: u32) -> Result<(), DialogError> {
        if !self.settings.lock().reveal_available {
            return Err(DialogError::Unavailable("scatter reveal"));
        }
        self.log.lock().scatter_reveals.push(free_spins);
        Ok(())
    }

    fn show_congrats(&mut self, total_win: f64) -> Result<(), DialogError> {
        if !self.settings.lock().congrats_available {
            return Err(DialogError::Unavailable("congrats"));
        }
        self.log.lock().congrats.push(total_win);
        Ok(())
    }
}

struct RecordingAudio(Shared<CallLog>);

impl Audio for RecordingAudio {
    fn play_sound_effect(&mut self, effect: SoundEffect) {
        self.0.lock().sounds.push(effect);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HARNESS
// ═══════════════════════════════════════════════════════════════════════════════

pub struct Harness {
    pub engine: SpinEngine,
    pub log: Shared<CallLog>,
    pub settings: Shared<DoubleSettings>,
    pub stages: StageRecorder,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        init_logging();
        let log: Shared<CallLog> = Arc::default();
        let settings: Shared<DoubleSettings> = Arc::default();
        let stages = StageRecorder::new();

        let collab = Collaborators {
            backend: Box::new(RecordingBackend(log.clone())),
            renderer: Box::new(RecordingRenderer {
                log: log.clone(),
                settings: settings.clone(),
            }),
            dialogs: Box::new(RecordingDialogs {
                log: log.clone(),
                settings: settings.clone(),
            }),
            audio: Box::new(RecordingAudio(log.clone())),
            stages: Box::new(stages.clone()),
        };

        let engine = SpinEngine::new(config, collab).unwrap();
        Self {
            engine,
            log,
            settings,
            stages,
        }
    }

    /// Deliver a result and land every reel in order
    pub fn resolve(&mut self, result: SpinResult) {
        self.engine.handle(Input::SpinResult(result));
        self.land_all_reels();
    }

    pub fn land_all_reels(&mut self) {
        for reel in 0..self.engine.config().grid.reels {
            self.engine.handle(Input::ReelStopped(reel));
        }
    }

    /// Manual spin followed by `resolve`
    pub fn play(&mut self, result: SpinResult) {
        assert!(self.engine.spin(), "manual spin refused");
        self.resolve(result);
    }

    pub fn sound_count(&self, effect: SoundEffect) -> usize {
        self.log.lock().sound_count(effect)
    }

    pub fn set_assets_ready(&self, ready: bool) {
        self.settings.lock().assets_ready = ready;
    }

    pub fn set_reveal_available(&self, available: bool) {
        self.settings.lock().reveal_available = available;
    }

    pub fn set_congrats_available(&self, available: bool) {
        self.settings.lock().congrats_available = available;
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GRIDS
// ═══════════════════════════════════════════════════════════════════════════════

/// 5x5 grid of plain symbols
pub fn plain_grid() -> Vec<Vec<u32>> {
    vec![vec![PLAIN; 5]; 5]
}

/// Plain 5x5 grid with the given cells overwritten
pub fn grid_with(cells: &[(u8, u8, u32)]) -> Vec<Vec<u32>> {
    let mut grid = plain_grid();
    for &(col, row, symbol) in cells {
        grid[col as usize][row as usize] = symbol;
    }
    grid
}

/// Plain result with `scatters` scatters spread along the top row
pub fn scatter_result(scatters: u8, bet: f64) -> SpinResult {
    let cells: Vec<(u8, u8, u32)> = (0..scatters).map(|col| (col, 0, SCATTER)).collect();
    SpinResult::new(grid_with(&cells), bet)
}

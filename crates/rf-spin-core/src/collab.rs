//! Collaborator seams
//!
//! The core decides *when* things happen. Rendering, dialogs, audio and the
//! backend client decide *how*, behind these traits. Replies that take time
//! (reel landings, dialog dismissals, spin results) come back to the engine
//! as [`crate::Input`] values.

use rf_stage::StageSink;

use crate::error::DialogError;
use crate::grid::{AnimationClip, CellPos, VisualKind};
use crate::interpret::LineWin;
use crate::sticky::StickyWildRef;

/// Backend client
pub trait Backend: Send {
    /// Ask for a spin. The result arrives later as `Input::SpinResult`.
    fn request_spin(&mut self, bet: f64);
}

/// Everything the renderer needs to drop a new grid
#[derive(Debug, Clone, PartialEq)]
pub struct DropPlan {
    /// Spin sequence number
    pub spin_index: u64,
    /// New symbol values, reels × rows
    pub values: Vec<Vec<u32>>,
    /// Drop duration per reel (ms, turbo-adjusted)
    pub reel_durations_ms: Vec<u64>,
    /// Cells whose base symbol must not be drawn (sticky overlay on top)
    pub suppressed: Vec<CellPos>,
    /// Last reel is extended for scatter anticipation
    pub anticipation: bool,
    /// Playback rate for looped animations
    pub animation_speed: f64,
}

/// Rendering engine. Each reel of a drop reports back as `Input::ReelStopped`.
pub trait Renderer: Send {
    fn drop_grid(&mut self, plan: &DropPlan);

    fn set_cell_visual(&mut self, pos: CellPos, kind: VisualKind);

    fn play_cell_animation(&mut self, pos: CellPos, name: &str, looped: bool, speed: f64);

    /// Is the animation for this clip and symbol loaded?
    fn is_animation_ready(&self, _clip: AnimationClip, _symbol: u32) -> bool {
        true
    }

    fn show_dim_overlay(&mut self);

    fn hide_dim_overlay(&mut self);

    /// Cycle through the winning lines. Completion comes back as `Input::WinLinesResolved`.
    fn show_win_lines(&mut self, lines: &[LineWin], cycle_ms: u64);

    fn hide_win_lines(&mut self);

    fn attach_sticky_overlay(&mut self, wild: &StickyWildRef);

    fn clear_sticky_overlays(&mut self);
}

/// Dialog and overlay collaborator
pub trait Dialogs: Send {
    /// Win-amount dialog. Completion comes back as `Input::WinDialogComplete`.
    fn show_win_summary(&mut self, amount: f64);

    /// Scatter reveal. Dismissal comes back as `Input::ScatterRevealDismissed`.
    fn show_scatter_reveal(&mut self, free_spins: u32) -> Result<(), DialogError>;

    /// End-of-bonus summary. Dismissal comes back as `Input::CongratsDismissed`.
    fn show_congrats(&mut self, total_win: f64) -> Result<(), DialogError>;
}

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    ReelStop,
    TurboDrop,
    WinSettle,
    Scatter,
    BonusStart,
}

/// Audio collaborator, fire-and-forget
pub trait Audio: Send {
    fn play_sound_effect(&mut self, effect: SoundEffect);
}

/// All collaborators the engine talks to
pub struct Collaborators {
    pub backend: Box<dyn Backend>,
    pub renderer: Box<dyn Renderer>,
    pub dialogs: Box<dyn Dialogs>,
    pub audio: Box<dyn Audio>,
    pub stages: Box<dyn StageSink>,
}

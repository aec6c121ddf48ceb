//! # rf-spin-core — Spin Resolution & Bonus Sequencing
//!
//! Client-side round flow for reel-based slot games. The backend decides the
//! outcome; this crate turns that outcome into an ordered presentation:
//! dropping reels, highlighting wins, detecting scatters, pinning sticky wilds
//! and running the autoplay and free-spin sequences.
//!
//! ## Architecture
//!
//! ```text
//!  player / host ──► SpinEngine ◄── Input (backend, renderer, dialogs)
//!                        │
//!      ┌─────────────────┼──────────────────┬─────────────────┐
//!      v                 v                  v                 v
//!  SpinPhaseMachine  ScatterBonusSequencer  NormalAutoplay  FreeSpinAutoplay
//!      │   │                                     └───── AutoplaySession ─┘
//!      │   └── WinInterpreter (LineShapeTable, SymbolRoles)
//!      └────── GridState + StickyWildRegistry
//!                        │
//!                        v
//!  Collaborators (Backend, Renderer, Dialogs, Audio) + StageSink
//! ```
//!
//! Time is virtual: the host calls [`SpinEngine::advance`] and every timer
//! that comes due fires in deadline order.

pub mod autoplay;
pub mod barrier;
pub mod bonus;
pub mod collab;
pub mod config;
pub mod engine;
pub mod error;
pub mod free_spins;
pub mod grid;
pub mod interpret;
pub mod mode;
pub mod paytable;
pub mod phase;
pub mod retry;
pub mod scheduler;
pub mod spin;
pub mod sticky;
pub mod symbols;
pub mod timing;

mod runtime;

pub use autoplay::{AutoplaySession, NormalAutoplay};
pub use barrier::*;
pub use bonus::{BonusPhase, ScatterBonusSequencer, award_for};
pub use collab::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use free_spins::FreeSpinAutoplay;
pub use grid::*;
pub use interpret::*;
pub use mode::*;
pub use paytable::*;
pub use phase::{SettleOutcome, SpinPhase, SpinPhaseMachine, scatter_anticipation};
pub use retry::*;
pub use scheduler::*;
pub use spin::*;
pub use sticky::*;
pub use symbols::*;
pub use timing::{TURBO_ANIMATION_SPEED_MULTIPLIER, TURBO_DELAY_MULTIPLIER, TimingConfig};

pub use rf_stage::{AutoplayKind, Stage, StageEvent, StageRecorder, StageSink};

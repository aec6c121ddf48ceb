//! # rf-stage — Round notifications
//!
//! Defines the notifications the spin resolution core emits while a round
//! plays out. Rendering, audio and UI subsystems observe the core through
//! these stages; the core never calls into them to find out what they did.
//!
//! ## Flow
//!
//! ```text
//! SpinStarted → ReelsStopped → WinDisplayStarted → (ScatterDetected
//!     → BonusActivated → ... free spins ... → AutoplayStopped → BonusFinished)
//! ```

pub mod event;
pub mod stage;

pub use event::*;
pub use stage::*;

//! Single-round flow through the spin phase machine
//!
//! - Clearing, dropping, settling and the return to idle
//! - Payline interpretation and win presentation
//! - Turbo timing, anticipation and reel-stop dedupe
//! - Animation asset retry

mod common;

use approx::assert_relative_eq;

use common::*;
use rf_spin_core::{
    CellPos, CellVisual, Input, SettleOutcome, SoundEffect, SpinPhase, SpinResult, Stage,
    VisualKind,
};

// ═══════════════════════════════════════════════════════════════════════════════
// BASIC ROUND
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_losing_spin_returns_to_idle() {
    let mut h = Harness::new();
    h.play(SpinResult::new(plain_grid(), 1.0));

    assert_eq!(h.engine.spin_phase(), SpinPhase::Idle);
    assert_eq!(h.engine.last_settle(), Some(SettleOutcome::Idle));
    assert!(!h.engine.mode().is_reel_spinning);
    assert_relative_eq!(h.engine.interpretation().total_win, 0.0);

    let log = h.log.lock();
    assert_eq!(log.bets, vec![1.0]);
    assert_eq!(log.drops.len(), 1);
    assert_eq!(log.drops[0].reel_durations_ms, vec![600, 750, 900, 1050, 1200]);
    assert!(!log.drops[0].anticipation);
    assert!(log.win_lines.is_empty());
    assert_eq!(log.sound_count(SoundEffect::ReelStop), 5);
    assert_eq!(log.sound_count(SoundEffect::WinSettle), 0);

    // Every cell converted to its idle loop
    assert_eq!(log.animations.len(), 25);
    assert!(log.animations.iter().all(|(_, name, looped, _)| name == "idle" && !looped));
    drop(log);

    assert_eq!(h.stages.count("spin_started"), 1);
    assert_eq!(h.stages.count("reels_stopped"), 1);
    assert_eq!(h.stages.count("win_display_started"), 0);
}

#[test]
fn test_spin_refused_mid_round() {
    let mut h = Harness::new();
    assert!(h.engine.spin());
    assert_eq!(h.engine.spin_phase(), SpinPhase::AwaitingResult);
    assert!(h.engine.mode().is_reel_spinning);

    assert!(!h.engine.spin());
    assert_eq!(h.log.lock().bets.len(), 1);
}

#[test]
fn test_result_outside_awaiting_phase_is_ignored() {
    let mut h = Harness::new();
    h.engine
        .handle(Input::SpinResult(SpinResult::new(plain_grid(), 1.0)));

    assert_eq!(h.engine.spin_phase(), SpinPhase::Idle);
    assert!(h.log.lock().drops.is_empty());
}

#[test]
fn test_bet_is_sent_with_spin_request() {
    let mut h = Harness::new();
    assert!(!h.engine.set_bet(0.0));
    assert!(!h.engine.set_bet(f64::NAN));
    assert!(h.engine.set_bet(2.5));

    assert!(h.engine.spin());
    assert_eq!(h.log.lock().bets, vec![2.5]);
    assert!(matches!(
        h.stages.stages()[0],
        Stage::SpinStarted { spin_index: 1, bet, free_spin: false } if bet == 2.5
    ));
}

// ═══════════════════════════════════════════════════════════════════════════════
// WIN PRESENTATION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_winning_lines_highlight_union_of_cells() {
    let mut h = Harness::new();
    let result = SpinResult::new(plain_grid(), 1.0)
        .with_payline(0, 3, 2.0)
        .with_payline(5, 3, 1.0);
    h.play(result);

    let interp = h.engine.interpretation().clone();
    assert_eq!(interp.line_wins.len(), 2);
    assert_relative_eq!(interp.total_win, 3.0);
    // Top row (0,0)(1,0)(2,0) and V (0,0)(1,1)(2,2) share one cell
    assert_eq!(interp.winning_cells.len(), 5);

    let log = h.log.lock();
    assert_eq!(log.dim_shown, 1);
    assert_eq!(log.win_lines.len(), 1);
    assert_eq!(log.win_lines[0].1, 1200);
    assert_eq!(log.sound_count(SoundEffect::WinSettle), 1);
    assert!(log.win_summaries.is_empty());

    assert_eq!(log.animations_at(CellPos::new(0, 0)), vec!["win"]);
    assert_eq!(log.animations_at(CellPos::new(2, 2)), vec!["win"]);
    assert_eq!(log.animations_at(CellPos::new(4, 4)), vec!["idle"]);
    drop(log);

    assert_eq!(
        h.engine.grid().cell(CellPos::new(1, 1)).map(|c| c.visual.kind()),
        Some(VisualKind::Winning)
    );
    assert!(h.stages.stages().contains(&Stage::WinDisplayStarted {
        win_amount: 3.0,
        line_count: 2,
    }));
}

#[test]
fn test_next_spin_clears_previous_win_display() {
    let mut h = Harness::new();
    h.play(SpinResult::new(plain_grid(), 1.0).with_payline(1, 5, 4.0));
    h.engine.handle(Input::WinLinesResolved);

    assert!(h.engine.spin());
    assert_eq!(h.engine.spin_phase(), SpinPhase::AwaitingResult);

    let log = h.log.lock();
    assert_eq!(log.win_lines_hidden, 1);
    assert_eq!(log.dim_hidden, 1);
    let reset_to_static = log
        .visuals
        .iter()
        .filter(|(_, kind)| *kind == VisualKind::Static)
        .count();
    assert_eq!(reset_to_static, 25);
    drop(log);

    assert_eq!(h.stages.count("win_display_stopped"), 1);
    assert!(h
        .engine
        .grid()
        .positions()
        .all(|pos| h.engine.grid().cell(pos).map(|c| c.visual) == Some(CellVisual::Static)));
}

#[test]
fn test_unknown_line_key_is_skipped() {
    let mut h = Harness::new();
    let result = SpinResult::new(plain_grid(), 1.0)
        .with_payline(42, 3, 5.0)
        .with_payline(1, 3, 2.0);
    h.play(result);

    let interp = h.engine.interpretation();
    assert_eq!(interp.line_wins.len(), 1);
    assert_eq!(interp.issues.len(), 1);
    assert_relative_eq!(interp.total_win, 2.0);
    assert_eq!(h.engine.spin_phase(), SpinPhase::Idle);
}

#[test]
fn test_big_win_opens_dialog() {
    let mut h = Harness::new();
    h.play(SpinResult::new(plain_grid(), 1.0).with_payline(2, 5, 20.0));

    assert!(h.engine.mode().is_showing_win_dialog);
    assert_eq!(h.log.lock().win_summaries, vec![20.0]);

    h.engine.handle(Input::WinDialogComplete);
    assert!(!h.engine.mode().is_showing_win_dialog);
}

#[test]
fn test_small_win_skips_dialog() {
    let mut h = Harness::new();
    h.play(SpinResult::new(plain_grid(), 1.0).with_payline(2, 5, 14.0));

    assert!(!h.engine.mode().is_showing_win_dialog);
    assert!(h.log.lock().win_summaries.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════════
// TIMING
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_turbo_halves_delays_and_doubles_speed() {
    let mut h = Harness::new();
    h.engine.set_turbo(true);
    h.play(SpinResult::new(plain_grid(), 1.0));

    let log = h.log.lock();
    assert_eq!(log.drops[0].reel_durations_ms, vec![300, 375, 450, 525, 600]);
    assert_relative_eq!(log.drops[0].animation_speed, 2.0);
    assert_eq!(log.sound_count(SoundEffect::TurboDrop), 1);
    assert!(log.animations.iter().all(|(.., speed)| *speed == 2.0));
}

#[test]
fn test_anticipation_extends_last_reel() {
    let mut h = Harness::new();
    h.play(SpinResult::new(grid_with(&[(0, 1, SCATTER), (2, 3, SCATTER)]), 1.0));

    let log = h.log.lock();
    assert!(log.drops[0].anticipation);
    assert_eq!(log.drops[0].reel_durations_ms[4], 1200 + 3000);
    assert_eq!(log.drops[0].reel_durations_ms[3], 1050);
    drop(log);

    // Two scatters build suspense but do not trigger
    assert_eq!(h.engine.last_settle(), Some(SettleOutcome::Idle));
    assert!(!h.engine.mode().is_scatter);
}

#[test]
fn test_anticipation_ignores_reel_one() {
    let mut h = Harness::new();
    h.play(SpinResult::new(grid_with(&[(0, 1, SCATTER), (1, 3, SCATTER)]), 1.0));

    assert!(!h.log.lock().drops[0].anticipation);
}

// ═══════════════════════════════════════════════════════════════════════════════
// REEL BARRIER
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_reel_stop_is_deduplicated() {
    let mut h = Harness::new();
    assert!(h.engine.spin());
    h.engine
        .handle(Input::SpinResult(SpinResult::new(plain_grid(), 1.0)));

    h.engine.handle(Input::ReelStopped(0));
    h.engine.handle(Input::ReelStopped(0));
    h.engine.handle(Input::ReelStopped(9));
    assert_eq!(h.engine.spin_phase(), SpinPhase::Dropping);
    assert_eq!(h.sound_count(SoundEffect::ReelStop), 1);

    for reel in 1..5 {
        h.engine.handle(Input::ReelStopped(reel));
    }
    assert_eq!(h.engine.spin_phase(), SpinPhase::Idle);
    assert_eq!(h.stages.count("reels_stopped"), 1);
    assert_eq!(h.sound_count(SoundEffect::ReelStop), 5);
}

#[test]
fn test_ragged_grid_keeps_previous_symbols() {
    let mut h = Harness::new();
    h.play(SpinResult::new(grid_with(&[(4, 4, 7)]), 1.0));

    let ragged = vec![vec![3; 5]; 4];
    h.play(SpinResult::new(ragged, 1.0));

    let log = h.log.lock();
    let values = &log.drops[1].values;
    assert_eq!(values.len(), 5);
    assert_eq!(values[0], vec![3; 5]);
    assert_eq!(values[4][4], 7);
}

// ═══════════════════════════════════════════════════════════════════════════════
// ASSET RETRY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_assets_fall_back_to_static() {
    let mut h = Harness::new();
    h.set_assets_ready(false);
    h.play(SpinResult::new(plain_grid(), 1.0));

    assert_eq!(h.log.lock().readiness_checks, 25);
    assert_eq!(h.engine.pending_timers(), 25);

    h.engine.advance(100);
    assert_eq!(h.log.lock().readiness_checks, 50);
    assert_eq!(h.engine.pending_timers(), 25);

    h.engine.advance(100);
    assert_eq!(h.log.lock().readiness_checks, 75);
    assert_eq!(h.engine.pending_timers(), 0);

    assert!(h.log.lock().animations.is_empty());
    assert!(h
        .engine
        .grid()
        .positions()
        .all(|pos| h.engine.grid().cell(pos).map(|c| c.visual) == Some(CellVisual::Static)));
}

#[test]
fn test_asset_loaded_on_retry() {
    let mut h = Harness::new();
    h.set_assets_ready(false);
    h.play(SpinResult::new(plain_grid(), 1.0));
    assert!(h.log.lock().animations.is_empty());

    h.set_assets_ready(true);
    h.engine.advance(100);

    assert_eq!(h.log.lock().animations.len(), 25);
    assert_eq!(h.engine.pending_timers(), 0);
}

#[test]
fn test_retry_for_previous_spin_is_dropped() {
    let mut h = Harness::new();
    h.set_assets_ready(false);
    h.play(SpinResult::new(plain_grid(), 1.0));

    h.set_assets_ready(true);
    assert!(h.engine.spin());
    h.engine.advance(100);

    // Retries fired but belonged to spin #1
    assert!(h.log.lock().animations.is_empty());
}

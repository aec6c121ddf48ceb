//! Timing policy — turbo-aware delays and playback rates
//!
//! Every delay, drop duration, win-line cycle and looped-animation rate in the
//! core goes through [`TimingConfig::adjust`] or
//! [`TimingConfig::animation_speed`]. Nothing else checks the turbo flag.

use serde::{Deserialize, Serialize};

/// Turbo multiplier for delays and durations (< 1.0 = faster)
pub const TURBO_DELAY_MULTIPLIER: f64 = 0.5;

/// Turbo multiplier for looped-animation playback rate (> 1.0 = faster)
pub const TURBO_ANIMATION_SPEED_MULTIPLIER: f64 = 2.0;

/// Adjust a base duration with the default turbo multiplier
pub fn adjust(base_ms: u64, is_turbo: bool) -> u64 {
    scale(base_ms, is_turbo, TURBO_DELAY_MULTIPLIER)
}

fn scale(base_ms: u64, is_turbo: bool, multiplier: f64) -> u64 {
    if !is_turbo {
        return base_ms;
    }
    (base_ms as f64 * multiplier).round() as u64
}

/// Named base durations and turbo multipliers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Drop duration of the first reel (ms)
    pub reel_drop_ms: u64,

    /// Extra drop duration per subsequent reel (ms)
    pub reel_stagger_ms: u64,

    /// Added to the last reel when a scatter pair builds suspense (ms)
    pub anticipation_bonus_ms: u64,

    /// Window before the scatter reveal dialog. Never turbo-adjusted (ms)
    pub scatter_reveal_ms: u64,

    /// Gap between autoplay spins (ms)
    pub autoplay_gap_ms: u64,

    /// Delay before autoplay resumes after a win dialog (ms)
    pub dialog_resume_ms: u64,

    /// Time each win line stays highlighted (ms)
    pub win_line_cycle_ms: u64,

    /// Turbo multiplier for delays (0 < x <= 1)
    pub turbo_delay_multiplier: f64,

    /// Turbo multiplier for animation playback rate (>= 1)
    pub turbo_animation_speed: f64,
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            reel_drop_ms: 600,
            reel_stagger_ms: 150,
            anticipation_bonus_ms: 3000,
            scatter_reveal_ms: 1500,
            autoplay_gap_ms: 500,
            dialog_resume_ms: 500,
            win_line_cycle_ms: 1200,
            turbo_delay_multiplier: TURBO_DELAY_MULTIPLIER,
            turbo_animation_speed: TURBO_ANIMATION_SPEED_MULTIPLIER,
        }
    }

    /// Adjust a base duration for the turbo flag
    pub fn adjust(&self, base_ms: u64, is_turbo: bool) -> u64 {
        scale(base_ms, is_turbo, self.turbo_delay_multiplier)
    }

    /// Playback rate for looped animations
    pub fn animation_speed(&self, is_turbo: bool) -> f64 {
        if is_turbo {
            self.turbo_animation_speed
        } else {
            1.0
        }
    }

    /// Per-reel drop durations, last reel extended when anticipating
    pub fn reel_drop_durations(&self, reels: u8, is_turbo: bool, anticipation: bool) -> Vec<u64> {
        let last = reels.saturating_sub(1);
        (0..reels)
            .map(|reel| {
                let mut base = self.reel_drop_ms + u64::from(reel) * self.reel_stagger_ms;
                if anticipation && reel == last {
                    base += self.anticipation_bonus_ms;
                }
                self.adjust(base, is_turbo)
            })
            .collect()
    }

    /// Validate multipliers
    pub fn validate(&self) -> Result<(), String> {
        if !(self.turbo_delay_multiplier > 0.0 && self.turbo_delay_multiplier <= 1.0) {
            return Err(format!(
                "turbo_delay_multiplier must be in (0, 1], got {}",
                self.turbo_delay_multiplier
            ));
        }
        if !(self.turbo_animation_speed >= 1.0) {
            return Err(format!(
                "turbo_animation_speed must be >= 1, got {}",
                self.turbo_animation_speed
            ));
        }
        Ok(())
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turbo_never_slower() {
        let timing = TimingConfig::normal();
        for base in [0, 1, 3, 250, 500, 3000, 12_345] {
            assert_eq!(timing.adjust(base, false), base);
            assert!(timing.adjust(base, true) <= timing.adjust(base, false));
            assert!(adjust(base, true) <= adjust(base, false));
        }
    }

    #[test]
    fn test_turbo_halves_delays() {
        assert_eq!(adjust(500, true), 250);
        assert_eq!(adjust(500, false), 500);
        assert_eq!(TimingConfig::normal().animation_speed(true), 2.0);
        assert_eq!(TimingConfig::normal().animation_speed(false), 1.0);
    }

    #[test]
    fn test_anticipation_extends_last_reel_only() {
        let timing = TimingConfig::normal();
        let plain = timing.reel_drop_durations(5, false, false);
        let tense = timing.reel_drop_durations(5, false, true);

        assert_eq!(plain[..4], tense[..4]);
        assert_eq!(tense[4], plain[4] + 3000);

        let turbo = timing.reel_drop_durations(5, true, true);
        assert_eq!(turbo[4], timing.adjust(plain[4] + 3000, true));
    }

    #[test]
    fn test_validate_rejects_slowing_turbo() {
        let mut timing = TimingConfig::normal();
        timing.turbo_delay_multiplier = 1.5;
        assert!(timing.validate().is_err());

        timing.turbo_delay_multiplier = 0.5;
        timing.turbo_animation_speed = 0.5;
        assert!(timing.validate().is_err());
    }
}

//! Reel completion barrier (fan-out / fan-in)

/// Result of recording one reel completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierStep {
    /// Recorded; `complete` is true once every reel has reported
    Recorded { complete: bool },
    /// Out of range or already reported
    Rejected,
}

/// Expected-count vs. received-count barrier with per-reel dedupe
#[derive(Debug, Clone, Default)]
pub struct ReelBarrier {
    received: Vec<bool>,
    count: usize,
}

impl ReelBarrier {
    pub fn new(expected: usize) -> Self {
        Self {
            received: vec![false; expected],
            count: 0,
        }
    }

    pub fn reset(&mut self, expected: usize) {
        self.received.clear();
        self.received.resize(expected, false);
        self.count = 0;
    }

    pub fn record(&mut self, reel: usize) -> BarrierStep {
        match self.received.get_mut(reel) {
            Some(seen) if !*seen => {
                *seen = true;
                self.count += 1;
                BarrierStep::Recorded {
                    complete: self.is_complete(),
                }
            }
            _ => BarrierStep::Rejected,
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.received.is_empty() && self.count == self.received.len()
    }

    pub fn expected(&self) -> usize {
        self.received.len()
    }

    pub fn received(&self) -> usize {
        self.count
    }
}

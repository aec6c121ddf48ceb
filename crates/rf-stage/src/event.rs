//! StageEvent — A stage occurrence with metadata, and the sinks that receive it

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// A stage event with timing metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The canonical stage
    pub stage: Stage,

    /// Engine clock in milliseconds when the stage was emitted
    pub timestamp_ms: u64,

    /// Custom tags for filtering/routing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl StageEvent {
    /// Create a new stage event
    pub fn new(stage: Stage, timestamp_ms: u64) -> Self {
        Self {
            stage,
            timestamp_ms,
            tags: Vec::new(),
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Get stage type name
    pub fn type_name(&self) -> &'static str {
        self.stage.type_name()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SINKS
// ═══════════════════════════════════════════════════════════════════════════════

/// Receiver of stage notifications.
///
/// Implementations must not call back into the engine; they only observe.
pub trait StageSink: Send {
    /// Deliver one stage event
    fn emit(&mut self, event: StageEvent);
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StageSink for NullSink {
    fn emit(&mut self, _event: StageEvent) {}
}

/// Thread-safe recorder of emitted stages.
///
/// Cloning shares the same buffer, so one clone can be handed to the engine
/// while another is kept for inspection.
#[derive(Debug, Default, Clone)]
pub struct StageRecorder {
    events: Arc<Mutex<Vec<StageEvent>>>,
}

impl StageRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<StageEvent> {
        self.events.lock().clone()
    }

    /// Recorded stages without metadata
    pub fn stages(&self) -> Vec<Stage> {
        self.events.lock().iter().map(|e| e.stage.clone()).collect()
    }

    /// Number of recorded events whose type name matches
    pub fn count(&self, type_name: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.type_name() == type_name)
            .count()
    }

    /// Drain the buffer
    pub fn take(&self) -> Vec<StageEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Serialize the recorded events as a JSON array
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&*self.events.lock()).unwrap_or_default()
    }
}

impl StageSink for StageRecorder {
    fn emit(&mut self, event: StageEvent) {
        self.events.lock().push(event);
    }
}

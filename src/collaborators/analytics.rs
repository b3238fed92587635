//! Analytics sinks: one that writes to the `tracing` log, one that keeps
//! events in memory.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tracing::info;

use super::Analytics;

/// Logs every analytics event under the `analytics` target.
#[derive(Debug, Default, Clone)]
pub struct TracingAnalytics;

impl TracingAnalytics {
    pub fn new() -> Self {
        Self
    }
}

impl Analytics for TracingAnalytics {
    fn record(&self, event: &str, payload: serde_json::Value) {
        info!(target: "analytics", event, %payload, "[Analytics] {}", event);
    }
}

/// One event captured by `RecordingAnalytics`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub name: String,
    pub payload: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

/// Buffers events in memory until drained.
#[derive(Debug, Default)]
pub struct RecordingAnalytics {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Event names in recording order.
    pub fn names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    /// Most recent event with `name`.
    pub fn last(&self, name: &str) -> Option<RecordedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|e| e.name == name)
            .cloned()
    }

    /// Take every buffered event, leaving the buffer empty.
    pub fn drain(&self) -> Vec<RecordedEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Analytics for RecordingAnalytics {
    fn record(&self, event: &str, payload: serde_json::Value) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedEvent {
                name: event.to_string(),
                payload,
                recorded_at: Utc::now(),
            });
    }
}

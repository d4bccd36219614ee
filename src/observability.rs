//! # Pipeline Observability Module
//!
//! Structured events for the image pipeline, written to stderr as JSON lines
//! prefixed with `PREVIEWCLOUD_EVENT:` so CI log collectors can pick them out.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::time::Instant;

/// Event prefix for log collectors to identify structured events
const EVENT_PREFIX: &str = "PREVIEWCLOUD_EVENT:";

/// Pipeline event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum PipelineEvent {
    /// Pipeline run started
    PipelineStarted(PipelineStartedEvent),
    /// A service image was built
    ServiceBuilt(ServiceBuiltEvent),
    /// A service image was pushed
    ImagePushed(ImagePushedEvent),
    /// A service was skipped (no dockerfile declared)
    ServiceSkipped(ServiceSkippedEvent),
    /// Pipeline run completed
    PipelineCompleted(PipelineCompletedEvent),
    /// Pipeline run aborted
    PipelineFailed(PipelineFailedEvent),
}

/// Common fields for all events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Timestamp in RFC3339 format
    pub timestamp: String,
    pub preview_id: String,
    /// CI job ID if running in CI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ci_job_id: Option<String>,
}

impl EventMetadata {
    pub fn new(preview_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            preview_id: preview_id.into(),
            ci_job_id: std::env::var("GITHUB_RUN_ID")
                .ok()
                .or_else(|| std::env::var("CI_JOB_ID").ok()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStartedEvent {
    #[serde(flatten)]
    pub metadata: EventMetadata,
    pub services: Vec<String>,
    pub registry_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceBuiltEvent {
    #[serde(flatten)]
    pub metadata: EventMetadata,
    pub service: String,
    pub image: String,
    pub duration_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePushedEvent {
    #[serde(flatten)]
    pub metadata: EventMetadata,
    pub service: String,
    pub image: String,
    pub duration_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSkippedEvent {
    #[serde(flatten)]
    pub metadata: EventMetadata,
    pub service: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineCompletedEvent {
    #[serde(flatten)]
    pub metadata: EventMetadata,
    pub duration_secs: f64,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineFailedEvent {
    #[serde(flatten)]
    pub metadata: EventMetadata,
    pub duration_secs: f64,
    /// Service being processed when the run aborted, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub error: String,
}

/// Emits a structured event as JSON to stderr
///
/// Stdout carries the image map, so events share stderr with the logs.
pub fn emit_event(event: &PipelineEvent) {
    let mut stderr = std::io::stderr().lock();
    if let Err(e) = write_event(&mut stderr, event) {
        tracing::error!("Failed to emit event: {}", e);
    }
}

/// Write one prefixed event line
pub fn write_event<W: Write>(writer: &mut W, event: &PipelineEvent) -> io::Result<()> {
    let json = serde_json::to_string(event).map_err(io::Error::other)?;
    writeln!(writer, "{}{}", EVENT_PREFIX, json)
}

/// Helper to track step timing
pub struct StepTimer {
    start: Instant,
}

impl StepTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

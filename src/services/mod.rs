//! Services layer - orchestration logic
//!
//! This module coordinates between domain logic and infrastructure.
//! Services use infrastructure adapters to perform I/O operations.

pub mod artifact_service;
pub mod image_pipeline;

// Re-export commonly used types
pub use artifact_service::{detect_signature, ArtifactDetector, ArtifactStatus};
pub use image_pipeline::{BuildReport, ImagePipeline};

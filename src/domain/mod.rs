//! Domain layer - pure business logic
//!
//! This module contains business logic with no external I/O.
//! Types and functions here can be unit tested without mocking.

pub mod detection;
pub mod registry;
pub mod service;
pub mod tag;

// Re-export commonly used types
pub use detection::{DetectionSignature, ARTIFACT_DIR, PYTHON_PACKAGING_MARKER};
pub use registry::{RegistryConfig, DEFAULT_REGISTRY, LOCAL_NAMESPACE};
pub use service::{BuildArgs, BuildOutcome, ServiceSpec};
pub use tag::compute_tag;

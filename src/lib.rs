//! previewcloud - container images for pull request preview environments
//!
//! Reads `preview.yaml`, builds each service's application artifacts,
//! then builds, tags and pushes one image per service.

pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod observability;
pub mod path_resolver;
pub mod services;
pub mod tools;
pub mod ui;

pub use error::{ConfigError, PipelineError};

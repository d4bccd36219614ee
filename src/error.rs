//! Centralized error types for previewcloud
//!
//! Uses thiserror for typed errors that can be matched on,
//! while still being compatible with anyhow for propagation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building and pushing preview images.
///
/// Every variant is fatal to the run. Nothing here is retried.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(
        "Dockerfile not found: {}\n   \
         Check your preview.yaml - dockerfile path should be relative to repo root.\n   \
         Example: frontend/Dockerfile (not docker.io/frontend/Dockerfile)",
        .path.display()
    )]
    MissingDockerfile { path: PathBuf },

    #[error("Build tool failed: `{command}` in {}: {reason}", .context.display())]
    BuildToolFailure {
        command: String,
        context: PathBuf,
        reason: String,
    },

    #[error(
        "Build directory not found after auto-build!\n   \
         Expected: {}\n   \
         Context directory contents: {listing}\n   \
         Dockerfile expects: COPY build /usr/share/nginx/html\n\n   \
         Please ensure your build process creates a 'build' directory, or add build steps to your workflow.",
        .expected.display()
    )]
    BuildArtifactMissing { expected: PathBuf, listing: String },

    #[error("Registry login to {registry} failed: {reason}")]
    RegistryLoginFailure { registry: String, reason: String },

    #[error(
        "docker build failed for {tag} (dockerfile: {}, context: {}): {reason}",
        .dockerfile.display(),
        .context.display()
    )]
    DockerBuildFailure {
        tag: String,
        dockerfile: PathBuf,
        context: PathBuf,
        reason: String,
    },

    #[error("docker push failed for {tag}: {reason}")]
    DockerPushFailure { tag: String, reason: String },

    #[error("Failed to build image for {service}: {source}")]
    Service {
        service: String,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Attach the service name to a per-service failure
    pub fn for_service(self, service: impl Into<String>) -> Self {
        Self::Service {
            service: service.into(),
            source: Box::new(self),
        }
    }

    /// The underlying failure, unwrapping any service attribution
    pub fn root(&self) -> &PipelineError {
        match self {
            Self::Service { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to parse config file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Configuration is empty")]
    Empty,

    #[error("Required configuration missing: {field}")]
    MissingField { field: String },

    #[error("Service '{service}' has invalid port: {port}")]
    InvalidPort { service: String, port: i64 },

    #[error("Invalid database type: {db_type}. Must be one of: postgres, mysql, mongodb")]
    InvalidDatabaseType { db_type: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dockerfile_mentions_path_and_hint() {
        let err = PipelineError::MissingDockerfile {
            path: PathBuf::from("/repo/web/Dockerfile"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/repo/web/Dockerfile"));
        assert!(msg.contains("path should be relative to repo root"));
    }

    #[test]
    fn test_artifact_missing_includes_listing() {
        let err = PipelineError::BuildArtifactMissing {
            expected: PathBuf::from("/repo/web/build"),
            listing: "Dockerfile, src".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/repo/web/build"));
        assert!(msg.contains("Dockerfile, src"));
    }

    #[test]
    fn test_service_wrapping_keeps_root_cause() {
        let err = PipelineError::DockerPushFailure {
            tag: "docker.io/pr-1-api:latest".to_string(),
            reason: "exited with code 1".to_string(),
        }
        .for_service("api");

        assert!(err.to_string().contains("Failed to build image for api"));
        assert!(matches!(err.root(), PipelineError::DockerPushFailure { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidPort {
            service: "web".to_string(),
            port: 70000,
        };
        assert_eq!(err.to_string(), "Service 'web' has invalid port: 70000");
    }
}

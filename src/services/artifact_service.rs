//! Artifact detector - materializes a context's `build` directory
//!
//! Classifies the build context by marker files and runs the matching
//! toolchain. An existing `build` directory short-circuits everything.
//! An unrecognized project only warns; the pipeline's artifact check is
//! what fails the run.

use std::path::Path;
use tracing::{error, info, warn};

use crate::domain::{DetectionSignature, ARTIFACT_DIR, PYTHON_PACKAGING_MARKER};
use crate::error::PipelineError;
use crate::infrastructure::process::{run_checked, CommandRunner, Invocation};
use crate::infrastructure::Toolchain;

/// What `ensure_artifacts` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStatus {
    /// `build` already existed; nothing ran
    AlreadyPresent,
    /// The toolchain for this signature ran successfully
    Built(DetectionSignature),
    /// No marker matched; a warning was logged
    Undetected,
}

/// Classify a context directory by its marker files
pub fn detect_signature(context: &Path) -> DetectionSignature {
    DetectionSignature::classify(|marker| context.join(marker).exists())
}

/// Detects project type and builds application artifacts
pub struct ArtifactDetector<'a, R> {
    runner: &'a R,
    toolchain: &'a Toolchain,
}

impl<'a, R: CommandRunner> ArtifactDetector<'a, R> {
    pub fn new(runner: &'a R, toolchain: &'a Toolchain) -> Self {
        Self { runner, toolchain }
    }

    /// Ensure `<context>/build` exists, building the application if needed
    pub async fn ensure_artifacts(&self, context: &Path) -> Result<ArtifactStatus, PipelineError> {
        let build_dir = context.join(ARTIFACT_DIR);

        if build_dir.is_dir() {
            info!("✅ Build directory already exists: {}", build_dir.display());
            return Ok(ArtifactStatus::AlreadyPresent);
        }

        info!("🔨 Build directory not found. Auto-building application...");

        let signature = detect_signature(context);
        let steps = match signature {
            DetectionSignature::NodeProject => {
                info!("📦 Detected Node.js project. Installing dependencies...");
                vec![
                    self.toolchain.node_install(context),
                    self.toolchain.node_build(context),
                ]
            }
            DetectionSignature::PythonProject => {
                info!("🐍 Detected Python project. Installing dependencies...");
                let mut steps = vec![self.toolchain.python_install(context)];
                if context.join(PYTHON_PACKAGING_MARKER).exists() {
                    steps.push(self.toolchain.python_package(context));
                }
                steps
            }
            DetectionSignature::GoProject => {
                info!("🐹 Detected Go project. Building...");
                vec![self.toolchain.go_compile(context)]
            }
            DetectionSignature::Unknown => {
                warn!(
                    "⚠️  Could not auto-detect build system.\n   \
                     Build directory not found: {}\n   \
                     Dockerfile expects: COPY build /usr/share/nginx/html\n   \
                     Please add build steps to your workflow or ensure build directory exists.",
                    build_dir.display()
                );
                return Ok(ArtifactStatus::Undetected);
            }
        };

        for step in &steps {
            self.run_step(signature, step, context).await?;
        }

        info!("✅ {} build completed", signature.name());
        Ok(ArtifactStatus::Built(signature))
    }

    async fn run_step(
        &self,
        signature: DetectionSignature,
        step: &Invocation,
        context: &Path,
    ) -> Result<(), PipelineError> {
        info!("   Running: {}", step);
        run_checked(self.runner, step).await.map_err(|reason| {
            error!(
                "❌ Failed to build {} application: {}",
                signature.name(),
                reason
            );
            PipelineError::BuildToolFailure {
                command: step.to_string(),
                context: context.to_path_buf(),
                reason,
            }
        })
    }
}

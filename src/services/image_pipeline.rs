//! Image pipeline - builds and pushes one image per preview service
//!
//! For each service, in declaration order:
//! resolve paths → ensure artifacts → verify `build` → tag → `docker build` → `docker push`.
//!
//! The first fatal error aborts the whole batch. Images already pushed for
//! earlier services stay pushed; the caller gets no partial results.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::artifact_service::ArtifactDetector;
use crate::domain::{compute_tag, BuildOutcome, RegistryConfig, ServiceSpec};
use crate::error::PipelineError;
use crate::infrastructure::{CommandRunner, DockerClient, SystemRunner, Toolchain};
use crate::observability::{
    emit_event, EventMetadata, ImagePushedEvent, PipelineCompletedEvent, PipelineEvent,
    PipelineFailedEvent, PipelineStartedEvent, ServiceBuiltEvent, ServiceSkippedEvent, StepTimer,
};
use crate::path_resolver::{PathResolver, ResolvedPaths};

/// Result of a successful pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// Built images, in processing order
    pub outcomes: Vec<BuildOutcome>,
    /// Services skipped because they declare no dockerfile
    pub skipped: Vec<String>,
    /// Non-fatal conditions reported during the run
    pub warnings: Vec<String>,
}

impl BuildReport {
    /// Service name → image reference, as consumed by the deployer
    pub fn image_references(&self) -> BTreeMap<String, String> {
        self.outcomes
            .iter()
            .map(|o| (o.service_name.clone(), o.image_reference.clone()))
            .collect()
    }

    pub fn image_for(&self, service: &str) -> Option<&str> {
        self.outcomes
            .iter()
            .find(|o| o.service_name == service)
            .map(|o| o.image_reference.as_str())
    }
}

/// Orchestrates image builds for a preview environment
pub struct ImagePipeline<R = SystemRunner> {
    runner: R,
    docker: DockerClient,
    toolchain: Toolchain,
    registry: RegistryConfig,
    preview_id: String,
    resolver: PathResolver,
    emit_events: bool,
}

impl ImagePipeline<SystemRunner> {
    /// Create a pipeline that spawns real processes
    pub fn new(
        preview_id: impl Into<String>,
        working_dir: impl Into<PathBuf>,
        registry: RegistryConfig,
    ) -> Self {
        Self::with_runner(SystemRunner, preview_id, working_dir, registry)
    }
}

impl<R: CommandRunner> ImagePipeline<R> {
    pub fn with_runner(
        runner: R,
        preview_id: impl Into<String>,
        working_dir: impl Into<PathBuf>,
        registry: RegistryConfig,
    ) -> Self {
        Self {
            runner,
            docker: DockerClient::new(),
            toolchain: Toolchain::from_env(),
            registry,
            preview_id: preview_id.into(),
            resolver: PathResolver::new(working_dir),
            emit_events: false,
        }
    }

    /// Builder: override the container build tool
    pub fn with_docker(mut self, docker: DockerClient) -> Self {
        self.docker = docker;
        self
    }

    /// Builder: override the application toolchains
    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    /// Builder: emit `PREVIEWCLOUD_EVENT:` lines to stderr
    pub fn with_events(mut self, enabled: bool) -> Self {
        self.emit_events = enabled;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Build (and push, if a registry is active) every service
    pub async fn run(&self, services: &[ServiceSpec]) -> Result<BuildReport, PipelineError> {
        let timer = StepTimer::start();

        self.emit(PipelineEvent::PipelineStarted(PipelineStartedEvent {
            metadata: self.metadata(),
            services: services.iter().map(|s| s.name.clone()).collect(),
            registry_active: self.registry.is_active(),
        }));

        match self.run_services(services).await {
            Ok(report) => {
                self.emit(PipelineEvent::PipelineCompleted(PipelineCompletedEvent {
                    metadata: self.metadata(),
                    duration_secs: timer.elapsed_secs(),
                    images: report
                        .outcomes
                        .iter()
                        .map(|o| o.image_reference.clone())
                        .collect(),
                }));
                Ok(report)
            }
            Err(err) => {
                let service = match &err {
                    PipelineError::Service { service, .. } => Some(service.clone()),
                    _ => None,
                };
                self.emit(PipelineEvent::PipelineFailed(PipelineFailedEvent {
                    metadata: self.metadata(),
                    duration_secs: timer.elapsed_secs(),
                    service,
                    error: err.to_string(),
                }));
                Err(err)
            }
        }
    }

    async fn run_services(&self, services: &[ServiceSpec]) -> Result<BuildReport, PipelineError> {
        let mut report = BuildReport::default();

        self.authenticate().await?;

        for spec in services {
            let Some(dockerfile) = spec.declared_dockerfile() else {
                let message = format!("Service {} has no dockerfile, skipping build", spec.name);
                warn!("{}", message);
                self.emit(PipelineEvent::ServiceSkipped(ServiceSkippedEvent {
                    metadata: self.metadata(),
                    service: spec.name.clone(),
                    reason: "no dockerfile declared".to_string(),
                }));
                report.skipped.push(spec.name.clone());
                report.warnings.push(message);
                continue;
            };

            let outcome = self
                .build_service(spec, dockerfile, &mut report.warnings)
                .await
                .map_err(|e| {
                    error!("Failed to build image for {}: {}", spec.name, e);
                    e.for_service(&spec.name)
                })?;

            report.outcomes.push(outcome);
        }

        Ok(report)
    }

    /// Log in once, before any service is processed
    async fn authenticate(&self) -> Result<(), PipelineError> {
        match self.registry.login_credentials() {
            Some((username, password)) => {
                self.docker
                    .login(
                        &self.runner,
                        self.registry.host_or_default(),
                        username,
                        password,
                    )
                    .await
            }
            None => {
                if !self.registry.is_active() {
                    info!("No registry configured; images will stay on the local daemon");
                }
                Ok(())
            }
        }
    }

    async fn build_service(
        &self,
        spec: &ServiceSpec,
        dockerfile: &Path,
        warnings: &mut Vec<String>,
    ) -> Result<BuildOutcome, PipelineError> {
        info!("🔨 Building image for {}", spec.name);

        let paths = self.resolver.resolve(dockerfile, spec.context.as_deref())?;
        info!("   Dockerfile: {}", paths.dockerfile.display());
        info!("   Build context: {}", paths.context.display());

        ArtifactDetector::new(&self.runner, &self.toolchain)
            .ensure_artifacts(&paths.context)
            .await?;

        verify_artifacts(&paths)?;

        let tag = compute_tag(&self.registry, &self.preview_id, &spec.name);
        info!("   Image: {}", tag);

        let timer = StepTimer::start();
        self.docker
            .build(
                &self.runner,
                &paths.dockerfile,
                &tag,
                &spec.build_args,
                &paths.context,
            )
            .await?;
        self.emit(PipelineEvent::ServiceBuilt(ServiceBuiltEvent {
            metadata: self.metadata(),
            service: spec.name.clone(),
            image: tag.clone(),
            duration_secs: timer.elapsed_secs(),
        }));

        let pushed = if self.registry.is_active() {
            let timer = StepTimer::start();
            self.docker.push(&self.runner, &tag).await?;
            self.emit(PipelineEvent::ImagePushed(ImagePushedEvent {
                metadata: self.metadata(),
                service: spec.name.clone(),
                image: tag.clone(),
                duration_secs: timer.elapsed_secs(),
            }));
            info!("✅ Built and pushed: {}", tag);
            true
        } else {
            let message = format!(
                "No registry configured. Image {} built locally but not pushed. \
                 The deployer won't be able to pull this image. Please configure a registry.",
                tag
            );
            warn!("⚠️  {}", message);
            warnings.push(message);
            info!("✅ Built: {}", tag);
            false
        };

        Ok(BuildOutcome {
            service_name: spec.name.clone(),
            image_reference: tag,
            pushed,
        })
    }

    fn metadata(&self) -> EventMetadata {
        EventMetadata::new(&self.preview_id)
    }

    fn emit(&self, event: PipelineEvent) {
        if self.emit_events {
            emit_event(&event);
        }
    }
}

/// Fail unless the context's `build` directory exists
fn verify_artifacts(paths: &ResolvedPaths) -> Result<(), PipelineError> {
    let build_dir = paths.artifact_dir();
    if build_dir.is_dir() {
        info!("   ✅ Build directory found: {}", build_dir.display());
        return Ok(());
    }

    Err(PipelineError::BuildArtifactMissing {
        expected: build_dir,
        listing: list_directory(&paths.context),
    })
}

/// Comma-separated, sorted entries of a directory for diagnostics
pub fn list_directory(dir: &Path) -> String {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            if names.is_empty() {
                "(empty)".to_string()
            } else {
                names.join(", ")
            }
        }
        Err(_) if !dir.exists() => "directory does not exist".to_string(),
        Err(e) => format!("unreadable ({})", e),
    }
}

//! Container build tool operations
//!
//! Wraps the `docker` CLI: one-time registry login, image build, image push.

use std::path::Path;
use tracing::{debug, info};

use super::process::{run_checked, CommandRunner, Invocation};
use crate::domain::BuildArgs;
use crate::error::PipelineError;
use crate::tools::{get_tool_path, names};

/// Client for the container build tool
#[derive(Debug, Clone)]
pub struct DockerClient {
    program: String,
}

impl Default for DockerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerClient {
    /// Use `DOCKER_BIN` if set, otherwise `docker` from PATH
    pub fn new() -> Self {
        Self::with_program(get_tool_path(names::DOCKER))
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// `login <registry> -u <user> -p <password>`
    pub fn login_invocation(&self, registry: &str, username: &str, password: &str) -> Invocation {
        Invocation::new(&self.program)
            .args(["login", registry, "-u", username, "-p"])
            .secret_arg(password)
    }

    /// `build -f <dockerfile> -t <tag> [--build-arg k=v ...] <context>`
    pub fn build_invocation(
        &self,
        dockerfile: &Path,
        tag: &str,
        build_args: &BuildArgs,
        context: &Path,
    ) -> Invocation {
        let mut inv = Invocation::new(&self.program)
            .arg("build")
            .arg("-f")
            .arg(dockerfile.display().to_string())
            .arg("-t")
            .arg(tag);

        for (key, value) in build_args.iter() {
            inv = inv.arg("--build-arg").arg(format!("{}={}", key, value));
        }

        inv.arg(context.display().to_string())
    }

    /// `push <tag>`
    pub fn push_invocation(&self, tag: &str) -> Invocation {
        Invocation::new(&self.program).args(["push", tag])
    }

    pub async fn login<R: CommandRunner>(
        &self,
        runner: &R,
        registry: &str,
        username: &str,
        password: &str,
    ) -> Result<(), PipelineError> {
        info!("🔐 Logging into registry: {}", registry);
        let inv = self.login_invocation(registry, username, password);
        debug!("Running: {}", inv);

        run_checked(runner, &inv)
            .await
            .map_err(|reason| PipelineError::RegistryLoginFailure {
                registry: registry.to_string(),
                reason,
            })
    }

    pub async fn build<R: CommandRunner>(
        &self,
        runner: &R,
        dockerfile: &Path,
        tag: &str,
        build_args: &BuildArgs,
        context: &Path,
    ) -> Result<(), PipelineError> {
        let inv = self.build_invocation(dockerfile, tag, build_args, context);
        debug!("Running: {}", inv);

        run_checked(runner, &inv)
            .await
            .map_err(|reason| PipelineError::DockerBuildFailure {
                tag: tag.to_string(),
                dockerfile: dockerfile.to_path_buf(),
                context: context.to_path_buf(),
                reason,
            })
    }

    pub async fn push<R: CommandRunner>(&self, runner: &R, tag: &str) -> Result<(), PipelineError> {
        info!("📤 Pushing {} to registry...", tag);
        let inv = self.push_invocation(tag);
        debug!("Running: {}", inv);

        run_checked(runner, &inv)
            .await
            .map_err(|reason| PipelineError::DockerPushFailure {
                tag: tag.to_string(),
                reason,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::process::testing::RecordingRunner;
    use std::path::PathBuf;

    #[test]
    fn test_build_invocation_argument_order() {
        let docker = DockerClient::with_program("docker");
        let args: BuildArgs = [("NODE_ENV", "production"), ("API_URL", "http://api")]
            .into_iter()
            .collect();

        let inv = docker.build_invocation(
            Path::new("/repo/web/Dockerfile"),
            "previewcloud/pr-7-web:latest",
            &args,
            Path::new("/repo/web"),
        );

        assert_eq!(
            inv.args,
            vec![
                "build",
                "-f",
                "/repo/web/Dockerfile",
                "-t",
                "previewcloud/pr-7-web:latest",
                "--build-arg",
                "NODE_ENV=production",
                "--build-arg",
                "API_URL=http://api",
                "/repo/web",
            ]
        );
    }

    #[test]
    fn test_login_invocation_hides_password() {
        let docker = DockerClient::with_program("docker");
        let inv = docker.login_invocation("ghcr.io", "alice", "s3cret");
        assert_eq!(inv.args, vec!["login", "ghcr.io", "-u", "alice", "-p", "s3cret"]);
        assert!(!inv.to_string().contains("s3cret"));
    }

    #[tokio::test]
    async fn test_push_failure_maps_to_push_error() {
        let runner = RecordingRunner::new().fail_on("push");
        let docker = DockerClient::with_program("docker");

        let err = docker.push(&runner, "ghcr.io/pr-1-api:latest").await.unwrap_err();
        assert!(matches!(err, PipelineError::DockerPushFailure { ref tag, .. } if tag == "ghcr.io/pr-1-api:latest"));
    }

    #[tokio::test]
    async fn test_build_failure_carries_paths() {
        let runner = RecordingRunner::new().fail_on("build");
        let docker = DockerClient::with_program("docker");

        let err = docker
            .build(
                &runner,
                Path::new("/repo/api/Dockerfile"),
                "previewcloud/pr-1-api:latest",
                &BuildArgs::new(),
                Path::new("/repo/api"),
            )
            .await
            .unwrap_err();

        match err {
            PipelineError::DockerBuildFailure {
                dockerfile,
                context,
                ..
            } => {
                assert_eq!(dockerfile, PathBuf::from("/repo/api/Dockerfile"));
                assert_eq!(context, PathBuf::from("/repo/api"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_login_failure() {
        let runner = RecordingRunner::new().fail_on("login");
        let docker = DockerClient::with_program("docker");

        let err = tokio_test::block_on(docker.login(&runner, "docker.io", "alice", "pw"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::RegistryLoginFailure { .. }));
    }
}

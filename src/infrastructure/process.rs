//! External process execution
//!
//! Every build tool, `docker build`, `docker push` and `docker login` goes
//! through [`CommandRunner`]. Calls block the pipeline until the process
//! exits; the exit status is the only success signal. No timeout is applied.

use std::fmt;
use std::path::{Path, PathBuf};
use tokio::process::Command;

const REDACTED: &str = "********";

/// A command line to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    secret_args: Vec<usize>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            secret_args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add an argument that is masked whenever the command line is displayed
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        self.secret_args.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for (index, arg) in self.args.iter().enumerate() {
            if self.secret_args.contains(&index) {
                write!(f, " {}", REDACTED)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Exit status of a finished process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    code: Option<i32>,
}

impl CommandStatus {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Process ended without an exit code (killed by a signal)
    pub fn terminated() -> Self {
        Self { code: None }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl From<std::process::ExitStatus> for CommandStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exited with code {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Runs external commands to completion
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<CommandStatus>;
}

/// Runs commands as real child processes
///
/// Child stdout is written to our stderr; stdout is kept for the image map.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<CommandStatus> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).stdout(std::io::stderr());
        if let Some(ref dir) = invocation.cwd {
            cmd.current_dir(dir);
        }
        cmd.status().await.map(CommandStatus::from)
    }
}

/// Run an invocation, mapping a spawn error or non-zero exit to a reason string
pub async fn run_checked<R: CommandRunner>(
    runner: &R,
    invocation: &Invocation,
) -> Result<(), String> {
    match runner.run(invocation).await {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(status.to_string()),
        Err(e) => Err(format!("failed to start `{}`: {}", invocation.program, e)),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_masks_secrets() {
        let inv = Invocation::new("docker")
            .args(["login", "docker.io", "-u", "alice", "-p"])
            .secret_arg("hunter2");
        assert_eq!(inv.to_string(), "docker login docker.io -u alice -p ********");
        assert_eq!(inv.args.last().map(String::as_str), Some("hunter2"));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_system_runner_routes_child_stdout_to_stderr() {
        let inv = Invocation::new("sh").args(["-c", "[ /proc/self/fd/1 -ef /proc/self/fd/2 ]"]);
        let status = SystemRunner.run(&inv).await.unwrap();
        assert!(status.success(), "child stdout is not our stderr: {status}");
    }

    #[test]
    fn test_command_status_display() {
        assert!(CommandStatus::from_code(0).success());
        assert_eq!(CommandStatus::from_code(2).to_string(), "exited with code 2");
        assert!(!CommandStatus::terminated().success());
    }

    #[tokio::test]
    async fn test_system_runner_reports_spawn_failure() {
        let inv = Invocation::new("previewcloud-definitely-missing-binary");
        let err = run_checked(&SystemRunner, &inv).await.unwrap_err();
        assert!(err.contains("failed to start"));
    }

    #[tokio::test]
    async fn test_recording_runner_failure_pattern() {
        let runner = testing::RecordingRunner::new().fail_on("push");
        let ok = Invocation::new("docker").arg("build");
        let bad = Invocation::new("docker").arg("push");

        assert!(run_checked(&runner, &ok).await.is_ok());
        assert_eq!(
            run_checked(&runner, &bad).await.unwrap_err(),
            "exited with code 1"
        );
        assert_eq!(runner.command_lines(), vec!["docker build", "docker push"]);
    }
}

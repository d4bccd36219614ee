//! Infrastructure layer - external I/O adapters
//!
//! This module contains all code that spawns external processes:
//! - Container build tool (docker login/build/push)
//! - Application toolchains (npm, pip, python, go)

pub mod docker;
pub mod process;
pub mod toolchain;

// Re-export commonly used types
pub use docker::DockerClient;
pub use process::{CommandRunner, CommandStatus, Invocation, SystemRunner};
pub use toolchain::Toolchain;

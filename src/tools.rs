//! Runtime tool path resolution
//!
//! For each external tool (e.g., `docker`), we:
//! 1. Check for an environment variable `{TOOL}_BIN` (e.g., `DOCKER_BIN`)
//! 2. Fall back to PATH-based invocation if the envvar is not set
//!
//! ## Usage
//!
//! ```rust,ignore
//! use previewcloud::tools::{get_tool_path, names};
//!
//! // Reads DOCKER_BIN, falls back to "docker"
//! let docker = get_tool_path(names::DOCKER);
//! ```

use std::env;
use std::path::PathBuf;

/// Get the path to an external tool
///
/// Checks for an environment variable `{TOOL}_BIN` (uppercase tool name + "_BIN").
/// Falls back to the tool name itself if the envvar is not set or empty, which relies on PATH.
pub fn get_tool_path(tool: &str) -> String {
    let env_var = format!("{}_BIN", tool.to_uppercase());
    env::var(&env_var)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| tool.to_string())
}

/// Locate a tool on disk, honoring the `{TOOL}_BIN` override
///
/// Returns `None` when the tool cannot be found, so callers can warn
/// before a build starts instead of failing deep inside the pipeline.
pub fn locate_tool(tool: &str) -> Option<PathBuf> {
    which::which(get_tool_path(tool)).ok()
}

/// Tool names used by the pipeline
pub mod names {
    pub const DOCKER: &str = "docker";
    pub const NPM: &str = "npm";
    pub const PIP: &str = "pip";
    pub const PYTHON: &str = "python";
    pub const GO: &str = "go";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_get_tool_path_from_env() {
        env::set_var("TESTTOOL_BIN", "/custom/path/to/testtool");
        assert_eq!(get_tool_path("testtool"), "/custom/path/to/testtool");
        env::remove_var("TESTTOOL_BIN");
    }

    #[test]
    fn test_get_tool_path_fallback() {
        env::remove_var("MISSINGTOOL_BIN");
        assert_eq!(get_tool_path("missingtool"), "missingtool");
    }

    #[test]
    fn test_empty_override_is_ignored() {
        env::set_var("EMPTYTOOL_BIN", "");
        assert_eq!(get_tool_path("emptytool"), "emptytool");
        env::remove_var("EMPTYTOOL_BIN");
    }

    #[test]
    fn test_locate_missing_tool() {
        env::remove_var("DEFINITELY-NOT-A-REAL-TOOL-XYZ_BIN");
        assert!(locate_tool("definitely-not-a-real-tool-xyz").is_none());
    }
}

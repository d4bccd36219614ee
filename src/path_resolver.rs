//! # Path Resolver
//!
//! Turns the dockerfile/context paths declared for a service into absolute,
//! normalized paths under the working directory.
//!
//! Paths occasionally arrive with a registry host baked in as a directory
//! (`docker.io/frontend/Dockerfile`). Any non-final segment equal to the
//! default registry host is dropped before the existence check.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let resolver = PathResolver::new("/repo");
//! let paths = resolver.resolve(Path::new("web/Dockerfile"), None)?;
//! assert_eq!(paths.context, PathBuf::from("/repo/web"));
//! ```

use std::path::{Component, Path, PathBuf};

use crate::domain::{ARTIFACT_DIR, DEFAULT_REGISTRY};
use crate::error::PipelineError;

/// Absolute dockerfile and build context for one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub dockerfile: PathBuf,
    pub context: PathBuf,
}

impl ResolvedPaths {
    /// Directory the auto-build must produce inside the context
    pub fn artifact_dir(&self) -> PathBuf {
        self.context.join(ARTIFACT_DIR)
    }
}

/// Resolves service paths against a working directory
pub struct PathResolver {
    working_dir: PathBuf,
}

impl PathResolver {
    /// A relative `working_dir` is taken from the process's current directory
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        let working_dir = if working_dir.is_absolute() {
            working_dir
        } else {
            match std::env::current_dir() {
                Ok(cwd) => cwd.join(working_dir),
                Err(_) => working_dir,
            }
        };
        Self {
            working_dir: normalize(&working_dir),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Resolve a single path: join relative paths onto the working directory,
    /// strip registry-host segments and normalize
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        };
        normalize(&joined)
    }

    /// Resolve dockerfile and context, failing if the dockerfile is missing
    ///
    /// Without an explicit context the dockerfile's directory is used.
    pub fn resolve(
        &self,
        dockerfile: &Path,
        context: Option<&Path>,
    ) -> Result<ResolvedPaths, PipelineError> {
        let dockerfile = self.resolve_path(dockerfile);

        let context = match context {
            Some(context) => self.resolve_path(context),
            None => dockerfile
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.working_dir.clone()),
        };

        if !dockerfile.is_file() {
            return Err(PipelineError::MissingDockerfile { path: dockerfile });
        }

        Ok(ResolvedPaths {
            dockerfile,
            context,
        })
    }
}

fn is_registry_segment(segment: &std::ffi::OsStr) -> bool {
    segment
        .to_str()
        .is_some_and(|s| s.eq_ignore_ascii_case(DEFAULT_REGISTRY))
}

/// Lexically normalize a path without touching the filesystem
///
/// Drops `.`, collapses `..`, and removes registry-host directory segments.
/// The final segment is kept as-is.
pub fn normalize(path: &Path) -> PathBuf {
    let components: Vec<Component> = path.components().collect();
    let last = components.len().saturating_sub(1);
    let mut out = PathBuf::new();

    for (index, component) in components.iter().enumerate() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = out.has_root() && out.parent().is_none();
                if at_root {
                    continue;
                }
                if out.as_os_str().is_empty() || out.ends_with("..") {
                    out.push("..");
                } else {
                    out.pop();
                }
            }
            Component::Normal(segment) if index != last && is_registry_segment(segment) => {}
            other => out.push(other.as_os_str()),
        }
    }

    out
}

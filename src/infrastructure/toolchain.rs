//! Application build toolchains
//!
//! Command lines for materializing the `build` directory of Node, Python
//! and Go projects. All commands run with the build context as working directory.

use std::path::Path;

use super::process::Invocation;
use crate::tools::{get_tool_path, names};

/// Resolved binaries for each build toolchain
#[derive(Debug, Clone)]
pub struct Toolchain {
    npm: String,
    pip: String,
    python: String,
    go: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Toolchain {
    /// Resolve each tool from its `{TOOL}_BIN` override or PATH
    pub fn from_env() -> Self {
        Self {
            npm: get_tool_path(names::NPM),
            pip: get_tool_path(names::PIP),
            python: get_tool_path(names::PYTHON),
            go: get_tool_path(names::GO),
        }
    }

    /// `npm install`
    pub fn node_install(&self, context: &Path) -> Invocation {
        Invocation::new(&self.npm)
            .arg("install")
            .current_dir(context)
    }

    /// `npm run build`
    pub fn node_build(&self, context: &Path) -> Invocation {
        Invocation::new(&self.npm)
            .args(["run", "build"])
            .current_dir(context)
    }

    /// `pip install -r requirements.txt`
    pub fn python_install(&self, context: &Path) -> Invocation {
        Invocation::new(&self.pip)
            .args(["install", "-r", "requirements.txt"])
            .current_dir(context)
    }

    /// `python setup.py build`
    pub fn python_package(&self, context: &Path) -> Invocation {
        Invocation::new(&self.python)
            .args(["setup.py", "build"])
            .current_dir(context)
    }

    /// `go build -o app ./...`
    pub fn go_compile(&self, context: &Path) -> Invocation {
        Invocation::new(&self.go)
            .args(["build", "-o", "app", "./..."])
            .current_dir(context)
    }
}

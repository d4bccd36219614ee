//! CLI definitions for previewcloud
//!
//! This module contains all CLI argument parsing structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "previewcloud",
    version,
    about = "Build and push container images for pull request preview environments"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build (and push) one image per service in preview.yaml
    Build {
        /// Preview identifier, e.g. "pr-42"
        #[arg(long, env = "PREVIEW_ID")]
        preview_id: String,

        /// Configuration file, relative to the working directory
        #[arg(long, default_value = previewcloud::config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Repository root that service paths are relative to
        #[arg(long, default_value = ".")]
        working_dir: PathBuf,

        /// Container registry host (defaults to docker.io when a username is given)
        #[arg(long, env = "PREVIEW_REGISTRY")]
        registry: Option<String>,

        /// Registry username
        #[arg(long, env = "PREVIEW_REGISTRY_USERNAME")]
        registry_username: Option<String>,

        /// Registry password or token
        #[arg(long, env = "PREVIEW_REGISTRY_PASSWORD", hide_env_values = true)]
        registry_password: Option<String>,

        /// Write the service → image mapping as JSON to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Load and validate preview.yaml without building anything
    Validate {
        /// Configuration file, relative to the working directory
        #[arg(long, default_value = previewcloud::config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Repository root that service paths are relative to
        #[arg(long, default_value = ".")]
        working_dir: PathBuf,
    },
}

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::load_preview_config;
use crate::domain::RegistryConfig;
use crate::services::ImagePipeline;
use crate::tools::{self, names};
use crate::ui;

/// Arguments of `previewcloud build`
pub struct BuildArgs {
    pub preview_id: String,
    pub config: PathBuf,
    pub working_dir: PathBuf,
    pub registry: Option<String>,
    pub registry_username: Option<String>,
    pub registry_password: Option<String>,
    pub output: Option<PathBuf>,
}

pub async fn execute(args: BuildArgs) -> Result<()> {
    ui::print_header("PreviewCloud Image Build");

    if args.preview_id.trim().is_empty() {
        bail!("--preview-id must not be empty");
    }

    let working_dir = std::fs::canonicalize(&args.working_dir).with_context(|| {
        format!(
            "Working directory not found: {}",
            args.working_dir.display()
        )
    })?;

    let config = load_preview_config(&args.config, &working_dir)
        .context("Failed to load preview configuration")?;

    let registry = RegistryConfig::new(
        args.registry,
        args.registry_username,
        args.registry_password,
    );

    info!("📦 Preview: {}", args.preview_id);
    info!("📁 Working directory: {}", working_dir.display());
    info!("🧩 Services: {}", config.services.len());
    if registry.is_active() {
        info!("🐳 Registry: {}", registry.host_or_default());
    } else {
        info!("🐳 No registry credentials; images stay local");
    }

    if tools::locate_tool(names::DOCKER).is_none() {
        warn!(
            "docker not found on PATH (set {}_BIN to override)",
            names::DOCKER.to_uppercase()
        );
    }

    let pipeline = ImagePipeline::new(&args.preview_id, &working_dir, registry).with_events(true);

    let report = match pipeline.run(&config.services).await {
        Ok(report) => report,
        Err(e) => {
            ui::print_error(&e.to_string());
            return Err(e).context("Image build failed");
        }
    };

    ui::print_report(&report);

    let json = serde_json::to_string_pretty(&report.image_references())
        .context("Failed to serialize image references")?;

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, format!("{}\n", json))
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("📝 Image references written to {}", path.display());
        }
        None => println!("{}", json),
    }

    ui::print_success(&format!(
        "{} image(s) built, {} service(s) skipped",
        report.outcomes.len().to_string().bold(),
        report.skipped.len()
    ));

    Ok(())
}

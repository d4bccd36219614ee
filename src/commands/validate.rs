use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::load_preview_config;
use crate::path_resolver::PathResolver;
use crate::services::detect_signature;
use crate::ui;

pub async fn execute(config: PathBuf, working_dir: PathBuf) -> Result<()> {
    ui::print_header("PreviewCloud Config Check");

    let working_dir = std::fs::canonicalize(&working_dir)
        .with_context(|| format!("Working directory not found: {}", working_dir.display()))?;

    let config = load_preview_config(&config, &working_dir)
        .context("Failed to load preview configuration")?;
    let resolver = PathResolver::new(&working_dir);

    let mut problems = 0;
    for service in &config.services {
        let Some(dockerfile) = service.declared_dockerfile() else {
            eprintln!("  {:<20} {}", service.name.bold(), "no dockerfile".dimmed());
            continue;
        };

        match resolver.resolve(dockerfile, service.context.as_deref()) {
            Ok(paths) => eprintln!(
                "  {:<20} {} ({})",
                service.name.bold(),
                paths.context.display(),
                detect_signature(&paths.context).name()
            ),
            Err(e) => {
                problems += 1;
                ui::print_warning(&format!("{}: {}", service.name, e));
            }
        }
    }

    if let Some(database) = &config.database {
        eprintln!("  database: {}", database.db_type.as_str());
    }

    if problems > 0 {
        anyhow::bail!("{} service(s) have unresolvable paths", problems);
    }

    ui::print_success("preview.yaml is valid");
    Ok(())
}

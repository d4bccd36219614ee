use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{Cli, Commands};
use previewcloud::commands::{build, validate};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // LOGGING=debug,info,warn,error or just LOGGING=debug
    let log_level = std::env::var("LOGGING")
        .or_else(|_| std::env::var("LOG_LEVEL"))
        .unwrap_or_else(|_| {
            if cli.verbose {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

    // stdout carries only the image map; logs, events and tool output go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false)
        .init();

    match cli.command {
        Commands::Build {
            preview_id,
            config,
            working_dir,
            registry,
            registry_username,
            registry_password,
            output,
        } => {
            build::execute(build::BuildArgs {
                preview_id,
                config,
                working_dir,
                registry,
                registry_username,
                registry_password,
                output,
            })
            .await?;
        }
        Commands::Validate {
            config,
            working_dir,
        } => {
            validate::execute(config, working_dir).await?;
        }
    }

    Ok(())
}

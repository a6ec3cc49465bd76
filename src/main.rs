use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use quicklink::cli::{Cli, Commands};
use quicklink::config::{StaticConfig, init_config};
use quicklink::system::{logging, server, shutdown, startup};

#[actix_web::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Serve);

    if let Commands::GenerateConfig { output_path, force } = &command {
        return match generate_config(output_path.as_deref(), *force) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{:#}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match init_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };

    let _guard = match logging::init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };

    let result = match command {
        Commands::Check => check(&config).await,
        _ => server::run_server(&config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn generate_config(output_path: Option<&str>, force: bool) -> Result<()> {
    let sample = StaticConfig::generate_sample_config();

    match output_path {
        None => {
            println!("{}", sample);
        }
        Some(path) => {
            if std::path::Path::new(path).exists() && !force {
                bail!("{} already exists, use --force to overwrite", path);
            }
            std::fs::write(path, sample).with_context(|| format!("Failed to write {}", path))?;
            println!("Sample configuration written to {}", path);
        }
    }
    Ok(())
}

async fn check(config: &StaticConfig) -> Result<()> {
    let ctx = startup::prepare_startup(config).await?;
    let report = ctx.health.check().await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    shutdown::shutdown(&ctx).await;

    if !report.is_serving() {
        bail!("Store is unreachable");
    }
    info!("Check passed");
    Ok(())
}

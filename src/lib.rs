mod cli;
pub mod commands;
pub mod core;

use std::collections::BTreeMap;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, LoaderArgs};
use crate::commands::PackRequest;
use crate::core::error::PackResult;
use crate::core::instance::{InstanceConfig, PackManifest};
use crate::core::state::{AppState, Settings};

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Initialize structured logging
    let default_filter = if cli.verbose {
        "info,packdev_lib=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(execute(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("{:?}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> PackResult<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        settings.meta_endpoint = endpoint;
    }
    if let Some(n) = cli.concurrency {
        settings.fetch_concurrency = n;
    }
    let state = AppState::new(settings)?;

    match cli.command {
        Commands::Resolve { loader, json } => {
            let request = pack_request(&loader)?;
            let resolution = commands::resolve_components(&state, &request).await?;
            if json {
                println!("{}", PackManifest::from_resolution(&resolution).to_json_string()?);
            } else {
                print!("{}", commands::render_resolution(&resolution));
            }
        }
        Commands::Pack {
            loader,
            name,
            output,
            java,
            memory,
            overwrite,
        } => {
            let request = pack_request(&loader)?;
            let config = InstanceConfig {
                name,
                java_path: java,
                max_memory_mb: memory,
            };
            let manifest =
                commands::write_instance(&state, &request, &config, &output, overwrite).await?;
            println!(
                "Wrote {} components to {}",
                manifest.components.len(),
                output.display()
            );
        }
        Commands::Describe { uid, version } => {
            let descriptor = commands::describe_component(&state, &uid, &version).await?;
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
        Commands::Loaders => {
            for info in commands::list_loaders(&state) {
                println!(
                    "{:<9} loader={} mappings={}",
                    info.loader.to_string(),
                    info.loader_uid.as_deref().unwrap_or("-"),
                    info.mapping_uid.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

fn pack_request(args: &LoaderArgs) -> PackResult<PackRequest> {
    let extra_components = args
        .components
        .iter()
        .map(|raw| commands::parse_component_pin(raw))
        .collect::<PackResult<BTreeMap<_, _>>>()?;

    Ok(PackRequest {
        loader: args.loader.parse()?,
        minecraft_version: args.minecraft.clone(),
        loader_version: args.loader_version.clone(),
        extra_components,
    })
}

//! # Object Runtime Server
//!
//! Serves live snapshots of one or more Slurm batch systems to remote
//! viewers. Each configured root (`[[roots]]` in `objrt.toml` or
//! `OBJRT_ROOTS`) becomes a top-level path such as `/Quartz`; partitions
//! and jobs below it are queried from the scheduler on every request.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use objrt_config::{ConfigLoad, ConfigLoader, ConfigWarnings, RootsSource};
use objrt_server::RuntimeServer;
use objrt_server::startup::build_resolver;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "objrt-server")]
#[command(
    about = "Serve live batch-system snapshots over the object runtime protocol"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "OBJRT_SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "OBJRT_SERVER_HOST")]
    host: Option<String>,

    /// Path to the TOML configuration file
    #[arg(short, long, env = "OBJRT_CONFIG_PATH")]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load and validate configuration, print the root table and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::CheckConfig) = cli.command {
        return check_config(&cli.serve);
    }

    run_server(cli.serve).await
}

fn load_config(args: &ServeArgs) -> anyhow::Result<ConfigLoad> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_config_path(path);
    }
    let mut load = loader.load().context("failed to load configuration")?;

    if let Some(port) = args.port {
        load.config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        load.config.server.host = host;
    }
    Ok(load)
}

fn check_config(args: &ServeArgs) -> anyhow::Result<()> {
    let ConfigLoad { config, warnings } = load_config(args)?;

    match &config.metadata.config_path {
        Some(path) => println!("Configuration: {}", path.display()),
        None => println!("Configuration: environment only"),
    }
    println!("Bind address: {}", config.bind_addr());
    if let Some(origin) = config.advertised_endpoint() {
        println!("Advertised as: {origin}");
    }
    println!("Cluster shell: {}", config.cluster.shell.as_str());

    let bindings = config.root_bindings();
    let source = match config.metadata.roots_source {
        RootsSource::File => "file",
        RootsSource::Env => "OBJRT_ROOTS",
        RootsSource::None => "none",
    };
    println!("Roots ({}, from {source}):", bindings.len());
    for binding in bindings.iter() {
        println!(
            "  /{} -> {} ({})",
            binding.name, binding.scheduler, binding.title
        );
    }

    if !warnings.is_empty() {
        println!("Warnings:");
        for warning in &warnings.items {
            match &warning.hint {
                Some(hint) => {
                    println!("  - {} (hint: {})", warning.message, hint)
                }
                None => println!("  - {}", warning.message),
            }
        }
    }
    Ok(())
}

fn log_warnings(warnings: &ConfigWarnings) {
    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(
                    message = %warning.message,
                    hint = %hint,
                    "configuration warning"
                )
            }
            None => {
                warn!(message = %warning.message, "configuration warning")
            }
        }
    }
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let ConfigLoad { config, warnings } = load_config(&args)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,objrt_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    log_warnings(&warnings);

    let resolver = build_resolver(&config);
    let addr = config.bind_addr();
    let server = RuntimeServer::bind(addr.as_str(), resolver)
        .await
        .with_context(|| format!("failed to start runtime server on {addr}"))?;

    let advertise =
        config.advertised_endpoint().map(|origin| origin.to_string());
    info!(
        addr = %server.local_addr()?,
        shell = config.cluster.shell.as_str(),
        advertise = ?advertise,
        "starting object runtime server"
    );

    server
        .serve_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!(error = %err, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    Ok(())
}

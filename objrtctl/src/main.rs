//! `objrtctl`: fetch and browse snapshots served by an Object Runtime
//! server.

use std::time::Duration;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use objrt_core::RuntimeClient;
use objrt_core::protocol::{Response, decode_response};
use objrtctl::{NodeListing, render_value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "objrtctl")]
#[command(
    about = "Browse live batch-system snapshots from an Object Runtime server"
)]
struct Cli {
    #[command(flatten)]
    server: ServerArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServerArgs {
    /// Runtime server host
    #[arg(
        long,
        global = true,
        env = "OBJRT_HOST",
        default_value = "127.0.0.1"
    )]
    host: String,

    /// Runtime server port
    #[arg(
        short,
        long,
        global = true,
        env = "OBJRT_PORT",
        default_value_t = 9100
    )]
    port: u16,

    /// Connect and read timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout_secs: u64,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the object at PATH, e.g. `/Quartz/general`
    Get {
        path: String,

        /// Print the raw response body instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Fetch PATH, then drill into its child CHILD on the same server
    Children { path: String, child: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ServerArgs {
        host,
        port,
        timeout_secs,
    } = cli.server;
    let client =
        RuntimeClient::new().with_timeout(Duration::from_secs(timeout_secs));
    let fetch_context =
        |path: &str| format!("failed to fetch {path} from {host}:{port}");

    match cli.command {
        Command::Get { path, json: true } => {
            let body = client
                .fetch_raw(&host, port, &path)
                .await
                .with_context(|| fetch_context(&path))?;
            // Envelopes are failures even when the body is shown raw.
            decode_response(&body)
                .and_then(Response::into_result)
                .with_context(|| fetch_context(&path))?;
            println!("{}", render_value(&body));
        }
        Command::Get { path, json: false } => {
            let node = client
                .fetch(&host, port, &path)
                .await
                .with_context(|| fetch_context(&path))?;
            print!("{}", NodeListing(&node));
        }
        Command::Children { path, child } => {
            let parent = client
                .fetch(&host, port, &path)
                .await
                .with_context(|| fetch_context(&path))?;
            if !parent.has_child(&child) {
                tracing::warn!(
                    %path,
                    %child,
                    "child is not listed in the parent snapshot"
                );
            }
            let node = client
                .drill_down(&parent, &child)
                .await
                .with_context(|| {
                    format!("failed to fetch {child} under {path}")
                })?;
            print!("{}", NodeListing(&node));
        }
    }
    Ok(())
}

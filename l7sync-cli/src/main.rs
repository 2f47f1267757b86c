//! l7sync: converge a declared L7-protection configuration against the
//! remote service.
//!
//! The declaration lives in a TOML file; the state observed after each
//! successful pass is persisted as JSON and handed back in on the next run.
//! A missing state file means "create from scratch".

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use l7sync_core::Converger;
use l7sync_sdk::{l7resource, Client};

mod files;

/// L7 protection configuration sync
#[derive(Parser, Debug)]
#[command(name = "l7sync", version, about)]
struct Args {
    /// API endpoint, e.g. https://api.example.com/api/v1
    #[arg(long)]
    endpoint: String,

    /// API token; falls back to the L7SYNC_TOKEN environment variable
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Converge the remote resource to the declared configuration
    Converge {
        /// Declared configuration (TOML)
        #[arg(long)]
        config: PathBuf,

        /// State file (JSON); created on first run, rewritten on success
        #[arg(long)]
        state: PathBuf,
    },
    /// Delete the remote resource recorded in the state file
    Destroy {
        /// State file written by a previous converge
        #[arg(long)]
        state: PathBuf,
    },
    /// Print the remote resource as JSON
    Status {
        #[arg(long)]
        resource_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "l7sync=info,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let token = match args.token {
        Some(token) => token,
        None => std::env::var("L7SYNC_TOKEN")
            .context("no --token given and L7SYNC_TOKEN is not set")?,
    };
    let client = Client::new(&args.endpoint, token)?;

    match args.command {
        Command::Converge { config, state } => {
            let spec = files::load_spec(&config)?;
            let last = files::load_state(&state)?;

            client.echo().await.context("API connectivity check failed")?;

            let converger = Converger::new(client);
            let new_state = converger.converge(&spec, last.as_ref()).await?;
            info!(
                resource_id = new_state.resource_id(),
                origins = new_state.origins.len(),
                "converged"
            );
            files::save_state(&state, &new_state)?;
        }
        Command::Destroy { state } => {
            let Some(last) = files::load_state(&state)? else {
                bail!("state file {} does not exist", state.display());
            };
            let converger = Converger::new(client);
            converger.destroy(last.resource_id()).await?;
            std::fs::remove_file(&state)
                .with_context(|| format!("cannot remove state {}", state.display()))?;
            info!(resource_id = last.resource_id(), "destroyed");
        }
        Command::Status { resource_id } => {
            let item = l7resource::get_by_id(&client, resource_id).await?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
    }

    Ok(())
}

// ============================================
// File: crates/deco-client/src/main.rs
// ============================================
//! # Deco CLI Entry Point
//!
//! ## Creation Reason
//! Command-line driver for the Deco client: logs in and prints endpoint
//! results as pretty JSON.
//!
//! ## Main Functionality
//! - CLI argument parsing with clap
//! - Logging initialization with tracing
//! - Configuration loading with CLI overrides
//! - One subcommand per typed endpoint, plus `custom` and `dump`
//!
//! ## Usage
//! ```bash
//! export DECO_PASSWORD='...'
//!
//! deco performance                       # CPU / memory of the main node
//! deco --host 192.168.68.1 devices       # mesh nodes
//! deco clients                           # connected clients
//! deco reboot aa:bb:cc:dd:ee:ff          # reboot one or more nodes
//! deco custom --path /admin/wireless --form wlan
//! deco dump                              # every known endpoint
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - JSON goes to stdout, logs go to stderr; keep it that way so the
//!   output can be piped
//! - Never log or echo the password
//!
//! ## Last Modified
//! v0.1.0 - Initial CLI implementation

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use deco_client::{ClientConfig, DecoClient, KnownEndpoint, MacAddress};

/// Default body for `custom` when none is given.
const READ_BODY: &str = r#"{"operation":"read"}"#;

// ============================================
// CLI Definition
// ============================================

/// Deco mesh router management client
#[derive(Parser, Debug)]
#[command(name = "deco")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Device host name or IP (overrides the config file)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Admin password
    #[arg(short, long, env = "DECO_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show CPU and memory usage
    Performance,

    /// List mesh nodes
    Devices,

    /// List connected clients
    Clients,

    /// Reboot nodes by MAC address
    Reboot {
        /// MAC addresses (case-insensitive, ':' or '-' separated)
        #[arg(required = true)]
        macs: Vec<MacAddress>,
    },

    /// Send an arbitrary request
    Custom {
        /// Path below the session token, e.g. /admin/wireless
        #[arg(long)]
        path: String,

        /// Value of the form query parameter
        #[arg(long)]
        form: String,

        /// JSON request body
        #[arg(long, default_value = READ_BODY)]
        body: String,
    },

    /// Print every known endpoint
    Dump,
}

// ============================================
// Main
// ============================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            init_logging(cli.log_level.as_deref().unwrap_or("info"));
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(cli.log_level.as_deref().unwrap_or(&config.logging.level));

    if let Err(e) = run(cli, config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> anyhow::Result<()> {
    let password = cli
        .password
        .context("password required: pass --password or set DECO_PASSWORD")?;

    let client = DecoClient::new(&config).context("failed to create client")?;
    client
        .authenticate(&password)
        .await
        .context("authentication failed")?;

    match cli.command {
        Commands::Performance => print_json(&client.performance().await?),
        Commands::Devices => print_json(&client.device_list().await?),
        Commands::Clients => print_json(&client.client_list().await?),
        Commands::Reboot { macs } => print_json(&client.reboot(&macs).await?.to_json()),
        Commands::Custom { path, form, body } => {
            print_json(&client.custom(&path, &form, &body).await?.to_json())
        }
        Commands::Dump => cmd_dump(&client).await,
    }
}

// ============================================
// Commands
// ============================================

/// Walks the endpoint catalog; a failing endpoint is logged and skipped.
async fn cmd_dump(client: &DecoClient) -> anyhow::Result<()> {
    let mut failed = 0usize;
    for endpoint in KnownEndpoint::ALL {
        println!("[+] {endpoint}");
        match client.fetch(endpoint).await {
            Ok(result) => {
                print_json(&result.to_json())?;
                println!();
            }
            Err(e) => {
                failed += 1;
                warn!(endpoint = %endpoint, "Fetch failed: {}", e);
            }
        }
    }
    info!(
        total = KnownEndpoint::ALL.len(),
        failed, "Dump finished"
    );
    Ok(())
}

// ============================================
// Helpers
// ============================================

/// Initializes the logging system.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .ok();
}

/// Loads the config file if given, then applies CLI overrides.
async fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path).await?,
        None => ClientConfig::default(),
    };
    if let Some(host) = &cli.host {
        config.device.host.clone_from(host);
    }
    config.validate()?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//! PDU CLI - Command-line tool for CyberPower PDU outlet control
//!
//! Reads and switches outlets over SNMP or the telnet console.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cyberpower_pdu::{BackendKind, CyberPowerPdu, OutletCommand, PduBackend, SimulatedPdu};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "pdu-cli")]
#[command(author, version, about = "CyberPower PDU outlet control")]
#[command(propagate_version = true)]
struct Cli {
    /// PDU IP address or hostname
    #[arg(short = 'H', long, env = "CYBERPOWER_PDU_HOST")]
    host: Option<String>,

    /// Wire protocol: snmp or telnet
    #[arg(short, long)]
    protocol: Option<BackendKind>,

    /// Configuration file path
    #[arg(short, long, env = "CYBERPOWER_PDU_CONFIG")]
    config: Option<PathBuf>,

    /// Use an in-memory PDU instead of real hardware
    #[arg(long)]
    simulate: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show protocol and outlet/bank inventory
    Info,

    /// Read one outlet
    State {
        /// Outlet number (1-based)
        #[arg(allow_negative_numbers = true)]
        outlet: i64,
    },

    /// Read every outlet
    States,

    /// Switch an outlet and confirm the new state
    Set {
        /// Outlet number (1-based)
        #[arg(allow_negative_numbers = true)]
        outlet: i64,

        /// Command: on, off, reboot
        command: OutletCommand,

        /// Seconds to wait before re-reading the outlet
        #[arg(long, default_value = "3")]
        wait: f64,
    },

    /// Read bank load in amps
    Load {
        /// Bank number (1-based); all banks when omitted
        #[arg(allow_negative_numbers = true)]
        bank: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    if cli.log_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    let (mut pdu, target, output, no_color): (Box<dyn PduBackend>, String, Option<String>, bool) =
        if cli.simulate {
            (
                Box::new(SimulatedPdu::default()),
                "simulated".to_string(),
                cli.output.map(|o| o.as_str().to_string()).or(config.output),
                cli.no_color || config.no_color.unwrap_or(false),
            )
        } else {
            let merged = config.merge_with_args(
                cli.host.as_deref(),
                cli.protocol,
                cli.output.map(OutputFormat::as_str),
                cli.no_color,
            )?;
            let target = format!("{} ({})", merged.pdu.host(), merged.pdu.kind());
            let pdu = CyberPowerPdu::from_config(merged.pdu)
                .context("Failed to create PDU client")?;
            (Box::new(pdu), target, Some(merged.output), merged.no_color)
        };

    let format = match output.as_deref() {
        Some(name) => OutputFormat::from_str(name, true)
            .map_err(|e| anyhow::anyhow!("Invalid output format '{}': {}", name, e))?,
        None => OutputFormat::default(),
    };
    let ctx = OutputContext::new(format, no_color, cli.quiet);

    pdu.initialize()
        .await
        .with_context(|| format!("Not connected: unable to initialize PDU at {}", target))?;

    let result = run(&cli.command, pdu.as_ref(), &target, &ctx).await;

    if let Err(e) = pdu.close().await {
        warn!(error = %e, "Failed to close PDU session");
    }

    result
}

/// Execute one subcommand against an initialized PDU
async fn run(
    command: &Commands,
    pdu: &dyn PduBackend,
    target: &str,
    ctx: &OutputContext,
) -> Result<()> {
    match command {
        Commands::Info => commands::info(pdu, target, ctx).await,

        Commands::State { outlet } => commands::state(pdu, *outlet, ctx).await,

        Commands::States => commands::states(pdu, ctx).await,

        Commands::Set {
            outlet,
            command,
            wait,
        } => {
            let wait = Duration::try_from_secs_f64(*wait)
                .with_context(|| format!("Invalid wait time: {}", wait))?;
            commands::set(pdu, *outlet, *command, wait, ctx).await
        }

        Commands::Load { bank } => commands::load(pdu, *bank, ctx).await,
    }
}

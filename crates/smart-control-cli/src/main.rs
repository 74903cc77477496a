//! smart-control: run a gesture control mode against a landmark stream
//!
//! Hand detection and OS actuation are external: frames come from a replay
//! file or the keyboard simulator, and every action is written to stdout as
//! one JSON line for an actuator process to perform. Logs go to stderr.
//!
//! Usage:
//!   smart-control modes
//!   smart-control check-config
//!   smart-control run mouse --replay session.jsonl
//!   smart-control run presentation --sim

mod output;
mod replay;
mod simulate;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use smart_control_config::AppConfig;
use smart_control_core::{run, ModeKind, RunSummary, StopReason};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::output::JsonLinesDispatcher;
use crate::replay::ReplaySource;
use crate::simulate::SimSource;

#[derive(Parser, Debug)]
#[command(name = "smart-control", version, about = "Hand-gesture control engine")]
struct Cli {
    /// Configuration file (default: $SMART_CONTROL_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (overrides [logging].level)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the control modes and their gestures
    Modes,

    /// Load and validate the configuration, then print the effective values
    CheckConfig,

    /// Run a control mode until interrupted or the frame source ends
    Run {
        /// mouse, keyboard, media, volume or presentation
        mode: String,

        /// Replay a JSON-lines landmark recording
        #[arg(long, conflicts_with = "sim")]
        replay: Option<PathBuf>,

        /// Pace the replay by its recorded timestamps
        #[arg(long, requires = "replay")]
        realtime: bool,

        /// Drive a synthetic hand from the keyboard
        #[arg(long)]
        sim: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, origin) =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    match &origin {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("Using built-in configuration defaults"),
    }

    match cli.command {
        Command::Modes => {
            for kind in ModeKind::ALL {
                println!("{}", kind);
                for line in kind.gesture_help().lines() {
                    println!("    {}", line.trim());
                }
                println!();
            }
            Ok(())
        }
        Command::CheckConfig => {
            config.validate().context("Configuration is invalid")?;
            match origin {
                Some(path) => println!("# {}", path.display()),
                None => println!("# built-in defaults"),
            }
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Command::Run {
            mode,
            replay,
            realtime,
            sim,
        } => {
            let kind: ModeKind = mode.parse()?;
            let summary = match (replay, sim) {
                (Some(path), _) => {
                    let mut source = ReplaySource::open(&path, realtime).await?;
                    let mut dispatcher = JsonLinesDispatcher::stdout();
                    run(kind, &config, &mut source, &mut dispatcher, interrupt_channel()).await?
                }
                (None, true) => {
                    eprintln!("{}\n\n{}\n", kind, kind.gesture_help());
                    eprintln!("Simulator: arrows move, 0-5 fingers, t thumb, v peace, u thumbs-up,");
                    eprintln!("p/m/r pinches, [ ] span, h hide hand, q quit");
                    let mut source = SimSource::new().context("Failed to enter raw terminal mode")?;
                    let mut dispatcher = JsonLinesDispatcher::stdout().with_crlf();
                    run(kind, &config, &mut source, &mut dispatcher, interrupt_channel()).await?
                }
                (None, false) => bail!("No frame source: pass --replay FILE or --sim"),
            };
            report(&summary);
            Ok(())
        }
    }
}

/// Cancellation channel flipped by Ctrl-C
fn interrupt_channel() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, stopping");
                let _ = tx.send(true);
            }
            Err(e) => {
                warn!("Cannot listen for Ctrl-C: {}", e);
                // Keep the sender alive so the run is not cancelled
                std::future::pending::<()>().await;
            }
        }
    });
    rx
}

fn report(summary: &RunSummary) {
    match &summary.stop_reason {
        StopReason::CaptureFailed(reason) => warn!(
            "{} mode ended on capture failure after {} frames: {}",
            summary.mode, summary.frames, reason
        ),
        reason => info!(
            "{} mode finished ({:?}): {} frames, {} with a hand, {} actions",
            summary.mode, reason, summary.frames, summary.hand_frames, summary.events
        ),
    }
}

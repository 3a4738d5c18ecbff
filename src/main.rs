//! keysession CLI
//!
//! Session-segmented keystroke journal for Linux input devices.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use keysession::{
    collector::{detect_keyboards, DeviceReader},
    config::Config,
    context::default_prober,
    core::{Pipeline, SystemClock, SESSION_IDLE_THRESHOLD_SECS},
    sink::LogSink,
    stats::{create_shared_stats, SharedStats},
    VERSION,
};

#[derive(Parser)]
#[command(name = "keysession")]
#[command(version = VERSION)]
#[command(about = "Session-segmented keystroke journal for Linux input devices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start logging keys from an input device
    Start {
        /// Input device node (auto-detected if omitted)
        #[arg(long, short)]
        device: Option<PathBuf>,

        /// Log file to append to
        #[arg(long, short)]
        log_file: Option<PathBuf>,
    },

    /// List detected keyboard devices
    Devices,

    /// Show configuration
    Config,

    /// Persist device and log paths as the defaults
    SaveConfig {
        #[arg(long, short)]
        device: Option<PathBuf>,

        #[arg(long, short)]
        log_file: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Start { device, log_file } => cmd_start(device, log_file),
        Commands::Devices => cmd_devices(),
        Commands::Config => cmd_config(),
        Commands::SaveConfig { device, log_file } => cmd_save_config(device, log_file),
    };

    if let Err(e) = result {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

fn cmd_start(device: Option<PathBuf>, log_file: Option<PathBuf>) -> Result<()> {
    let config = Config::load()
        .context("Failed to load configuration")?
        .with_overrides(device, log_file);

    let device_path = match config.device_path {
        Some(path) => path,
        None => {
            let keyboards = detect_keyboards().context("Failed to list input devices")?;
            match keyboards.into_iter().next() {
                Some(keyboard) => {
                    tracing::info!(name = %keyboard.name, "Using detected keyboard");
                    keyboard.path
                }
                None => bail!("No keyboard device found; pass --device"),
            }
        }
    };

    let source = DeviceReader::open(&device_path)
        .with_context(|| format!("Failed to open {}", device_path.display()))?;
    let sink = LogSink::open_append(&config.log_path)?;

    println!("keysession v{VERSION}");
    println!("  Device: {}", device_path.display());
    println!("  Log file: {}", config.log_path.display());
    println!("  Session idle gap: {SESSION_IDLE_THRESHOLD_SECS}s");
    println!();
    println!("Press Ctrl+C to stop");

    let stats = create_shared_stats();
    ctrlc_handler(stats.clone());

    let mut pipeline =
        Pipeline::new(source, sink, default_prober(), SystemClock).with_stats(stats.clone());
    let result = pipeline.run();

    println!();
    println!("{}", stats.summary());
    result.context("Capture stopped")
}

fn cmd_devices() -> Result<()> {
    let keyboards = detect_keyboards().context("Failed to list input devices")?;
    if keyboards.is_empty() {
        println!("No keyboard devices found.");
        return Ok(());
    }

    println!("Detected keyboards:");
    for keyboard in keyboards {
        println!("  {}  {}", keyboard.path.display(), keyboard.name);
    }
    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_save_config(device: Option<PathBuf>, log_file: Option<PathBuf>) -> Result<()> {
    let config = Config::load()
        .unwrap_or_default()
        .with_overrides(device, log_file);
    config.save().context("Failed to save configuration")?;
    println!("Saved configuration to {:?}", Config::config_path());
    Ok(())
}

/// Print the run summary and exit on Ctrl+C.
///
/// The loop is usually blocked on a device read, and the log is written
/// unbuffered, so exiting from the handler loses nothing.
fn ctrlc_handler(stats: SharedStats) {
    let result = ctrlc::set_handler(move || {
        println!();
        println!("Stopping capture...");
        println!("{}", stats.summary());
        std::process::exit(0);
    });
    if let Err(e) = result {
        tracing::warn!("Could not install Ctrl+C handler: {e}");
    }
}

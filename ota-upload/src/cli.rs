// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use log::{info, LevelFilter};

use ota_common::DEFAULT_TIMEOUT_SECS;

use crate::commands::{self, Firmware, UploadOptions};
use crate::console::ConsoleProgress;
use crate::error::UploadError;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "ota-upload", version)]
#[command(about = "Push a firmware image to an OTA receiver over TCP")]
pub struct Cli {
    /// Device address (hostname or IP)
    #[arg(value_name = "IP")]
    pub address: String,

    /// Device TCP port
    #[arg(value_name = "PORT")]
    pub port: u16,

    /// Firmware binary file
    #[arg(value_name = "FIRMWARE_BIN")]
    pub firmware: PathBuf,

    /// Connect and write timeout in seconds
    #[arg(
        short,
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Parse the process arguments.
///
/// Usage errors exit with status 1; `--help` and `--version` exit with 0.
/// Clap prints usage errors on stderr, while upload errors go to stdout.
pub fn parse() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
        _ => {
            let _ = e.print();
            std::process::exit(1);
        }
    })
}

/// Route `log` records to stderr at a level picked by `-v`.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

/// Execute the parsed CLI command.
pub fn run(cli: Cli) -> Result<ExitCode> {
    if !cli.firmware.exists() {
        println!("Error: {}", UploadError::NotFound(cli.firmware));
        return Ok(ExitCode::FAILURE);
    }

    let options = UploadOptions {
        timeout: Duration::from_secs(cli.timeout),
    };
    let progress = ConsoleProgress::new()?;

    let result = Firmware::load(&cli.firmware).and_then(|firmware| {
        println!("Connecting to {}:{}...", cli.address, cli.port);
        commands::send(&cli.address, cli.port, &firmware, &options, progress)
    });
    match result {
        Ok(report) => {
            info!(
                "sent header {:02x?} and {} bytes in {} chunks",
                report.header, report.bytes_sent, report.chunks
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("Error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

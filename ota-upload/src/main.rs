// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Firmware upload tool for OTA receivers listening on a TCP socket.
//!
//! Usage:
//!   ota-upload 192.168.1.50 3232 firmware.bin
//!   ota-upload --timeout 30 -v esp32.local 3232 firmware.bin

use std::process::ExitCode;

use anyhow::Result;

use ota_upload::cli;

fn main() -> Result<ExitCode> {
    let args = cli::parse();
    cli::init_logging(args.verbose);
    cli::run(args)
}

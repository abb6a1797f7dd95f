// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Host side of the OTA firmware push: push a firmware image to a device
//! listening on a TCP port.

pub mod cli;
pub mod commands;
pub mod console;
pub mod error;
pub mod transport;

pub use commands::{send, upload, Firmware, UploadOptions};
pub use error::UploadError;

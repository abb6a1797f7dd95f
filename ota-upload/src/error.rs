// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

use std::io;
use std::path::PathBuf;

use ota_common::TransferError;
use thiserror::Error;

/// Everything that can stop an upload. Each variant renders as one line.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Firmware file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    ReadFirmware {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to resolve {target}: {source}")]
    Resolve {
        target: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

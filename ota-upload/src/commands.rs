// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! The upload operation: read the image, connect, stream it to the device.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;

use ota_common::protocol::check_payload_len;
use ota_common::{send_firmware, ProgressObserver, TransferError, TransferReport};

use crate::error::UploadError;
use crate::transport::{Transport, DEFAULT_TIMEOUT};

/// Runtime settings for an upload.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Applied to connect, and to every socket write.
    pub timeout: Duration,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A firmware image held fully in memory.
#[derive(Debug)]
pub struct Firmware {
    path: PathBuf,
    data: Vec<u8>,
}

impl Firmware {
    /// Read the whole image at `path`.
    ///
    /// Images too large for the 32-bit length header are rejected from their
    /// metadata, before any byte is read.
    pub fn load(path: &Path) -> Result<Self, UploadError> {
        let read_err = |source| UploadError::ReadFirmware {
            path: path.to_path_buf(),
            source,
        };

        let len = fs::metadata(path).map_err(read_err)?.len();
        check_payload_len(len).map_err(TransferError::from)?;

        let data = fs::read(path).map_err(read_err)?;
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Upload the firmware at `firmware_path` to `address:port`.
///
/// The image is read completely before any connection is attempted.
pub fn upload<O: ProgressObserver>(
    address: &str,
    port: u16,
    firmware_path: &Path,
    options: &UploadOptions,
    observer: O,
) -> Result<TransferReport, UploadError> {
    let firmware = Firmware::load(firmware_path)?;
    send(address, port, &firmware, options, observer)
}

/// Push an already loaded image to `address:port`.
///
/// The connection is closed whether the transfer succeeds or not. Nothing is
/// read back from the device, so success means every byte was handed to the
/// OS, not that the device accepted the image.
pub fn send<O: ProgressObserver>(
    address: &str,
    port: u16,
    firmware: &Firmware,
    options: &UploadOptions,
    observer: O,
) -> Result<TransferReport, UploadError> {
    info!(
        "firmware {} loaded ({} bytes)",
        firmware.path().display(),
        firmware.len()
    );

    let mut transport = Transport::with_timeout(address, port, options.timeout)?;
    info!("connected to {}", transport.peer_addr());

    let result = send_firmware(&mut transport, firmware.as_bytes(), observer);
    info!(
        "{} bytes written to {}",
        transport.bytes_sent(),
        transport.peer_addr()
    );
    transport.close();

    Ok(result?)
}

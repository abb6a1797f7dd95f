// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Common types and utilities for the OTA firmware push protocol.
//!
//! This crate supports both `no_std` (embedded receiver) and `std` (host) environments:
//! - Default: `std` feature, enabling stream transfer over `std::io` and typed errors
//! - `default-features = false`: `no_std`, header codec and progress model only

#![cfg_attr(not(feature = "std"), no_std)]

pub mod progress;
pub mod protocol;

#[cfg(feature = "std")]
pub mod error;
#[cfg(feature = "std")]
pub mod transfer;

// Re-export commonly used types
pub use progress::{NoProgress, Progress, ProgressObserver};
pub use protocol::{decode_header, encode_header, PayloadTooLarge};
pub use protocol::{CHUNK_SIZE, DEFAULT_TIMEOUT_SECS, HEADER_LEN, MAX_PAYLOAD_LEN};

#[cfg(feature = "std")]
pub use error::TransferError;
#[cfg(feature = "std")]
pub use transfer::{read_firmware, send_firmware, TransferReport};

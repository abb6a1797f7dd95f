// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Wire format shared by the uploader and the receiving device.
//!
//! A transfer is a 4-byte little-endian length header followed by exactly that
//! many payload bytes. There is no magic, version field, checksum or trailer,
//! and nothing is sent back by the device.

use core::fmt;

// --- Wire constants ---

/// Size of the length prefix in bytes.
pub const HEADER_LEN: usize = 4;

/// Payload bytes written per I/O operation.
pub const CHUNK_SIZE: usize = 1024;

/// Largest payload the 32-bit header can describe.
pub const MAX_PAYLOAD_LEN: u64 = u32::MAX as u64;

/// Default connect/read/write timeout for a transfer session.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// --- Header codec ---

/// Payload length does not fit in the 32-bit header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadTooLarge {
    pub len: u64,
}

impl fmt::Display for PayloadTooLarge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "firmware is {} bytes, the length header allows at most {} bytes",
            self.len, MAX_PAYLOAD_LEN
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PayloadTooLarge {}

/// Check that a payload of `len` bytes can be announced in the header.
pub fn check_payload_len(len: u64) -> Result<u32, PayloadTooLarge> {
    u32::try_from(len).map_err(|_| PayloadTooLarge { len })
}

/// Encode the payload length as the 4-byte little-endian header.
pub fn encode_header(len: usize) -> Result<[u8; HEADER_LEN], PayloadTooLarge> {
    let len = check_payload_len(len as u64)?;
    Ok(len.to_le_bytes())
}

/// Decode a received header back into the announced payload length.
pub fn decode_header(header: [u8; HEADER_LEN]) -> u32 {
    u32::from_le_bytes(header)
}

/// Number of chunk writes needed for a payload of `len` bytes.
pub fn chunk_count(len: usize) -> usize {
    len.div_ceil(CHUNK_SIZE)
}

/// Integer floor of `sent * 100 / total`. An empty payload is 100% done.
pub fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    // u128 keeps `sent * 100` exact for any u64 pair
    let pct = (sent.min(total) as u128 * 100) / total as u128;
    pct as u8
}

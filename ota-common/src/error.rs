// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Errors raised while moving a firmware image over a byte stream.

use std::io;

use thiserror::Error;

use crate::protocol::PayloadTooLarge;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error(transparent)]
    PayloadTooLarge(#[from] PayloadTooLarge),
    #[error("failed to send length header: {0}")]
    Header(#[source] io::Error),
    #[error("write failed after {sent} of {total} bytes: {source}")]
    Write {
        sent: u64,
        total: u64,
        #[source]
        source: io::Error,
    },
    #[error("failed to read length header: {0}")]
    ReadHeader(#[source] io::Error),
    #[error("stream ended after {received} of {expected} bytes")]
    Truncated { expected: u32, received: u64 },
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
}

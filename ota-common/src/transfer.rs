// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Length-prefixed firmware transfer over any byte stream.

use std::io::{ErrorKind, Read, Write};

use log::{debug, trace};

use crate::error::TransferError;
use crate::progress::{Progress, ProgressObserver};
use crate::protocol::{decode_header, encode_header, CHUNK_SIZE, HEADER_LEN};

/// Summary of a completed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReport {
    /// Header bytes exactly as written.
    pub header: [u8; HEADER_LEN],
    /// Payload bytes written after the header.
    pub bytes_sent: u64,
    /// Number of chunk writes.
    pub chunks: usize,
}

/// Write `payload` to `writer` as header + chunked body.
///
/// The observer is told about every chunk once it has been fully written.
/// Nothing is read back from the writer's peer.
pub fn send_firmware<W, O>(
    writer: &mut W,
    payload: &[u8],
    mut observer: O,
) -> Result<TransferReport, TransferError>
where
    W: Write + ?Sized,
    O: ProgressObserver,
{
    let header = encode_header(payload.len())?;
    let total = payload.len() as u64;

    observer.on_start(total);

    writer.write_all(&header).map_err(TransferError::Header)?;
    debug!("header sent: {:02x?} ({} bytes announced)", header, total);

    let mut sent = 0u64;
    let mut chunks = 0usize;
    for chunk in payload.chunks(CHUNK_SIZE) {
        writer
            .write_all(chunk)
            .map_err(|source| TransferError::Write {
                sent,
                total,
                source,
            })?;
        sent += chunk.len() as u64;
        chunks += 1;
        trace!("chunk {} written ({}/{} bytes)", chunks, sent, total);
        observer.on_chunk(Progress::new(sent, total));
    }

    writer.flush().map_err(|source| TransferError::Write {
        sent,
        total,
        source,
    })?;

    observer.on_complete(total);

    Ok(TransferReport {
        header,
        bytes_sent: sent,
        chunks,
    })
}

/// Read one transfer from `reader`: the length header, then exactly that many bytes.
///
/// This is what a receiving device does with the stream produced by [`send_firmware`].
pub fn read_firmware<R>(reader: &mut R) -> Result<Vec<u8>, TransferError>
where
    R: Read + ?Sized,
{
    let mut header = [0u8; HEADER_LEN];
    reader
        .read_exact(&mut header)
        .map_err(TransferError::ReadHeader)?;
    let expected = decode_header(header);
    debug!("header received: {} bytes announced", expected);

    let mut payload = Vec::with_capacity(expected as usize);
    let mut buf = [0u8; CHUNK_SIZE];
    while (payload.len() as u64) < expected as u64 {
        let remaining = expected as usize - payload.len();
        let want = remaining.min(CHUNK_SIZE);
        match reader.read(&mut buf[..want]) {
            Ok(0) => {
                return Err(TransferError::Truncated {
                    expected,
                    received: payload.len() as u64,
                })
            }
            Ok(n) => payload.extend_from_slice(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(TransferError::Read(e)),
        }
    }

    Ok(payload)
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Transfer progress reporting.

use crate::protocol::percent;

/// Snapshot taken after a chunk has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub sent: u64,
    pub total: u64,
}

impl Progress {
    pub fn new(sent: u64, total: u64) -> Self {
        Self { sent, total }
    }

    pub fn percent(&self) -> u8 {
        percent(self.sent, self.total)
    }

    pub fn is_complete(&self) -> bool {
        self.sent >= self.total
    }
}

/// Receives progress events from a transfer.
///
/// Presentation (console line, progress bar, nothing at all) is up to the
/// implementor; the transfer itself never touches the terminal.
pub trait ProgressObserver {
    /// Called once before the header is written.
    fn on_start(&mut self, _total: u64) {}

    /// Called after each chunk has been fully written.
    fn on_chunk(&mut self, _progress: Progress) {}

    /// Called once after the last chunk, before the connection is closed.
    fn on_complete(&mut self, _total: u64) {}
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

impl<T: ProgressObserver + ?Sized> ProgressObserver for &mut T {
    fn on_start(&mut self, total: u64) {
        (**self).on_start(total)
    }

    fn on_chunk(&mut self, progress: Progress) {
        (**self).on_chunk(progress)
    }

    fn on_complete(&mut self, total: u64) {
        (**self).on_complete(total)
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Console rendering of upload progress.

use std::io::{self, IsTerminal, Write};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use ota_common::{Progress, ProgressObserver};

/// Progress line shown while chunks go out.
pub fn progress_line(progress: Progress) -> String {
    format!(
        "Uploaded {}/{} bytes ({}%)",
        progress.sent,
        progress.total,
        progress.percent()
    )
}

/// Final line once the whole image has been written.
pub fn complete_line(total: u64) -> String {
    format!("Upload complete! ({} bytes)", total)
}

enum Output {
    /// Interactive terminal, redrawn by indicatif.
    Bar(ProgressBar),
    /// Pipe or file: one `\r`-prefixed line per chunk.
    Plain,
}

/// Rewrites a single stdout line in place for every chunk.
pub struct ConsoleProgress {
    output: Output,
    line_open: bool,
}

impl ConsoleProgress {
    pub fn new() -> Result<Self> {
        if io::stdout().is_terminal() {
            Self::terminal()
        } else {
            Ok(Self::plain())
        }
    }

    /// Render through an indicatif bar on stdout.
    pub fn terminal() -> Result<Self> {
        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
        pb.set_style(ProgressStyle::with_template("{msg}")?);
        Ok(Self {
            output: Output::Bar(pb),
            line_open: false,
        })
    }

    /// Write every update straight to stdout, carriage return first.
    pub fn plain() -> Self {
        Self {
            output: Output::Plain,
            line_open: false,
        }
    }

    fn end_line(&mut self) {
        if self.line_open {
            println!();
            self.line_open = false;
        }
    }
}

impl ProgressObserver for ConsoleProgress {
    fn on_start(&mut self, total: u64) {
        if let Output::Bar(pb) = &self.output {
            pb.set_length(total);
        }
    }

    fn on_chunk(&mut self, progress: Progress) {
        match &self.output {
            Output::Bar(pb) => {
                pb.set_position(progress.sent);
                pb.set_message(progress_line(progress));
            }
            Output::Plain => {
                let mut stdout = io::stdout().lock();
                // Progress is best effort; a closed stdout must not abort the upload.
                let _ = write!(stdout, "\r{}", progress_line(progress));
                let _ = stdout.flush();
                self.line_open = true;
            }
        }
    }

    fn on_complete(&mut self, total: u64) {
        match &self.output {
            Output::Bar(pb) if total == 0 => pb.finish_and_clear(),
            Output::Bar(pb) => pb.finish(),
            Output::Plain => self.end_line(),
        }
        println!("{}", complete_line(total));
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        // Keep the last progress line above whatever error follows.
        match &self.output {
            Output::Bar(pb) if !pb.is_finished() => pb.abandon(),
            Output::Bar(_) => {}
            Output::Plain => self.end_line(),
        }
    }
}

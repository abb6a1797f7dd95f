// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! TCP transport to the OTA receiver.

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, warn};

use ota_common::DEFAULT_TIMEOUT_SECS;

use crate::error::UploadError;

/// Default timeout for connect and socket operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// One outbound connection to the device. Closed on drop.
pub struct Transport {
    stream: TcpStream,
    peer: SocketAddr,
    timeout: Duration,
    bytes_sent: u64,
}

impl Transport {
    /// Connect to `address:port` using the default timeout.
    pub fn connect(address: &str, port: u16) -> Result<Self, UploadError> {
        Self::with_timeout(address, port, DEFAULT_TIMEOUT)
    }

    /// Connect with a custom timeout, applied to connect, reads and writes.
    ///
    /// `address` may be a hostname or a literal IP. Every resolved address is
    /// tried in order and the last failure is reported.
    pub fn with_timeout(address: &str, port: u16, timeout: Duration) -> Result<Self, UploadError> {
        let target = format!("{}:{}", address, port);
        let addrs: Vec<SocketAddr> = (address, port)
            .to_socket_addrs()
            .map_err(|source| UploadError::Resolve {
                target: target.clone(),
                source,
            })?
            .collect();
        debug!("{} resolved to {:?}", target, addrs);

        let mut last_err =
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no addresses to connect to");
        for addr in addrs {
            debug!("connecting to {} (timeout {:?})", addr, timeout);
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Self::configure(stream, addr, timeout, &target),
                Err(e) => {
                    debug!("connect to {} failed: {}", addr, e);
                    last_err = e;
                }
            }
        }

        Err(UploadError::Connect {
            target,
            source: last_err,
        })
    }

    fn configure(
        stream: TcpStream,
        peer: SocketAddr,
        timeout: Duration,
        target: &str,
    ) -> Result<Self, UploadError> {
        let connect_err = |source| UploadError::Connect {
            target: target.to_string(),
            source,
        };
        stream.set_write_timeout(Some(timeout)).map_err(connect_err)?;
        stream.set_read_timeout(Some(timeout)).map_err(connect_err)?;
        stream.set_nodelay(true).map_err(connect_err)?;

        Ok(Self {
            stream,
            peer,
            timeout,
            bytes_sent: 0,
        })
    }

    /// Address of the connected device.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Timeout applied to each socket operation.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Bytes written on this connection so far, header included.
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// Shut the connection down. The socket is released when `self` drops.
    pub fn close(self) {
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            // The device may already have hung up once it had the full image.
            if e.kind() != io::ErrorKind::NotConnected {
                warn!("failed to shut down connection to {}: {}", self.peer, e);
            }
        }
    }
}

impl Write for Transport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // An expired SO_SNDTIMEO surfaces as EAGAIN on Unix.
        let n = self.stream.write(buf).map_err(|e| match e.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => io::Error::new(
                io::ErrorKind::TimedOut,
                format!("write to {} timed out after {:?}", self.peer, self.timeout),
            ),
            _ => e,
        })?;
        self.bytes_sent += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! End-to-end uploads against a loopback listener standing in for the device.

use std::io;
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tempfile::TempDir;

use ota_common::{
    read_firmware, NoProgress, Progress, ProgressObserver, TransferError, TransferReport,
};
use ota_upload::transport::{Transport, DEFAULT_TIMEOUT};
use ota_upload::{upload, Firmware, UploadError, UploadOptions};

/// Fake device: accepts one connection and returns everything it received.
fn spawn_device() -> (u16, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        read_firmware(&mut stream).unwrap()
    });
    (port, handle)
}

/// Fake device that records the raw stream until the uploader closes it.
fn spawn_raw_device() -> (u16, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut raw = Vec::new();
        io::copy(&mut stream, &mut raw).unwrap();
        raw
    });
    (port, handle)
}

/// A port nothing is listening on.
fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn write_firmware(dir: &TempDir, len: usize) -> (PathBuf, Vec<u8>) {
    let data: Vec<u8> = (0..len).map(|i| (i % 253) as u8).collect();
    let path = dir.path().join("firmware.bin");
    std::fs::write(&path, &data).unwrap();
    (path, data)
}

#[derive(Default)]
struct Recorder {
    chunks: Vec<Progress>,
    completed: Option<u64>,
}

impl ProgressObserver for Recorder {
    fn on_chunk(&mut self, progress: Progress) {
        self.chunks.push(progress);
    }

    fn on_complete(&mut self, total: u64) {
        self.completed = Some(total);
    }
}

fn run_upload(
    port: u16,
    path: &Path,
    observer: impl ProgressObserver,
) -> Result<TransferReport, UploadError> {
    upload("127.0.0.1", port, path, &UploadOptions::default(), observer)
}

// --- Successful uploads ---

#[test]
fn test_upload_empty_firmware() {
    let dir = TempDir::new().unwrap();
    let (path, _) = write_firmware(&dir, 0);
    let (port, device) = spawn_raw_device();
    let mut recorder = Recorder::default();

    let report = run_upload(port, &path, &mut recorder).unwrap();

    assert_eq!(report.header, [0x00, 0x00, 0x00, 0x00]);
    assert_eq!(report.bytes_sent, 0);
    assert_eq!(report.chunks, 0);
    assert!(recorder.chunks.is_empty());
    assert_eq!(recorder.completed, Some(0));
    assert_eq!(device.join().unwrap(), [0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn test_upload_2500_bytes() {
    let dir = TempDir::new().unwrap();
    let (path, data) = write_firmware(&dir, 2500);
    let (port, device) = spawn_raw_device();
    let mut recorder = Recorder::default();

    let report = run_upload(port, &path, &mut recorder).unwrap();

    assert_eq!(report.chunks, 3);
    assert_eq!(report.bytes_sent, 2500);
    let sent: Vec<u64> = recorder.chunks.iter().map(|p| p.sent).collect();
    assert_eq!(sent, [1024, 2048, 2500]);
    assert_eq!(recorder.chunks.last().map(Progress::percent), Some(100));

    let raw = device.join().unwrap();
    assert_eq!(&raw[..4], &[0xC4, 0x09, 0x00, 0x00]);
    assert_eq!(&raw[4..], data.as_slice());
}

#[test]
fn test_device_receives_exact_image() {
    let dir = TempDir::new().unwrap();
    let (path, data) = write_firmware(&dir, 64 * 1024 + 3);
    let (port, device) = spawn_device();

    run_upload(port, &path, NoProgress).unwrap();

    assert_eq!(device.join().unwrap(), data);
}

#[test]
fn test_transport_counts_header_and_body() {
    let (port, device) = spawn_raw_device();
    let mut transport = Transport::connect("127.0.0.1", port).unwrap();

    ota_common::send_firmware(&mut transport, &[0xAA; 10], NoProgress).unwrap();

    assert_eq!(transport.bytes_sent(), 14);
    assert_eq!(transport.peer_addr().port(), port);
    transport.close();
    assert_eq!(device.join().unwrap().len(), 14);
}

// --- Failures ---

#[test]
fn test_missing_firmware_is_read_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.bin");

    let err = run_upload(closed_port(), &path, NoProgress).unwrap_err();

    assert!(matches!(err, UploadError::ReadFirmware { .. }));
    assert!(err.to_string().contains("missing.bin"));
}

#[test]
fn test_directory_is_read_error() {
    let dir = TempDir::new().unwrap();

    let err = Firmware::load(dir.path()).unwrap_err();

    assert!(matches!(err, UploadError::ReadFirmware { .. }));
}

#[test]
fn test_connection_refused() {
    let dir = TempDir::new().unwrap();
    let (path, _) = write_firmware(&dir, 100);
    let port = closed_port();

    let err = run_upload(port, &path, NoProgress).unwrap_err();

    match &err {
        UploadError::Connect { target, source } => {
            assert_eq!(target, &format!("127.0.0.1:{}", port));
            assert_eq!(source.kind(), io::ErrorKind::ConnectionRefused);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_stalled_device_times_out() {
    let dir = TempDir::new().unwrap();
    let (path, _) = write_firmware(&dir, 64 * 1024 * 1024);
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let (done_tx, done_rx) = mpsc::channel::<()>();
    let device = thread::spawn(move || {
        // Accept, then never read until the uploader has given up.
        let (stream, _) = listener.accept().unwrap();
        let _ = done_rx.recv();
        drop::<TcpStream>(stream);
    });

    let options = UploadOptions {
        timeout: Duration::from_secs(1),
    };
    let err = upload("127.0.0.1", port, &path, &options, NoProgress).unwrap_err();
    done_tx.send(()).unwrap();
    device.join().unwrap();

    match &err {
        UploadError::Transfer(TransferError::Write { source, sent, total }) => {
            assert_eq!(source.kind(), io::ErrorKind::TimedOut);
            assert!(sent < total);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("timed out"));
}

#[test]
fn test_peer_closing_early_fails_the_upload() {
    let dir = TempDir::new().unwrap();
    let (path, _) = write_firmware(&dir, 8 * 1024 * 1024);
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let device = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        drop::<TcpStream>(stream);
    });

    let options = UploadOptions {
        timeout: Duration::from_secs(2),
    };
    let err = upload("127.0.0.1", port, &path, &options, NoProgress).unwrap_err();
    device.join().unwrap();

    assert!(matches!(
        err,
        UploadError::Transfer(TransferError::Write { .. } | TransferError::Header(_))
    ));
}

// --- Defaults ---

#[test]
fn test_default_timeout_is_ten_seconds() {
    assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(10));
    assert_eq!(UploadOptions::default().timeout, DEFAULT_TIMEOUT);
}

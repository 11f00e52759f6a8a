//! Logger module
//!
//! Provides logging utilities for the upload server including:
//! - Subscriber setup (stdout or append-only log file)
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Upload lifecycle events

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use crate::error::UploadError;
use crate::upload::UploadedFile;
use std::fs::{File, OpenOptions};
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber
///
/// Should be called once at application startup. `RUST_LOG` wins over the
/// configured level when set.
pub fn init(config: &LoggingConfig) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match &config.log_file {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(open_log_file(path)?))
            .try_init(),
        None => builder.try_init(),
    };
    result.map_err(io::Error::other)
}

/// Open or create a log file for appending
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("Document extraction server started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Upload page:  http://{addr}/");
    tracing::info!("Upload dir:   {}", config.upload.dir.display());
    tracing::info!("Max upload:   {} bytes", config.upload.max_file_size);
    tracing::info!("Format policy: {:?}", config.upload.format_policy);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(max) = config.performance.max_connections {
        tracing::info!("Max connections: {max}");
    }
    tracing::info!("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

pub fn log_upload_received(upload: &UploadedFile) {
    tracing::info!(
        name = upload.original_name.as_deref().unwrap_or("-"),
        declared_type = %upload.declared_type,
        size = upload.size,
        path = %upload.storage.path().display(),
        "[Upload] Received file"
    );
}

pub fn log_upload_rejected(err: &UploadError) {
    match err {
        UploadError::ProcessingFailed(_) | UploadError::TimedOut(_) => {
            tracing::warn!("[Upload] {err}");
        }
        _ => tracing::info!("[Upload] Rejected: {err}"),
    }
}

pub fn log_cleanup_failed(path: &Path, err: &io::Error) {
    tracing::warn!("[Upload] Failed to remove {}: {err}", path.display());
}

pub fn log_shutdown(active: usize) {
    tracing::info!("Shutdown requested, {active} connection(s) still active");
}

pub fn log_page_served(size: usize, is_head: bool) {
    tracing::debug!("[Response] Upload page ({size} bytes, head: {is_head})");
}

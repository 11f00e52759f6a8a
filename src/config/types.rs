// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Transient upload configuration
#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Directory that holds uploads for the lifetime of one request
    pub dir: PathBuf,
    /// Largest accepted file content in bytes
    pub max_file_size: u64,
    #[serde(default)]
    pub format_policy: FormatPolicyKind,
}

/// Room left for multipart boundaries, part headers and small form fields
const MULTIPART_FRAMING: u64 = 16 * 1024;

impl UploadConfig {
    /// Largest accepted request body: a full-size file plus its framing
    pub const fn max_request_size(&self) -> u64 {
        self.max_file_size.saturating_add(MULTIPART_FRAMING)
    }
}

/// How uploaded documents are classified
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormatPolicyKind {
    /// Trust the client-declared MIME type
    #[default]
    Declared,
    /// Check the declared type against the content
    Sniff,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Log file path (optional, stdout if not set)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    /// Seconds a client gets to send each request head, idle keep-alive included
    pub read_timeout: u64,
    /// Seconds allowed to receive and extract one upload
    pub request_timeout: u64,
    pub max_connections: Option<u64>,
    pub shutdown_grace: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
}

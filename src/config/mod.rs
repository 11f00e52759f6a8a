// Configuration module entry point
// Loads layered configuration and holds per-process state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

pub use state::AppState;
pub use types::{Config, FormatPolicyKind, HttpConfig, LoggingConfig, UploadConfig};

/// Environment variable prefix, e.g. `DOCEXTRACT_SERVER__PORT=8080`
const ENV_PREFIX: &str = "DOCEXTRACT";

/// Values supplied on the command line; they win over every other source
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub upload_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the given file path (extension optional),
    /// then environment, then CLI overrides. A missing file is not an error.
    pub fn load_from(config_path: &str, overrides: &Overrides) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("upload.dir", "uploads")?
            .set_default("upload.max_file_size", 10_485_760)? // 10MB
            .set_default("upload.format_policy", "declared")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 60)?
            .set_default("performance.request_timeout", 120)?
            .set_default("performance.shutdown_grace", 10)?
            .set_default("http.server_name", "docextract")?
            .set_default("http.enable_cors", false)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        if let Some(host) = &overrides.host {
            builder = builder.set_override("server.host", host.as_str())?;
        }
        if let Some(port) = overrides.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(dir) = &overrides.upload_dir {
            builder = builder.set_override("upload.dir", dir.to_string_lossy().as_ref())?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

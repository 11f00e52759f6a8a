// Application state module
// Immutable per-process state shared by every connection

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use super::types::Config;
use crate::extract::Extractors;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Format policy plus one extractor per supported format
    pub extractors: Extractors,
    /// Connections currently being served
    pub active_connections: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let extractors = Extractors::with_policy(config.upload.format_policy);
        Self {
            config,
            extractors,
            active_connections: Arc::new(AtomicUsize::new(0)),
        }
    }
}

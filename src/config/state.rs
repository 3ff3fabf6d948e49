// Application state module
// Immutable per-process state shared by every connection

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::types::Config;
use super::ValidationError;
use crate::http::CorsPolicy;

/// Reasons the served state cannot be built at startup
#[derive(Debug)]
pub enum StateError {
    Invalid(ValidationError),
    Root { path: String, source: io::Error },
    RootNotDirectory(PathBuf),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(e) => write!(f, "invalid configuration: {e}"),
            Self::Root { path, source } => {
                write!(f, "cannot open served root '{path}': {source}")
            }
            Self::RootNotDirectory(path) => {
                write!(f, "served root '{}' is not a directory", path.display())
            }
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid(e) => Some(e),
            Self::Root { source, .. } => Some(source),
            Self::RootNotDirectory(_) => None,
        }
    }
}

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical served root; every resolved file must live below it
    pub root: PathBuf,
    pub cors: CorsPolicy,
    /// Connections currently being served
    pub active_connections: Arc<AtomicUsize>,
}

impl AppState {
    /// Validate the configuration and pin the served root
    pub fn new(config: &Config) -> Result<Self, StateError> {
        config.validate().map_err(StateError::Invalid)?;

        let root = std::fs::canonicalize(&config.files.root).map_err(|source| {
            StateError::Root {
                path: config.files.root.clone(),
                source,
            }
        })?;
        if !root.is_dir() {
            return Err(StateError::RootNotDirectory(root));
        }

        Ok(Self {
            config: config.clone(),
            root,
            cors: CorsPolicy::from_config(&config.cors),
            active_connections: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }

    pub fn connection_count(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }
}

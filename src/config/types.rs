// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Static file serving configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FilesConfig {
    /// Directory the responder serves from
    pub root: String,
    /// Document served for `/` and, in SPA mode, for any unmatched path
    pub fallback_document: String,
    /// Serve the fallback document for unmatched paths instead of 404
    pub spa_fallback: bool,
    /// Attach `Cache-Control: no-store, no-cache, must-revalidate` to files
    pub no_cache: bool,
    /// Literal text answered for `GET /` without touching the disk
    #[serde(default)]
    pub root_message: Option<String>,
}

/// CORS header values
#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origin: String,
    pub allow_methods: String,
    pub allow_headers: String,
    /// Status for preflight responses (200 or 204)
    pub preflight_status: u16,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds a single connection may stay open
    pub connection_timeout: u64,
    /// Seconds to wait for open connections after a stop signal
    pub shutdown_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
}

// Configuration module entry point
// Loads layered configuration and builds the immutable runtime state

mod state;
mod types;

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Component, Path};

use hyper::header::HeaderValue;

// Re-export public types
pub use state::{AppState, StateError};
pub use types::{
    Config, CorsConfig, FilesConfig, LoggingConfig, PerformanceConfig, ServerConfig,
};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Environment variable prefix, e.g. `SPA__SERVER__PORT=5000`
const ENV_PREFIX: &str = "SPA";

/// Semantic problems found after deserialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    PreflightStatus(u16),
    FallbackDocument(String),
    ZeroConnectionTimeout,
    ZeroWorkers,
    /// Names the `cors.*` key whose value cannot be sent as a header
    CorsHeader(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreflightStatus(status) => {
                write!(f, "cors.preflight_status must be 200 or 204, got {status}")
            }
            Self::FallbackDocument(name) => write!(
                f,
                "files.fallback_document must be a relative path inside the root, got '{name}'"
            ),
            Self::ZeroConnectionTimeout => {
                write!(f, "performance.connection_timeout must be greater than 0")
            }
            Self::ZeroWorkers => write!(f, "server.workers must be greater than 0"),
            Self::CorsHeader(key) => write!(f, "cors.{key} is not a valid header value"),
        }
    }
}

impl std::error::Error for ValidationError {}

impl Config {
    /// Load configuration from specified file path (without extension)
    /// The file is optional; defaults and environment overrides still apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("files.root", ".")?
            .set_default("files.fallback_document", "index.html")?
            .set_default("files.spa_fallback", true)?
            .set_default("files.no_cache", true)?
            .set_default("cors.allow_origin", "*")?
            .set_default("cors.allow_methods", "GET, POST, OPTIONS")?
            .set_default("cors.allow_headers", "X-Requested-With, Content-Type")?
            .set_default("cors.preflight_status", 204)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 60)?
            .set_default("performance.shutdown_timeout", 10)?
            .build()?;

        settings.try_deserialize()
    }

    /// Accepts IPv4 and IPv6 literals, e.g. `0.0.0.0` or `::`
    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|e| format!("Invalid address '{}': {e}", self.server.host))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Check values that deserialize fine but cannot be served
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !matches!(self.cors.preflight_status, 200 | 204) {
            return Err(ValidationError::PreflightStatus(self.cors.preflight_status));
        }

        let fallback = Path::new(&self.files.fallback_document);
        let plain_relative = !self.files.fallback_document.is_empty()
            && fallback
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain_relative {
            return Err(ValidationError::FallbackDocument(
                self.files.fallback_document.clone(),
            ));
        }

        if self.performance.connection_timeout == 0 {
            return Err(ValidationError::ZeroConnectionTimeout);
        }

        if self.server.workers == Some(0) {
            return Err(ValidationError::ZeroWorkers);
        }

        for (key, value) in [
            ("allow_origin", &self.cors.allow_origin),
            ("allow_methods", &self.cors.allow_methods),
            ("allow_headers", &self.cors.allow_headers),
        ] {
            if HeaderValue::from_str(value).is_err() {
                return Err(ValidationError::CorsHeader(key));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Configuration equal to the built-in defaults, rooted at `root`
    pub fn config_for_root(root: &Path) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            files: FilesConfig {
                root: root.display().to_string(),
                fallback_document: "index.html".to_string(),
                spa_fallback: true,
                no_cache: true,
                root_message: None,
            },
            cors: CorsConfig {
                allow_origin: "*".to_string(),
                allow_methods: "GET, POST, OPTIONS".to_string(),
                allow_headers: "X-Requested-With, Content-Type".to_string(),
                preflight_status: 204,
            },
            logging: LoggingConfig {
                level: "error".to_string(),
                access_log: false,
                access_log_format: "combined".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive: true,
                connection_timeout: 5,
                shutdown_timeout: 1,
                max_connections: None,
            },
        }
    }

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely-missing-config-file").unwrap();
        assert_eq!(cfg.files.fallback_document, "index.html");
        assert!(cfg.files.spa_fallback);
        assert!(cfg.files.root_message.is_none());
        assert_eq!(cfg.cors.allow_origin, "*");
        assert_eq!(cfg.cors.allow_methods, "GET, POST, OPTIONS");
        assert_eq!(cfg.cors.preflight_status, 204);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = config_for_root(Path::new("."));
        cfg.server.port = 8000;
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8000);

        cfg.server.host = "::".to_string();
        let addr = cfg.get_socket_addr().unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.port(), 8000);

        cfg.server.host = "not an address".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }

    #[test]
    fn test_file_values_replace_defaults() {
        let stem = std::env::temp_dir().join(format!(
            "spa-static-server-config-{}",
            std::process::id()
        ));
        let file = stem.with_extension("toml");
        std::fs::write(
            &file,
            r#"
[server]
host = "127.0.0.1"
port = 5000

[files]
spa_fallback = false
root_message = "Hello, from your backend!"

[cors]
preflight_status = 200

[performance]
max_connections = 32
"#,
        )
        .unwrap();

        let cfg = Config::load_from(stem.to_str().unwrap());
        let _ = std::fs::remove_file(&file);
        let cfg = cfg.unwrap();

        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 5000);
        assert!(!cfg.files.spa_fallback);
        assert_eq!(
            cfg.files.root_message.as_deref(),
            Some("Hello, from your backend!")
        );
        assert_eq!(cfg.cors.preflight_status, 200);
        assert_eq!(cfg.performance.max_connections, Some(32));
        // Keys the file leaves out keep their defaults
        assert_eq!(cfg.files.fallback_document, "index.html");
        assert!(cfg.files.no_cache);
        assert_eq!(cfg.cors.allow_origin, "*");
        assert_eq!(cfg.performance.connection_timeout, 60);
    }

    #[test]
    fn test_environment_overrides() {
        // Only this test reads server.workers from a loaded config
        std::env::set_var("SPA__SERVER__WORKERS", "3");
        let cfg = Config::load_from("definitely-missing-config-file");
        std::env::remove_var("SPA__SERVER__WORKERS");

        assert_eq!(cfg.unwrap().server.workers, Some(3));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut cfg = config_for_root(Path::new("."));
        cfg.server.workers = Some(0);
        assert_eq!(cfg.validate(), Err(ValidationError::ZeroWorkers));

        cfg.server.workers = Some(2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_cors_header_values_validated() {
        let mut cfg = config_for_root(Path::new("."));
        cfg.cors.allow_origin = "bad\nvalue".to_string();
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::CorsHeader("allow_origin"))
        );

        let mut cfg = config_for_root(Path::new("."));
        cfg.cors.allow_headers = "X-Requested-With\r\nX-Injected: 1".to_string();
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::CorsHeader("allow_headers"))
        );

        cfg.cors.allow_headers = "X-Requested-With, Content-Type, Authorization".to_string();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_preflight_status_validation() {
        let mut cfg = config_for_root(Path::new("."));
        cfg.cors.preflight_status = 200;
        assert!(cfg.validate().is_ok());

        cfg.cors.preflight_status = 302;
        assert_eq!(cfg.validate(), Err(ValidationError::PreflightStatus(302)));
    }

    #[test]
    fn test_fallback_document_validation() {
        let mut cfg = config_for_root(Path::new("."));
        cfg.files.fallback_document = "app/shell.html".to_string();
        assert!(cfg.validate().is_ok());

        for bad in ["", "../index.html", "/etc/passwd", "./index.html"] {
            cfg.files.fallback_document = bad.to_string();
            assert!(
                matches!(cfg.validate(), Err(ValidationError::FallbackDocument(_))),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn test_zero_connection_timeout_rejected() {
        let mut cfg = config_for_root(Path::new("."));
        cfg.performance.connection_timeout = 0;
        assert_eq!(cfg.validate(), Err(ValidationError::ZeroConnectionTimeout));
    }
}

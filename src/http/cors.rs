//! CORS header policy
//!
//! Every response carries the allowed origin; preflight responses also
//! carry the allowed methods and headers.

use hyper::http::response::Builder;
use hyper::StatusCode;

use crate::config::CorsConfig;

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";

/// Fixed CORS header values applied to responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    pub allow_origin: String,
    pub allow_methods: String,
    pub allow_headers: String,
    pub preflight_status: StatusCode,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_methods: "GET, POST, OPTIONS".to_string(),
            allow_headers: "X-Requested-With, Content-Type".to_string(),
            preflight_status: StatusCode::NO_CONTENT,
        }
    }
}

impl CorsPolicy {
    /// Build the policy from validated configuration
    ///
    /// A preflight status that is not 200 falls back to 204.
    pub fn from_config(config: &CorsConfig) -> Self {
        let preflight_status = if config.preflight_status == 200 {
            StatusCode::OK
        } else {
            StatusCode::NO_CONTENT
        };

        Self {
            allow_origin: config.allow_origin.clone(),
            allow_methods: config.allow_methods.clone(),
            allow_headers: config.allow_headers.clone(),
            preflight_status,
        }
    }

    /// Add the origin header carried by every response
    pub fn apply(&self, builder: Builder) -> Builder {
        builder.header(ALLOW_ORIGIN, self.allow_origin.as_str())
    }

    /// Add the full set of preflight headers
    pub fn preflight(&self, builder: Builder) -> Builder {
        self.apply(builder)
            .header(ALLOW_METHODS, self.allow_methods.as_str())
            .header(ALLOW_HEADERS, self.allow_headers.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Response;

    #[test]
    fn test_apply_adds_only_origin() {
        let policy = CorsPolicy::default();
        let resp = policy.apply(Response::builder()).body(()).unwrap();
        assert_eq!(resp.headers()[ALLOW_ORIGIN], "*");
        assert!(resp.headers().get(ALLOW_METHODS).is_none());
    }

    #[test]
    fn test_preflight_headers() {
        let policy = CorsPolicy::default();
        let resp = policy.preflight(Response::builder()).body(()).unwrap();
        assert_eq!(resp.headers()[ALLOW_ORIGIN], "*");
        assert_eq!(resp.headers()[ALLOW_METHODS], "GET, POST, OPTIONS");
        assert_eq!(
            resp.headers()[ALLOW_HEADERS],
            "X-Requested-With, Content-Type"
        );
    }

    #[test]
    fn test_preflight_status_from_config() {
        let mut config = CorsConfig {
            allow_origin: "https://app.example".to_string(),
            allow_methods: "GET".to_string(),
            allow_headers: "Content-Type".to_string(),
            preflight_status: 200,
        };
        let policy = CorsPolicy::from_config(&config);
        assert_eq!(policy.preflight_status, StatusCode::OK);
        assert_eq!(policy.allow_origin, "https://app.example");

        config.preflight_status = 204;
        assert_eq!(
            CorsPolicy::from_config(&config).preflight_status,
            StatusCode::NO_CONTENT
        );
    }
}

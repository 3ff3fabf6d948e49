//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method dispatch, the optional
//! root message, and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body;
use hyper::http::request::Parts;
use hyper::{Method, Request, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Path with the query string already stripped
    pub path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<HttpResponse, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    drop(body);

    let ctx = RequestContext {
        path: parts.uri.path(),
        is_head: parts.method == Method::HEAD,
    };

    let response = match parts.method {
        Method::OPTIONS => http::build_options_response(&state.cors),
        Method::GET | Method::HEAD => serve_get(&ctx, &state).await,
        _ => {
            logger::log_warning(&format!(
                "Method not allowed: {} {}",
                parts.method, ctx.path
            ));
            http::build_405_response(&state.cors)
        }
    };

    if state.access_log_enabled() {
        log_access(&parts, &response, &state, peer_addr, started);
    }

    Ok(response)
}

/// GET and HEAD: root message first, then the file tree
async fn serve_get(ctx: &RequestContext<'_>, state: &AppState) -> HttpResponse {
    if ctx.path == "/" {
        if let Some(message) = state.config.files.root_message.as_deref() {
            return http::build_text_response(&state.cors, message, ctx.is_head);
        }
    }

    static_files::serve_path(ctx, state).await
}

fn log_access(
    req: &Parts,
    response: &HttpResponse,
    state: &AppState,
    peer_addr: SocketAddr,
    started: Instant,
) {
    let header = |name: &str| {
        req.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method.to_string(),
        req.uri.path().to_string(),
    );
    entry.query = req.uri.query().map(ToString::to_string);
    entry.http_version = version_label(req.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

//! HTTP response building module
//!
//! Provides builders for the responses the file responder emits. Every
//! builder routes through a [`CorsPolicy`] so the origin header is never
//! missing, even on errors.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

use super::cors::CorsPolicy;

/// Response type produced by every handler
pub type HttpResponse = Response<Full<Bytes>>;

/// Value sent when browser caching of the served files is disabled
pub const NO_CACHE: &str = "no-store, no-cache, must-revalidate";

/// Build 200 response carrying a file's bytes
pub fn build_file_response(
    cors: &CorsPolicy,
    data: Bytes,
    content_type: &str,
    no_cache: bool,
    is_head: bool,
) -> HttpResponse {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = cors
        .apply(Response::builder())
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);
    if no_cache {
        builder = builder.header("Cache-Control", NO_CACHE);
    }

    finish(builder, body, "200")
}

/// Build 200 plain-text response from a literal
pub fn build_text_response(cors: &CorsPolicy, text: &str, is_head: bool) -> HttpResponse {
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::copy_from_slice(text.as_bytes())
    };

    let builder = cors
        .apply(Response::builder())
        .status(StatusCode::OK)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", text.len());

    finish(builder, body, "text")
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(cors: &CorsPolicy) -> HttpResponse {
    let builder = cors
        .preflight(Response::builder())
        .status(cors.preflight_status);

    finish(builder, Bytes::new(), "OPTIONS")
}

/// Build 404 Not Found response
pub fn build_404_response(cors: &CorsPolicy) -> HttpResponse {
    plain_error(cors, StatusCode::NOT_FOUND, "404 Not Found", None)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(cors: &CorsPolicy) -> HttpResponse {
    plain_error(
        cors,
        StatusCode::METHOD_NOT_ALLOWED,
        "405 Method Not Allowed",
        Some("GET, HEAD, OPTIONS"),
    )
}

/// Build 500 Internal Server Error response
pub fn build_500_response(cors: &CorsPolicy) -> HttpResponse {
    plain_error(
        cors,
        StatusCode::INTERNAL_SERVER_ERROR,
        "500 Internal Server Error",
        None,
    )
}

fn plain_error(
    cors: &CorsPolicy,
    status: StatusCode,
    message: &'static str,
    allow: Option<&'static str>,
) -> HttpResponse {
    let mut builder = cors
        .apply(Response::builder())
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8");
    if let Some(methods) = allow {
        builder = builder.header("Allow", methods);
    }

    finish(builder, Bytes::from_static(message.as_bytes()), status.as_str())
}

/// Finalize a builder, logging instead of panicking on invalid header values
fn finish(builder: Builder, body: Bytes, label: &str) -> HttpResponse {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(label, &e);
        let mut resp = Response::new(Full::new(Bytes::new()));
        *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        resp
    })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

//! Static file server with SPA fallback and permissive CORS headers.
//!
//! Every request is answered from a single configured root directory:
//! existing files are sent whole, unmatched paths fall back to a default
//! document (or 404), and every response carries
//! `Access-Control-Allow-Origin`.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

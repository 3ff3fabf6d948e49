//! Request handler module
//!
//! Method dispatch lives in `router`; path resolution and file loading in
//! `static_files`.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;

//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from file resolution.

pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cors::CorsPolicy;
pub use response::{
    build_404_response, build_405_response, build_500_response, build_file_response,
    build_options_response, build_text_response, HttpResponse,
};

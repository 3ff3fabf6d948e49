//! Static file serving module
//!
//! Maps request paths onto files below the served root, substitutes the
//! fallback document for unmatched paths, and loads file contents.

use crate::config::{AppState, FilesConfig};
use crate::handler::router::RequestContext;
use crate::http::{self, mime, HttpResponse};
use crate::logger;
use hyper::body::Bytes;
use percent_encoding::percent_decode_str;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Outcome of mapping a request path onto the served tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Canonical path of a regular file inside the root
    File(PathBuf),
    /// Neither the requested file nor the fallback document exists
    NotFound,
}

/// File contents ready to be sent
#[derive(Debug)]
pub struct LoadedFile {
    pub data: Bytes,
    pub content_type: &'static str,
}

/// Serve the file a request path resolves to
pub async fn serve_path(ctx: &RequestContext<'_>, state: &AppState) -> HttpResponse {
    match resolve(&state.root, ctx.path, &state.config.files) {
        Resolution::File(path) => serve_resolved(state, &path, ctx.is_head).await,
        Resolution::NotFound => {
            logger::log_debug(&format!("No file or fallback for '{}'", ctx.path));
            http::build_404_response(&state.cors)
        }
    }
}

/// Read an already resolved file and build the response
///
/// The file may have vanished or become unreadable since resolution; that
/// is answered with 500.
pub async fn serve_resolved(state: &AppState, path: &Path, is_head: bool) -> HttpResponse {
    match load(path).await {
        Ok(file) => http::build_file_response(
            &state.cors,
            file.data,
            file.content_type,
            state.config.files.no_cache,
            is_head,
        ),
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            http::build_500_response(&state.cors)
        }
    }
}

/// Map a request path (query already stripped) onto a file
///
/// `/` always maps to the fallback document. Any other path maps to the
/// file it names, or to the fallback document when `spa_fallback` is set.
pub fn resolve(root: &Path, request_path: &str, files: &FilesConfig) -> Resolution {
    if request_path != "/" {
        let decoded = decode_path(request_path);
        if let Some(path) = locate(root, decoded.trim_start_matches('/')) {
            return Resolution::File(path);
        }
        if !files.spa_fallback {
            return Resolution::NotFound;
        }
    }

    locate(root, &files.fallback_document).map_or(Resolution::NotFound, Resolution::File)
}

/// Load a file into memory and detect its content type
pub async fn load(path: &Path) -> io::Result<LoadedFile> {
    let content = fs::read(path).await?;
    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    Ok(LoadedFile {
        data: Bytes::from(content),
        content_type,
    })
}

/// Find a regular file at `relative` below `root`
///
/// `root` must already be canonical. Paths with `..` or that escape the
/// root through symlinks are rejected.
fn locate(root: &Path, relative: &str) -> Option<PathBuf> {
    if relative.is_empty() {
        return None;
    }

    let relative_path = Path::new(relative);
    if relative_path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        logger::log_warning(&format!("Path traversal attempt blocked: {relative}"));
        return None;
    }

    // Missing files are the common case, not worth a log line
    let canonical = root.join(relative_path).canonicalize().ok()?;
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {relative} -> {}",
            canonical.display()
        ));
        return None;
    }

    canonical.is_file().then_some(canonical)
}

/// Decode `%XX` escapes; malformed escapes are kept as-is
fn decode_path(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

//! # Response rendering
//! src/render/mod.rs
//!
//! Decides and builds the single response for a parsed request. The
//! decision order is fixed, first match wins:
//!
//! 1. Non-GET method → `200 text/plain "hello"`
//! 2. `GET /sleep` → wait the configured delay, then `200 text/plain "ok"`
//! 3. Anything else → static file lookup under the document root:
//!    `200 text/html` with the file bytes, or `404` with no body
//!
//! The `/sleep` wait suspends only the worker thread running it; other
//! workers keep serving as long as the queue has capacity.

use crate::config::Config;
use crate::http::{Request, Response, StatusCode};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Settings the renderer needs from the server configuration
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Directory static file paths resolve under
    pub document_root: PathBuf,

    /// Simulated delay for GET /sleep
    pub sleep_duration: Duration,
}

impl RenderContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            document_root: PathBuf::from(&config.document_root),
            sleep_duration: Duration::from_millis(config.sleep_ms),
        }
    }
}

/// Builds the response for one request.
pub fn render(request: &Request, context: &RenderContext) -> Response {
    if !request.method().eq_ignore_ascii_case("GET") {
        return Response::text("hello");
    }

    if request.path().eq_ignore_ascii_case("/sleep") {
        thread::sleep(context.sleep_duration);
        return Response::text("ok");
    }

    serve_file(request.path(), &context.document_root)
}

/// Serves a static file resolved under the document root.
fn serve_file(path: &str, document_root: &Path) -> Response {
    let resolved = match resolve(path, document_root) {
        Some(resolved) => resolved,
        None => return Response::empty(StatusCode::NotFound),
    };

    match std::fs::read(&resolved) {
        Ok(contents) => Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/html")
            .with_body_bytes(contents),
        Err(e) => {
            eprintln!("[!] Failed to read {}: {}", resolved.display(), e);
            Response::error(StatusCode::InternalServerError, "Failed to read file")
        }
    }
}

/// Resolves a request path to a regular file confined to the document root.
///
/// The candidate is canonicalized and must stay under the canonicalized
/// root; traversal or symlink escapes resolve to `None`, indistinguishable
/// from a missing file.
fn resolve(path: &str, document_root: &Path) -> Option<PathBuf> {
    let relative = path.trim_start_matches('/');
    let root = document_root.canonicalize().ok()?;
    let candidate = root.join(relative).canonicalize().ok()?;

    if candidate.starts_with(&root) && candidate.is_file() {
        Some(candidate)
    } else {
        None
    }
}

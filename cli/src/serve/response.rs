//! HTTP replies.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;
use tiny_http::{Header, Request, Response, StatusCode};

pub const HTML: &str = "text/html; charset=utf-8";
pub const PLAIN: &str = "text/plain; charset=utf-8";
pub const JSON: &str = "application/json";

/// A response independent of the connection it is sent on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status, JSON, body),
            Err(err) => {
                log::error!("failed to serialize response: {}", err);
                Self::new(500, JSON, br#"{"error":"Internal server error"}"#.to_vec())
            }
        }
    }

    /// `{"error": message}` with a status.
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, &json!({ "error": message }))
    }

    pub fn html(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, HTML, body)
    }

    pub fn redirect(location: &str) -> Self {
        Self::new(302, PLAIN, format!("Redirecting to {}", location))
            .with_header("Location", location)
    }

    pub fn not_found() -> Self {
        Self::new(404, PLAIN, "404 Not Found")
    }

    pub fn method_not_allowed() -> Self {
        Self::new(405, PLAIN, "405 Method Not Allowed")
    }

    pub fn preflight() -> Self {
        Self::new(204, PLAIN, Vec::new())
            .with_header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
            .with_header("Access-Control-Allow-Headers", "Content-Type")
    }

    /// Serve a file from disk.
    pub fn file(path: &Path) -> io::Result<Self> {
        let body = fs::read(path)?;
        Ok(Self::new(200, mime_for(path), body))
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Send the reply on a connection. Every reply allows any origin.
    pub fn send(self, request: Request) -> io::Result<()> {
        let mut response = Response::from_data(self.body).with_status_code(StatusCode(self.status));
        let headers = [
            ("Content-Type", self.content_type.to_string()),
            ("Access-Control-Allow-Origin", "*".to_string()),
        ]
        .into_iter()
        .chain(self.headers);

        for (name, value) in headers {
            match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(header) => response.add_header(header),
                Err(()) => log::warn!("dropping invalid {} header", name),
            }
        }
        request.respond(response)
    }
}

/// Content type by file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html" | "htm") => HTML,
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => JSON,
        Some("webmanifest") => "application/manifest+json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("txt") => PLAIN,
        _ => "application/octet-stream",
    }
}

/// Resolve a URL path inside a directory, rejecting anything that escapes it.
pub fn resolve_static(root: &Path, url_path: &str) -> Option<PathBuf> {
    let decoded = percent_encoding::percent_decode_str(url_path)
        .decode_utf8()
        .ok()?;
    let clean = decoded.trim_matches('/');
    if clean.is_empty() || clean.split('/').any(|part| part == "..") {
        return None;
    }

    let canonical = root.join(clean).canonicalize().ok()?;
    let root = root.canonicalize().ok()?;
    if !canonical.starts_with(&root) || !canonical.is_file() {
        return None;
    }
    Some(canonical)
}

//! Static file serving for the single-page front end
//!
//! Files are read from `server.static_dir`. Unknown paths without a file
//! extension are client-side routes and get `index.html`.

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::api::middleware::AppState;

/// Fallback handler for everything outside the API
pub async fn serve_static(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(root) = state.static_dir.as_deref() else {
        return not_found();
    };

    let decoded = urlencoding::decode(uri.path()).unwrap_or_else(|_| uri.path().into());
    let Some(relative) = safe_relative_path(&decoded) else {
        return not_found();
    };

    let file_path = if relative.as_os_str().is_empty() {
        root.join("index.html")
    } else {
        root.join(&relative)
    };
    if let Ok(contents) = fs::read(&file_path).await {
        return build_response(&file_path.to_string_lossy(), contents);
    }

    if relative.extension().is_none() {
        if let Ok(contents) = fs::read(root.join("index.html")).await {
            return build_response("index.html", contents);
        }
    }
    not_found()
}

/// Request path as a relative filesystem path, rejecting `..` segments
fn safe_relative_path(path: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if segment == ".." || segment.contains('\\') {
            return None;
        }
        out.push(segment);
    }
    Some(out)
}

fn build_response(path: &str, data: Vec<u8>) -> Response {
    let content_type = get_content_type(path);
    let cache_control = if is_immutable(path) {
        "public, max-age=31536000, immutable"
    } else if content_type.starts_with("text/html") {
        "no-cache"
    } else {
        "public, max-age=3600"
    };

    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, cache_control),
        ],
        data,
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        "<html><body><h1>404 Not Found</h1></body></html>",
    )
        .into_response()
}

fn get_content_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    match ext {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "webp" => "image/webp",
        "txt" => "text/plain",
        "xml" => "application/xml",
        _ => "application/octet-stream",
    }
}

/// Vite emits content-hashed bundles under /assets/
fn is_immutable(path: &str) -> bool {
    path.contains("assets/") && (path.ends_with(".js") || path.ends_with(".css"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_relative_path() {
        assert_eq!(safe_relative_path("/"), Some(PathBuf::new()));
        assert_eq!(
            safe_relative_path("/assets/index.js"),
            Some(PathBuf::from("assets").join("index.js"))
        );
        assert_eq!(safe_relative_path("/../etc/passwd"), None);
        assert_eq!(safe_relative_path("/a/..\\b"), None);
    }

    #[test]
    fn test_content_type_and_caching() {
        assert_eq!(get_content_type("dist/index.html"), "text/html; charset=utf-8");
        assert_eq!(get_content_type("dist/logo.webp"), "image/webp");
        assert_eq!(get_content_type("LICENSE"), "application/octet-stream");
        assert!(is_immutable("dist/assets/index-3f2a.js"));
        assert!(!is_immutable("dist/index.html"));
    }
}

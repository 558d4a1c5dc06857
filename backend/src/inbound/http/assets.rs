//! Static front-end assets.
//!
//! Every request that matches no API route lands here. Files are read through
//! a `cap_std` directory handle, so paths that would escape the asset root
//! fail like missing files and render as 404.

use std::path::PathBuf;

use actix_web::http::Method;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::debug;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

const INDEX_FILE: &str = "index.html";

/// Resolve a request path to a path relative to the asset root.
///
/// `/` and any path ending in `/` map to `index.html` inside it.
pub(crate) fn asset_path(request_path: &str) -> PathBuf {
    let trimmed = request_path.trim_start_matches('/');
    if trimmed.is_empty() {
        return PathBuf::from(INDEX_FILE);
    }
    let mut path = PathBuf::from(trimmed);
    if trimmed.ends_with('/') {
        path.push(INDEX_FILE);
    }
    path
}

/// Content type for a file name, by extension.
pub(crate) fn content_type_for(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("woff2") => "font/woff2",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Default service serving files from the asset directory.
pub async fn serve_asset(req: HttpRequest, state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return Err(Error::not_found("Not found"));
    }

    let path = asset_path(req.path());
    let Some(dir) = state.assets.clone() else {
        debug!(path = %path.display(), "no static directory mounted");
        return Err(Error::not_found("Not found"));
    };
    let lookup = path.clone();
    let bytes = web::block(move || dir.read(&lookup))
        .await
        .map_err(|err| Error::internal(format!("asset read was cancelled: {err}")))?
        .map_err(|err| {
            debug!(path = %path.display(), error = %err, "static asset unavailable");
            Error::not_found("Not found")
        })?;

    let mut response = HttpResponse::Ok();
    response.content_type(content_type_for(&path));
    if req.method() == Method::HEAD {
        return Ok(response.finish());
    }
    Ok(response.body(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    #[rstest]
    #[case("/", "index.html")]
    #[case("", "index.html")]
    #[case("/styles.css", "styles.css")]
    #[case("/admin/", "admin/index.html")]
    #[case("/js/app.js", "js/app.js")]
    fn maps_request_paths(#[case] request_path: &str, #[case] expected: &str) {
        assert_eq!(asset_path(request_path), PathBuf::from(expected));
    }

    #[rstest]
    #[case("index.html", "text/html; charset=utf-8")]
    #[case("app.JS", "text/javascript; charset=utf-8")]
    #[case("logo.svg", "image/svg+xml")]
    #[case("blob", "application/octet-stream")]
    fn guesses_content_types(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(content_type_for(Path::new(name)), expected);
    }
}

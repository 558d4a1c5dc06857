//! Print the OpenAPI document as JSON.

use std::io::Write;

use confessions::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> std::io::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(|e| std::io::Error::other(format!("failed to render OpenAPI document: {e}")))?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")
}

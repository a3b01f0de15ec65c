//! services/tracker/src/bin/openapi.rs
//!
//! Writes the reading tracker's OpenAPI document to disk so clients can be
//! generated without starting the server.
//!
//! Usage: `openapi [OUTPUT]` (defaults to `openapi.json`).

use std::path::PathBuf;

use tracker_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let mut doc = ApiDoc::openapi();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();

    std::fs::write(&output, doc.to_pretty_json()?)?;
    println!(
        "Wrote {} paths of the reading tracker API to {}",
        doc.paths.paths.len(),
        output.display()
    );
    Ok(())
}

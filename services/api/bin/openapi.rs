//! Writes the OpenAPI document for the REST inspection API.
//!
//! Usage: `openapi [OUTPUT_PATH]` (defaults to `openapi.json`).

use banter_api::router::ApiDoc;
use std::path::Path;
use utoipa::OpenApi;

fn write_spec(api_doc: utoipa::openapi::OpenApi, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, api_doc.to_pretty_json()?)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());
    write_spec(ApiDoc::openapi(), Path::new(&output))?;
    println!("OpenAPI document written to {}", output);
    Ok(())
}

//! src/bin/openapi.rs
//!
//! Writes the OpenAPI document of the assessment API to `openapi.json`.

use ai_assessment::routes::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = "openapi.json";
    std::fs::write(path, ApiDoc::openapi().to_pretty_json()?)?;
    println!("OpenAPI document written to {}", path);
    Ok(())
}

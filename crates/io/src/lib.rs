//! `docdelta-io`: reads `.docx` containers into parsed documents.

pub mod docx;
pub mod error;

use std::path::Path;

use docdelta_core::{build_document, EngineConfig, ParsedDocument};

pub use error::UnreadableDocument;

/// Parse a `.docx` byte stream with the default engine configuration.
pub fn parse(bytes: &[u8]) -> Result<ParsedDocument, UnreadableDocument> {
    parse_with_config(bytes, &EngineConfig::default())
}

pub fn parse_with_config(
    bytes: &[u8],
    config: &EngineConfig,
) -> Result<ParsedDocument, UnreadableDocument> {
    let raw = docx::load(bytes)?;
    Ok(build_document(raw, config))
}

/// Read and parse a `.docx` file from disk.
pub fn parse_file(path: &Path, config: &EngineConfig) -> Result<ParsedDocument, UnreadableDocument> {
    let bytes = std::fs::read(path)?;
    parse_with_config(&bytes, config)
}

use thiserror::Error;

/// The byte stream is not a readable Word document. Loading is all or
/// nothing: any of these aborts the whole parse.
#[derive(Debug, Error)]
pub enum UnreadableDocument {
    /// Not a zip container, or the container is corrupt.
    #[error("not a readable .docx container: {0}")]
    Container(#[source] zip::result::ZipError),
    /// A required part is absent from the container.
    #[error("missing required part '{0}'")]
    MissingPart(&'static str),
    /// A required part is not well-formed XML.
    #[error("malformed XML in '{part}': {message}")]
    Malformed { part: String, message: String },
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

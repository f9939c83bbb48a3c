use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// A config value is outside its accepted range.
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Config could not be rendered back to TOML.
    #[error("config encode error: {0}")]
    ConfigEncode(String),
}

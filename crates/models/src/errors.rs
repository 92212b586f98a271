use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("malformed document: {0}")]
    Codec(String),
}

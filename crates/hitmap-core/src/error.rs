use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed search response: {0}")]
    MalformedResponse(String),

    #[error("No factory registered for document type '{doc_type}'")]
    UnknownType { doc_type: String },

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Factory for '{doc_type}' failed on hit {id}: {reason}")]
    Factory { doc_type: String, id: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

/// Fatal usage errors. Validation failures are never raised this way;
/// they come back as data in the error tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The content argument was not a JSON object.
    #[error("Invalid content: {0}")]
    InvalidContent(String),
}

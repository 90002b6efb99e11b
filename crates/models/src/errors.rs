use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// A required field is absent from a create payload.
    #[error("Missing {0}")]
    Missing(&'static str),
    #[error("validation error: {0}")]
    Validation(String),
    /// A stored row could not be turned back into an entity.
    #[error("decode error: {0}")]
    Decode(String),
}

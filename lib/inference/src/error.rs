use hotspot_schema::AlignError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, InferenceError>;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Alignment error: {0}")]
    Align(#[from] AlignError),

    #[error(transparent)]
    Core(#[from] hotspot_core::Error),

    #[error("Model error: {0}")]
    Model(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InferenceError {
    /// True when the request itself was bad, as opposed to the loaded model
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            InferenceError::Align(_) | InferenceError::Core(hotspot_core::Error::InvalidQuery(_))
        )
    }
}

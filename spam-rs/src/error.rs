use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpamError {
    /// Empty or degenerate dataset, empty vocabulary, bad split ratio,
    /// empty test set, unmapped label value
    #[error("Data error: {0}")]
    Data(String),

    /// Prediction with a model that does not belong to the vocabulary,
    /// or a model that did not come out of a completed fit
    #[error("State error: {0}")]
    State(String),

    /// Malformed configuration
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SpamError {
    pub(crate) fn data(msg: impl Into<String>) -> Self {
        SpamError::Data(msg.into())
    }

    pub(crate) fn state(msg: impl Into<String>) -> Self {
        SpamError::State(msg.into())
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        SpamError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SpamError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DestinyError {
    #[error("invalid energy type '{0}': expected 'yin' or 'yang'")]
    InvalidGender(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("character not found: {0}")]
    CharacterNotFound(String),

    #[error("record sink failed: {0}")]
    SinkFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, DestinyError>;

use thiserror::Error;

use crate::types::StoryId;

#[derive(Error, Debug)]
pub enum RelWebError {
    #[error("Story not found: {0}")]
    StoryNotFound(StoryId),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Validation(String),

    #[error("Verification failed: {0}")]
    Verification(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

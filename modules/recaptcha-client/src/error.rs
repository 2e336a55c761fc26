use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecaptchaError>;

#[derive(Debug, Error)]
pub enum RecaptchaError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for RecaptchaError {
    fn from(err: reqwest::Error) -> Self {
        RecaptchaError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for RecaptchaError {
    fn from(err: serde_json::Error) -> Self {
        RecaptchaError::Parse(err.to_string())
    }
}

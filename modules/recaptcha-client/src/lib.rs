pub mod error;

pub use error::{RecaptchaError, Result};

use std::time::Duration;

use serde::Deserialize;

const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Response body of `siteverify`. v3 tokens carry a score; v2 tokens do not.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteVerifyResponse {
    pub success: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

impl SiteVerifyResponse {
    /// A token passes when Google accepted it and its score clears `min_score`.
    /// Scoreless responses are treated as 0.0.
    pub fn is_human(&self, min_score: f64) -> bool {
        self.success && self.score.unwrap_or(0.0) >= min_score
    }
}

pub struct RecaptchaClient {
    client: reqwest::Client,
    endpoint: String,
    secret: String,
}

impl RecaptchaClient {
    pub fn new(secret: &str) -> Result<Self> {
        Self::with_endpoint(SITEVERIFY_URL, secret)
    }

    /// Point the client at a different verification endpoint (self-hosted
    /// proxies, local fakes).
    pub fn with_endpoint(endpoint: &str, secret: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            secret: secret.to_string(),
        })
    }

    /// Verify a client-side token.
    pub async fn verify(&self, token: &str) -> Result<SiteVerifyResponse> {
        let resp = self
            .client
            .post(&self.endpoint)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(RecaptchaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let verification: SiteVerifyResponse = serde_json::from_str(&resp.text().await?)?;
        tracing::debug!(
            success = verification.success,
            score = ?verification.score,
            action = ?verification.action,
            "reCAPTCHA verification response"
        );
        Ok(verification)
    }
}

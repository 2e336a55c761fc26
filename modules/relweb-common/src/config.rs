use std::env;

use crate::error::RelWebError;

/// Story pinned to the top of the gallery unless `ANCHOR_STORY_TITLE` says otherwise.
pub const DEFAULT_ANCHOR_TITLE: &str = "Networked Abundance";

/// reCAPTCHA v3 scores at or above this are treated as human.
pub const DEFAULT_MIN_SCORE: f64 = 0.5;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Storage. None runs against the seeded in-memory store.
    pub supabase: Option<SupabaseConfig>,

    // Bot verification. None disables verification.
    pub recaptcha: Option<RecaptchaConfig>,
    pub recaptcha_site_key: Option<String>,

    // Gallery
    pub anchor_title: Option<String>,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct RecaptchaConfig {
    pub secret_key: String,
    pub min_score: f64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, RelWebError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, RelWebError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let supabase = match (non_empty("SUPABASE_URL"), non_empty("SUPABASE_KEY")) {
            (Some(url), Some(key)) => Some(SupabaseConfig { url, key }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(RelWebError::Config(
                    "SUPABASE_KEY is required when SUPABASE_URL is set".into(),
                ))
            }
            (None, Some(_)) => {
                return Err(RelWebError::Config(
                    "SUPABASE_URL is required when SUPABASE_KEY is set".into(),
                ))
            }
        };

        let min_score = match non_empty("RECAPTCHA_MIN_SCORE") {
            Some(raw) => raw.parse::<f64>().map_err(|_| {
                RelWebError::Config(format!("RECAPTCHA_MIN_SCORE must be a number, got {raw:?}"))
            })?,
            None => DEFAULT_MIN_SCORE,
        };
        if !(0.0..=1.0).contains(&min_score) {
            return Err(RelWebError::Config(format!(
                "RECAPTCHA_MIN_SCORE must be between 0 and 1, got {min_score}"
            )));
        }
        let recaptcha = non_empty("RECAPTCHA_SECRET_KEY").map(|secret_key| RecaptchaConfig {
            secret_key,
            min_score,
        });

        // An explicitly empty ANCHOR_STORY_TITLE disables pinning.
        let anchor_title = match var("ANCHOR_STORY_TITLE") {
            Some(title) if title.trim().is_empty() => None,
            Some(title) => Some(title),
            None => Some(DEFAULT_ANCHOR_TITLE.to_string()),
        };

        let web_port = match non_empty("WEB_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| RelWebError::Config(format!("WEB_PORT must be a number, got {raw:?}")))?,
            None => 3000,
        };

        Ok(Self {
            supabase,
            recaptcha,
            recaptcha_site_key: non_empty("RECAPTCHA_SITE_KEY"),
            anchor_title,
            web_host: non_empty("WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port,
        })
    }
}

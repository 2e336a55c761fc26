pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, RecaptchaConfig, SupabaseConfig};
pub use error::RelWebError;
pub use types::*;

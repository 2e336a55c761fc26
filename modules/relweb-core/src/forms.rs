//! The site's forms: share a story, get in touch, remix a story.
//!
//! Each form validates into a typed row, passes bot verification where the
//! page shows a challenge, and is inserted into its table.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use relweb_common::{
    Category, ContactSubmission, RelWebError, RemixSuggestion, StoreKind, StoryId, StorySubmission,
    SubmissionStatus,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::traits::{RecordStore, Verifier};

pub const FILL_ALL_FIELDS: &str = "Please fill out all fields";
pub const ENTER_SUGGESTION: &str = "Please enter your suggestion";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const VERIFY_FIRST: &str = "Please complete the verification";

pub const STORY_SUBMITTED: &str = "Your story has been submitted!";
pub const CONTACT_RECEIVED: &str = "Thanks for reaching out! We'll be in touch soon.";
pub const REMIX_SUBMITTED: &str = "Your remix suggestion has been submitted!";

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_BODY_CHARS: usize = 5000;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemixForm {
    #[serde(default)]
    pub remix_text: String,
}

impl StoryForm {
    pub fn validate(&self) -> Result<StorySubmission, RelWebError> {
        let title = self.title.trim();
        let description = self.description.trim();
        let category = self.category.trim();
        if title.is_empty() || description.is_empty() || category.is_empty() {
            return Err(RelWebError::Validation(FILL_ALL_FIELDS.into()));
        }
        check_length("Title", title, MAX_TITLE_CHARS)?;
        check_length("Description", description, MAX_BODY_CHARS)?;
        let category: Category = category.parse()?;

        let email = optional(&self.email);
        if let Some(email) = &email {
            check_email(email)?;
        }

        Ok(StorySubmission {
            title: title.to_string(),
            description: description.to_string(),
            category,
            name: optional(&self.name),
            email,
            status: SubmissionStatus::Pending,
            created_at: Utc::now(),
        })
    }
}

impl ContactForm {
    pub fn validate(&self) -> Result<ContactSubmission, RelWebError> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(RelWebError::Validation(FILL_ALL_FIELDS.into()));
        }
        check_length("Name", name, MAX_TITLE_CHARS)?;
        check_length("Message", message, MAX_BODY_CHARS)?;
        check_email(email)?;

        Ok(ContactSubmission {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            created_at: Utc::now(),
        })
    }
}

impl RemixForm {
    pub fn validate(&self, story_id: &StoryId) -> Result<RemixSuggestion, RelWebError> {
        let text = self.remix_text.trim();
        if text.is_empty() {
            return Err(RelWebError::Validation(ENTER_SUGGESTION.into()));
        }
        check_length("Suggestion", text, MAX_BODY_CHARS)?;

        Ok(RemixSuggestion {
            story_id: story_id.clone(),
            remix_text: text.to_string(),
            created_at: Utc::now(),
        })
    }
}

/// Validate, verify and store a story submission. It lands as `pending`.
pub async fn submit_story<S, V>(
    store: &S,
    verifier: &V,
    form: &StoryForm,
) -> Result<StorySubmission, RelWebError>
where
    S: RecordStore + ?Sized,
    V: Verifier + ?Sized,
{
    let submission = form.validate()?;
    require_human(verifier, form.token.as_deref()).await?;
    insert_row(store, StoreKind::StorySubmissions, &submission).await?;
    info!(category = %submission.category, "Story submitted for review");
    Ok(submission)
}

/// Validate, verify and store a contact message.
pub async fn submit_contact<S, V>(
    store: &S,
    verifier: &V,
    form: &ContactForm,
) -> Result<ContactSubmission, RelWebError>
where
    S: RecordStore + ?Sized,
    V: Verifier + ?Sized,
{
    let submission = form.validate()?;
    require_human(verifier, form.token.as_deref()).await?;
    insert_row(store, StoreKind::ContactSubmissions, &submission).await?;
    info!("Contact submission received");
    Ok(submission)
}

/// Store a remix suggestion for an existing story. No challenge is shown for
/// remixes.
pub async fn submit_remix<S>(
    store: &S,
    story_id: &StoryId,
    form: &RemixForm,
) -> Result<RemixSuggestion, RelWebError>
where
    S: RecordStore + ?Sized,
{
    let suggestion = form.validate(story_id)?;
    insert_row(store, StoreKind::RemixSuggestions, &suggestion).await?;
    info!(story_id = %story_id, "Remix suggestion received");
    Ok(suggestion)
}

async fn require_human<V>(verifier: &V, token: Option<&str>) -> Result<(), RelWebError>
where
    V: Verifier + ?Sized,
{
    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| RelWebError::Validation(VERIFY_FIRST.into()))?;

    let verdict = verifier
        .verify(token)
        .await
        .map_err(|e| RelWebError::Verification(e.to_string()))?;

    if !verdict.passed {
        warn!(score = verdict.score, "Verification rejected submission");
        return Err(RelWebError::Verification(format!(
            "score {:.2} below threshold",
            verdict.score
        )));
    }
    Ok(())
}

async fn insert_row<S, T>(store: &S, kind: StoreKind, row: &T) -> Result<(), RelWebError>
where
    S: RecordStore + ?Sized,
    T: Serialize,
{
    let value = serde_json::to_value(row).map_err(|e| RelWebError::Storage(e.to_string()))?;
    store.insert(kind, value).await.map_err(|e| {
        warn!(error = %e, table = %kind, "Insert failed");
        RelWebError::Storage(e.to_string())
    })
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn check_email(email: &str) -> Result<(), RelWebError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(RelWebError::Validation(INVALID_EMAIL.into()))
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), RelWebError> {
    if value.chars().count() > max {
        return Err(RelWebError::Validation(format!(
            "{field} is too long (max {max} characters)"
        )));
    }
    Ok(())
}

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RelWebError;

// --- Categories ---

/// Closed set of story tags. Declaration order is the curator's walk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Learning,
    Community,
    Collaboration,
    Discovery,
    Creativity,
    Abundance,
    Care,
    Ai,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Learning,
        Category::Community,
        Category::Collaboration,
        Category::Discovery,
        Category::Creativity,
        Category::Abundance,
        Category::Care,
        Category::Ai,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Learning => "learning",
            Category::Community => "community",
            Category::Collaboration => "collaboration",
            Category::Discovery => "discovery",
            Category::Creativity => "creativity",
            Category::Abundance => "abundance",
            Category::Care => "care",
            Category::Ai => "ai",
        }
    }

    /// Human-facing label for filter buttons and badges.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Learning => "Learning",
            Category::Community => "Community",
            Category::Collaboration => "Collaboration",
            Category::Discovery => "Discovery",
            Category::Creativity => "Creativity",
            Category::Abundance => "Abundance",
            Category::Care => "Care",
            Category::Ai => "AI",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = RelWebError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| RelWebError::Validation(format!("Unknown category: {s}")))
    }
}

// --- Story records ---

/// Opaque story identifier. The store hands out either text ids or integer
/// primary keys; both are normalized to text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StoryId(String);

impl StoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StoryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'de> Deserialize<'de> for StoryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => StoryId(s),
            RawId::Number(n) => StoryId(n.to_string()),
        })
    }
}

/// A community vignette as loaded from the `stories` table.
///
/// `liked_by_viewer` is session state: it is never written to or read from the
/// store and is `false` on every fresh load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub id: StoryId,
    pub title: String,
    pub description: String,
    pub category: Category,
    #[serde(default, deserialize_with = "deserialize_likes")]
    pub likes: u32,
    #[serde(skip)]
    pub liked_by_viewer: bool,
}

impl StoryRecord {
    pub fn new(
        id: impl Into<StoryId>,
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
        likes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            category,
            likes,
            liked_by_viewer: false,
        }
    }
}

/// Stored counters are plain integers on the remote side; null or negative
/// values load as zero.
fn deserialize_likes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = Option::<i64>::deserialize(deserializer)?.unwrap_or(0);
    Ok(raw.clamp(0, u32::MAX as i64) as u32)
}

// --- Submissions ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "pending"),
            SubmissionStatus::Approved => write!(f, "approved"),
            SubmissionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A story proposed through the "Share your story" form, awaiting review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorySubmission {
    pub title: String,
    pub description: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemixSuggestion {
    pub story_id: StoryId,
    pub remix_text: String,
    pub created_at: DateTime<Utc>,
}

// --- Store kinds ---

/// Remote tables the site reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Stories,
    StorySubmissions,
    ContactSubmissions,
    RemixSuggestions,
}

impl StoreKind {
    pub fn table_name(&self) -> &'static str {
        match self {
            StoreKind::Stories => "stories",
            StoreKind::StorySubmissions => "story_submissions",
            StoreKind::ContactSubmissions => "contact_submissions",
            StoreKind::RemixSuggestions => "remix_suggestions",
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

// --- Notices ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A user-visible toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

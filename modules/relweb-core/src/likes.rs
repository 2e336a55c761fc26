//! Optimistic like toggling.
//!
//! A toggle is a small transaction over the session's [`StoryBoard`]:
//!
//! 1. [`StoryBoard::begin_toggle`] snapshots the whole collection, flips the
//!    viewer's like and adjusts the counter in place.
//! 2. [`LikeToggle::persist`] writes the new counter to the store. One
//!    attempt, no retry.
//! 3. [`StoryBoard::settle`] keeps the optimistic state on success, or puts
//!    the snapshot back and raises an error notice on failure.
//!
//! Callers that can hold the board across the write use
//! [`StoryBoard::toggle_like`]. Callers that must release the board while
//! the write is in flight (the web session registry) drive the three steps
//! themselves.
//!
//! The snapshot covers the entire collection, not just the toggled story. If a
//! second toggle begins before an earlier one settles and the earlier one
//! fails, its rollback also discards the later toggle's unconfirmed change.

use relweb_common::{NoticeKind, RelWebError, StoreKind, StoryId, StoryRecord};
use serde::Serialize;
use tracing::{info, warn};

use crate::traits::{Notifier, RecordStore};

pub const LIKED_NOTICE: &str = "Story liked!";
pub const LIKE_FAILED_NOTICE: &str = "Couldn't save your like. Please try again.";

/// How a toggle's write ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistOutcome {
    /// The store acknowledged the new counter; the optimistic state stands.
    Confirmed,
    /// The write failed and the board was restored to its pre-toggle state.
    RolledBack { reason: String },
}

impl PersistOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, PersistOutcome::Confirmed)
    }
}

/// The stories one viewer sees, in display order. Single writer.
#[derive(Debug, Clone, Default)]
pub struct StoryBoard {
    stories: Vec<StoryRecord>,
}

impl StoryBoard {
    pub fn new(stories: Vec<StoryRecord>) -> Self {
        Self { stories }
    }

    pub fn stories(&self) -> &[StoryRecord] {
        &self.stories
    }

    pub fn get(&self, id: &StoryId) -> Option<&StoryRecord> {
        self.stories.iter().find(|s| &s.id == id)
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// Apply the optimistic half of a toggle.
    ///
    /// Unknown ids return `StoryNotFound` and leave the board untouched.
    pub fn begin_toggle(&mut self, id: &StoryId) -> Result<LikeToggle, RelWebError> {
        let idx = self
            .stories
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| RelWebError::StoryNotFound(id.clone()))?;

        let snapshot = self.stories.clone();

        let story = &mut self.stories[idx];
        let liked = !story.liked_by_viewer;
        story.liked_by_viewer = liked;
        story.likes = if liked {
            story.likes.saturating_add(1)
        } else {
            story.likes.saturating_sub(1)
        };

        Ok(LikeToggle {
            story_id: id.clone(),
            liked,
            likes: story.likes,
            snapshot,
        })
    }

    /// Resolve a toggle once its write has finished.
    pub fn settle(
        &mut self,
        toggle: LikeToggle,
        outcome: PersistOutcome,
        notifier: &dyn Notifier,
    ) -> PersistOutcome {
        match &outcome {
            PersistOutcome::Confirmed => {
                if toggle.liked {
                    notifier.notify(NoticeKind::Success, LIKED_NOTICE);
                }
            }
            PersistOutcome::RolledBack { reason } => {
                warn!(story_id = %toggle.story_id, reason = %reason, "Like not saved, rolling back");
                self.stories = toggle.snapshot;
                notifier.notify(NoticeKind::Error, LIKE_FAILED_NOTICE);
            }
        }
        outcome
    }

    /// Toggle the viewer's like on one story end to end.
    pub async fn toggle_like<S>(
        &mut self,
        id: &StoryId,
        store: &S,
        notifier: &dyn Notifier,
    ) -> Result<PersistOutcome, RelWebError>
    where
        S: RecordStore + ?Sized,
    {
        let toggle = self.begin_toggle(id)?;
        let outcome = toggle.persist(store).await;
        Ok(self.settle(toggle, outcome, notifier))
    }
}

/// An applied but unconfirmed toggle. Carries the pre-toggle snapshot.
#[derive(Debug)]
pub struct LikeToggle {
    story_id: StoryId,
    liked: bool,
    likes: u32,
    snapshot: Vec<StoryRecord>,
}

impl LikeToggle {
    pub fn story_id(&self) -> &StoryId {
        &self.story_id
    }

    /// True when this toggle liked the story, false when it unliked it.
    pub fn liked(&self) -> bool {
        self.liked
    }

    /// Counter value being written.
    pub fn likes(&self) -> u32 {
        self.likes
    }

    /// Write the new counter to the `stories` table.
    pub async fn persist<S>(&self, store: &S) -> PersistOutcome
    where
        S: RecordStore + ?Sized,
    {
        let result = store
            .update_field(
                StoreKind::Stories,
                self.story_id.as_str(),
                "likes",
                serde_json::json!(self.likes),
            )
            .await;

        match result {
            Ok(()) => {
                info!(story_id = %self.story_id, likes = self.likes, liked = self.liked, "Like saved");
                PersistOutcome::Confirmed
            }
            Err(e) => PersistOutcome::RolledBack {
                reason: e.to_string(),
            },
        }
    }
}

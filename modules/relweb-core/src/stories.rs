//! Loading the story collection for a new viewing session.

use std::collections::HashSet;

use anyhow::Result;
use relweb_common::{StoreKind, StoryRecord};
use tracing::{info, warn};

use crate::curator::organize;
use crate::likes::StoryBoard;
use crate::traits::RecordStore;

/// Fetch and decode every story.
///
/// Rows that fail to decode, have blank display text, or repeat an id already
/// seen are skipped with a warning rather than failing the whole load.
pub async fn load_stories<S>(store: &S) -> Result<Vec<StoryRecord>>
where
    S: RecordStore + ?Sized,
{
    let rows = store.fetch_all(StoreKind::Stories).await?;
    let mut seen = HashSet::new();
    let mut stories = Vec::with_capacity(rows.len());

    for row in rows {
        let story: StoryRecord = match serde_json::from_value(row) {
            Ok(story) => story,
            Err(e) => {
                warn!(error = %e, "Skipping malformed story row");
                continue;
            }
        };
        if story.title.trim().is_empty() || story.description.trim().is_empty() {
            warn!(story_id = %story.id, "Skipping story with blank text");
            continue;
        }
        if !seen.insert(story.id.clone()) {
            warn!(story_id = %story.id, "Skipping duplicate story id");
            continue;
        }
        stories.push(story);
    }

    Ok(stories)
}

/// Load, curate and wrap the collection for one viewer.
pub async fn load_board<S>(store: &S, anchor_title: Option<&str>) -> Result<StoryBoard>
where
    S: RecordStore + ?Sized,
{
    let stories = load_stories(store).await?;
    let ordered = organize(stories, anchor_title);
    info!(count = ordered.len(), anchor = ?anchor_title, "Loaded story board");
    Ok(StoryBoard::new(ordered))
}

//! JSON endpoints behind the landing page's buttons and forms.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use relweb_common::{Category, Notice, RelWebError, StoryId};
use relweb_core::forms::{CONTACT_RECEIVED, REMIX_SUBMITTED, STORY_SUBMITTED};
use relweb_core::{
    filter_by_category, submit_contact, submit_remix, submit_story, ContactForm, NoticeBuffer,
    RemixForm, StoryForm,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::sessions::{session_cookie, session_from_headers};
use crate::{AppState, StoryView};

pub const VERIFICATION_FAILED: &str = "Verification failed. Please try again.";
pub const STORY_NOT_FOUND: &str = "Story not found";
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";
pub const UNREADABLE_REQUEST: &str = "We couldn't read that request. Please try again.";

#[derive(Deserialize)]
pub struct CategoryParam {
    pub category: Option<String>,
}

/// A failed request: status plus the toast the page should show.
pub struct ApiError {
    status: StatusCode,
    notice: Option<Notice>,
}

impl ApiError {
    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            notice: Some(Notice::error(GENERIC_FAILURE)),
        }
    }
}

impl From<RelWebError> for ApiError {
    fn from(err: RelWebError) -> Self {
        match err {
            RelWebError::Validation(message) => Self {
                status: StatusCode::BAD_REQUEST,
                notice: Some(Notice::error(message)),
            },
            RelWebError::Verification(reason) => {
                warn!(reason = %reason, "Submission failed verification");
                Self {
                    status: StatusCode::FORBIDDEN,
                    notice: Some(Notice::error(VERIFICATION_FAILED)),
                }
            }
            // Unknown stories are a quiet no-op for the viewer.
            RelWebError::StoryNotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                notice: None,
            },
            other => {
                warn!(error = %other, "Request failed");
                Self::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(status = %rejection.status(), error = %rejection.body_text(), "Rejected request body");
        Self {
            status: StatusCode::BAD_REQUEST,
            notice: Some(Notice::error(UNREADABLE_REQUEST)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match self.status {
            StatusCode::NOT_FOUND => STORY_NOT_FOUND.to_string(),
            _ => self
                .notice
                .as_ref()
                .map(|n| n.message.clone())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        };
        let notices: Vec<Notice> = self.notice.into_iter().collect();
        (self.status, Json(json!({ "error": error, "notices": notices }))).into_response()
    }
}

/// Resolve the caller's session, opening a fresh one when the cookie is
/// missing or has expired.
pub async fn resolve_session(state: &AppState, headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let id = session_from_headers(headers).unwrap_or_else(Uuid::new_v4);
    state
        .sessions
        .open(id, state.store.as_ref(), state.anchor_title.as_deref())
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to load stories for session");
            ApiError::internal()
        })?;
    Ok(id)
}

fn with_cookie(session: Uuid, status: StatusCode, body: serde_json::Value) -> Response {
    (
        status,
        [(header::SET_COOKIE, session_cookie(session))],
        Json(body),
    )
        .into_response()
}

// --- Handlers ---

pub async fn list_stories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CategoryParam>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let category = match params.category.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(raw) => Some(raw.parse::<Category>()?),
        None => None,
    };
    let session = resolve_session(&state, &headers).await?;

    let stories = state
        .sessions
        .with_board(session, |board| {
            filter_by_category(board.stories(), category)
                .into_iter()
                .map(StoryView::from)
                .collect::<Vec<_>>()
        })
        .await
        .ok_or_else(ApiError::internal)?;

    Ok(with_cookie(session, StatusCode::OK, json!({ "stories": stories })))
}

/// Toggle the viewer's like. The board is locked to apply the optimistic
/// change and again to settle it, never across the write.
pub async fn like_story(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session = resolve_session(&state, &headers).await?;
    let story_id = StoryId::new(id);

    let toggle = state
        .sessions
        .with_board(session, |board| board.begin_toggle(&story_id))
        .await
        .ok_or_else(ApiError::internal)??;

    let outcome = toggle.persist(state.store.as_ref()).await;

    let notices = NoticeBuffer::new();
    let (outcome, story) = state
        .sessions
        .with_board(session, |board| {
            let outcome = board.settle(toggle, outcome, &notices);
            (outcome, board.get(&story_id).map(StoryView::from))
        })
        .await
        .ok_or_else(ApiError::internal)?;

    Ok(with_cookie(
        session,
        StatusCode::OK,
        json!({ "story": story, "outcome": outcome, "notices": notices.take() }),
    ))
}

pub async fn remix_story(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<RemixForm>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(form) = payload?;
    let session = resolve_session(&state, &headers).await?;
    let story_id = StoryId::new(id);

    let known = state
        .sessions
        .with_board(session, |board| board.get(&story_id).is_some())
        .await
        .unwrap_or(false);
    if !known {
        return Err(RelWebError::StoryNotFound(story_id).into());
    }

    submit_remix(state.store.as_ref(), &story_id, &form).await?;
    Ok(with_cookie(
        session,
        StatusCode::CREATED,
        json!({ "notices": [Notice::success(REMIX_SUBMITTED)] }),
    ))
}

pub async fn create_submission(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StoryForm>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(form) = payload?;
    let submission = submit_story(state.store.as_ref(), state.verifier.as_ref(), &form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "submission": submission,
            "notices": [Notice::success(STORY_SUBMITTED)],
        })),
    )
        .into_response())
}

pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(form) = payload?;
    submit_contact(state.store.as_ref(), state.verifier.as_ref(), &form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "notices": [Notice::success(CONTACT_RECEIVED)] })),
    )
        .into_response())
}

//! Per-viewer story boards, keyed by a session cookie.
//!
//! Every viewer gets their own curated board on first visit. Like flags live
//! only here, so a fresh session always starts with nothing liked.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::Result;
use axum::http::{header, HeaderMap};
use relweb_core::{load_board, RecordStore, StoryBoard};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "relweb_session";

const SESSION_TTL: Duration = Duration::from_secs(4 * 3600);

/// Most sessions held at once. Reaching it sweeps idle sessions, then evicts
/// the least recently seen.
const MAX_SESSIONS: usize = 1000;

struct Session {
    board: StoryBoard,
    last_seen: Instant,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure the session has a board, loading and curating one on first
    /// sight. The store is read without holding the registry lock.
    pub async fn open(
        &self,
        id: Uuid,
        store: &dyn RecordStore,
        anchor_title: Option<&str>,
    ) -> Result<()> {
        {
            let mut sessions = self.sessions.lock().await;
            if let Some(session) = sessions.get_mut(&id) {
                session.last_seen = Instant::now();
                return Ok(());
            }
        }

        let board = load_board(store, anchor_title).await?;

        let mut sessions = self.sessions.lock().await;
        if !sessions.contains_key(&id) && sessions.len() >= MAX_SESSIONS {
            prune_expired(&mut sessions, Instant::now());
            evict_least_recent(&mut sessions, MAX_SESSIONS - 1);
        }
        sessions.entry(id).or_insert_with(|| Session {
            board,
            last_seen: Instant::now(),
        });
        debug!(session = %id, active = sessions.len(), "Session opened");
        Ok(())
    }

    /// Run `f` against the session's board. `None` if the session is unknown.
    pub async fn with_board<R>(&self, id: Uuid, f: impl FnOnce(&mut StoryBoard) -> R) -> Option<R> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(&id)?;
        session.last_seen = Instant::now();
        Some(f(&mut session.board))
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

fn prune_expired(sessions: &mut HashMap<Uuid, Session>, now: Instant) {
    sessions.retain(|_, s| now.saturating_duration_since(s.last_seen) < SESSION_TTL);
}

fn evict_least_recent(sessions: &mut HashMap<Uuid, Session>, keep: usize) {
    while sessions.len() > keep {
        let Some(oldest) = sessions
            .iter()
            .min_by_key(|(_, s)| s.last_seen)
            .map(|(id, _)| *id)
        else {
            break;
        };
        sessions.remove(&oldest);
        debug!(session = %oldest, "Evicted least recently seen session");
    }
}

/// Session id from the request's cookies, if present and well-formed.
pub fn session_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use recaptcha_client::RecaptchaClient;
use relweb_common::{Category, Config, StoryRecord};
use relweb_core::{
    filter_by_category, AllowAll, MemoryStore, RecaptchaVerifier, RecordStore, Verifier,
};
use serde::Serialize;
use supabase_client::SupabaseClient;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod sessions;
mod templates;

use api::{resolve_session, CategoryParam};
use sessions::{session_cookie, SessionRegistry};
use templates::render_home;

// --- App State ---

pub struct AppState {
    store: Arc<dyn RecordStore>,
    verifier: Arc<dyn Verifier>,
    sessions: SessionRegistry,
    anchor_title: Option<String>,
    recaptcha_site_key: Option<String>,
}

/// A story as the page and the JSON API present it.
#[derive(Debug, Clone, Serialize)]
pub struct StoryView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: &'static str,
    pub category_label: &'static str,
    pub likes: u32,
    pub liked_by_viewer: bool,
}

impl From<&StoryRecord> for StoryView {
    fn from(s: &StoryRecord) -> Self {
        Self {
            id: s.id.to_string(),
            title: s.title.clone(),
            description: s.description.clone(),
            category: s.category.as_str(),
            category_label: s.category.label(),
            likes: s.likes,
            liked_by_viewer: s.liked_by_viewer,
        }
    }
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("relweb=info".parse()?))
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn RecordStore> = match &config.supabase {
        Some(supabase) => {
            info!(url = supabase.url.as_str(), "Using Supabase record store");
            Arc::new(SupabaseClient::new(&supabase.url, &supabase.key)?)
        }
        None => {
            warn!("SUPABASE_URL/SUPABASE_KEY not set, serving seeded stories from memory");
            Arc::new(MemoryStore::seeded())
        }
    };

    let verifier: Arc<dyn Verifier> = match &config.recaptcha {
        Some(recaptcha) => Arc::new(RecaptchaVerifier::new(
            RecaptchaClient::new(&recaptcha.secret_key)?,
            recaptcha.min_score,
        )),
        None => {
            warn!("RECAPTCHA_SECRET_KEY not set, form submissions are not verified");
            Arc::new(AllowAll)
        }
    };

    let state = Arc::new(AppState {
        store,
        verifier,
        sessions: SessionRegistry::new(),
        anchor_title: config.anchor_title.clone(),
        recaptcha_site_key: config.recaptcha_site_key.clone(),
    });

    let app = build_router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Relational Web server starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_page))
        .route("/healthz", get(healthz))
        .route("/api/stories", get(api::list_stories))
        .route("/api/stories/{id}/like", post(api::like_story))
        .route("/api/stories/{id}/remix", post(api::remix_story))
        .route("/api/submissions", post(api::create_submission))
        .route("/api/contact", post(api::create_contact))
        .with_state(state)
        // Like flags are per viewer; never let a cache share them.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        // Method + path only; query strings and cookies stay out of the logs.
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

// --- Handlers ---

async fn home_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CategoryParam>,
    headers: HeaderMap,
) -> Response {
    // An unrecognized filter falls back to showing everything.
    let active = params
        .category
        .as_deref()
        .and_then(|c| c.parse::<Category>().ok());
    let site_key = state.recaptcha_site_key.as_deref();

    let session = match resolve_session(&state, &headers).await {
        Ok(session) => session,
        Err(_) => return Html(render_home(&[], active, site_key)).into_response(),
    };

    let stories = state
        .sessions
        .with_board(session, |board| {
            filter_by_category(board.stories(), active)
                .into_iter()
                .map(StoryView::from)
                .collect::<Vec<_>>()
        })
        .await
        .unwrap_or_default();

    (
        [(header::SET_COOKIE, session_cookie(session))],
        Html(render_home(&stories, active, site_key)),
    )
        .into_response()
}

async fn healthz() -> &'static str {
    "ok"
}

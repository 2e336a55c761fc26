//! Collaborator seams: storage, notices, bot verification.

use anyhow::Result;
use async_trait::async_trait;
use relweb_common::{NoticeKind, StoreKind};

/// Remote record store reachable by table.
///
/// Implemented by `SupabaseClient` (production) and `MemoryStore` (tests,
/// offline runs). Also implemented for `Arc<S>` so a store can be shared.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every row of `kind`, as raw JSON.
    async fn fetch_all(&self, kind: StoreKind) -> Result<Vec<serde_json::Value>>;

    /// Set one field on the row with the given id. A row that does not exist
    /// is a failure.
    async fn update_field(
        &self,
        kind: StoreKind,
        id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<()>;

    /// Append one row.
    async fn insert(&self, kind: StoreKind, row: serde_json::Value) -> Result<()>;
}

/// User-visible toast surface. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Outcome of a bot-verification challenge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub passed: bool,
    pub score: f64,
}

#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Verdict>;
}

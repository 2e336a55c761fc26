//! Collaborator implementations backed by the HTTP clients.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use recaptcha_client::RecaptchaClient;
use relweb_common::StoreKind;
use supabase_client::SupabaseClient;
use tracing::warn;

use crate::traits::{RecordStore, Verdict, Verifier};

// ---------------------------------------------------------------------------
// Supabase (production store)
// ---------------------------------------------------------------------------

#[async_trait]
impl RecordStore for SupabaseClient {
    async fn fetch_all(&self, kind: StoreKind) -> Result<Vec<serde_json::Value>> {
        Ok(SupabaseClient::fetch_all::<serde_json::Value>(self, kind.table_name()).await?)
    }

    async fn update_field(
        &self,
        kind: StoreKind,
        id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        Ok(SupabaseClient::update_field(self, kind.table_name(), id, field, value).await?)
    }

    async fn insert(&self, kind: StoreKind, row: serde_json::Value) -> Result<()> {
        Ok(SupabaseClient::insert(self, kind.table_name(), &row).await?)
    }
}

// ---------------------------------------------------------------------------
// reCAPTCHA (production verifier)
// ---------------------------------------------------------------------------

/// Passes tokens that Google accepts with a score of at least `min_score`.
pub struct RecaptchaVerifier {
    client: RecaptchaClient,
    min_score: f64,
}

impl RecaptchaVerifier {
    pub fn new(client: RecaptchaClient, min_score: f64) -> Self {
        Self { client, min_score }
    }
}

#[async_trait]
impl Verifier for RecaptchaVerifier {
    async fn verify(&self, token: &str) -> Result<Verdict> {
        let response = self.client.verify(token).await?;
        if !response.error_codes.is_empty() {
            warn!(error_codes = ?response.error_codes, "reCAPTCHA reported errors");
        }
        Ok(Verdict {
            passed: response.is_human(self.min_score),
            score: response.score.unwrap_or(0.0),
        })
    }
}

/// Verifier used when no reCAPTCHA secret is configured.
pub struct AllowAll;

#[async_trait]
impl Verifier for AllowAll {
    async fn verify(&self, _token: &str) -> Result<Verdict> {
        Ok(Verdict {
            passed: true,
            score: 1.0,
        })
    }
}

// ---------------------------------------------------------------------------
// Arc<T> blankets
// ---------------------------------------------------------------------------

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn fetch_all(&self, kind: StoreKind) -> Result<Vec<serde_json::Value>> {
        (**self).fetch_all(kind).await
    }

    async fn update_field(
        &self,
        kind: StoreKind,
        id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        (**self).update_field(kind, id, field, value).await
    }

    async fn insert(&self, kind: StoreKind, row: serde_json::Value) -> Result<()> {
        (**self).insert(kind, row).await
    }
}

#[async_trait]
impl<V: Verifier + ?Sized> Verifier for Arc<V> {
    async fn verify(&self, token: &str) -> Result<Verdict> {
        (**self).verify(token).await
    }
}

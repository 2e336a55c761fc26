//! Form submission flows: validation, verification, storage.

use anyhow::{bail, Result};
use async_trait::async_trait;
use relweb_common::{RelWebError, StoreKind, StoryId};
use relweb_core::{
    submit_contact, submit_remix, submit_story, AllowAll, ContactForm, MemoryStore, RemixForm,
    StoryForm, Verdict, Verifier,
};

struct FixedScore(f64);

#[async_trait]
impl Verifier for FixedScore {
    async fn verify(&self, _token: &str) -> Result<Verdict> {
        Ok(Verdict {
            passed: self.0 >= 0.5,
            score: self.0,
        })
    }
}

struct Unreachable;

#[async_trait]
impl Verifier for Unreachable {
    async fn verify(&self, _token: &str) -> Result<Verdict> {
        bail!("verification service unreachable")
    }
}

fn story_form() -> StoryForm {
    StoryForm {
        title: "Porch Concert Finder".into(),
        description: "Your feed tells you which neighbors are playing tonight.".into(),
        category: "creativity".into(),
        name: Some("Sam".into()),
        email: None,
        token: Some("token".into()),
    }
}

fn contact_form() -> ContactForm {
    ContactForm {
        name: "Sam".into(),
        email: "sam@example.org".into(),
        message: "Happy to help with the front end.".into(),
        token: Some("token".into()),
    }
}

#[tokio::test]
async fn story_submission_is_stored_as_pending() {
    let store = MemoryStore::new();

    submit_story(&store, &AllowAll, &story_form()).await.unwrap();

    let rows = store.rows(StoreKind::StorySubmissions);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "Porch Concert Finder");
    assert_eq!(rows[0]["category"], "creativity");
    assert_eq!(rows[0]["status"], "pending");
    assert_eq!(rows[0]["name"], "Sam");
    assert!(rows[0].get("email").is_none());
}

#[tokio::test]
async fn missing_token_is_rejected_before_verifying() {
    let store = MemoryStore::new();
    let mut form = story_form();
    form.token = None;

    let err = submit_story(&store, &Unreachable, &form).await.unwrap_err();

    assert!(matches!(err, RelWebError::Validation(_)));
    assert!(store.rows(StoreKind::StorySubmissions).is_empty());
}

#[tokio::test]
async fn low_score_blocks_submission() {
    let store = MemoryStore::new();

    let err = submit_story(&store, &FixedScore(0.2), &story_form())
        .await
        .unwrap_err();

    assert!(matches!(err, RelWebError::Verification(_)));
    assert!(store.rows(StoreKind::StorySubmissions).is_empty());
}

#[tokio::test]
async fn verifier_outage_blocks_submission() {
    let store = MemoryStore::new();

    let err = submit_contact(&store, &Unreachable, &contact_form())
        .await
        .unwrap_err();

    assert!(matches!(err, RelWebError::Verification(_)));
    assert!(store.rows(StoreKind::ContactSubmissions).is_empty());
}

#[tokio::test]
async fn contact_submission_is_stored() {
    let store = MemoryStore::new();

    submit_contact(&store, &FixedScore(0.9), &contact_form())
        .await
        .unwrap();

    let rows = store.rows(StoreKind::ContactSubmissions);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "sam@example.org");
}

#[tokio::test]
async fn storage_failure_surfaces_as_storage_error() {
    let store = MemoryStore::new();
    store.set_fail_writes(true);

    let err = submit_contact(&store, &AllowAll, &contact_form())
        .await
        .unwrap_err();

    assert!(matches!(err, RelWebError::Storage(_)));
}

#[tokio::test]
async fn remix_is_linked_to_story() {
    let store = MemoryStore::new();
    let form = RemixForm {
        remix_text: "What if the co-op also ran a seed library?".into(),
    };

    let suggestion = submit_remix(&store, &StoryId::new("1"), &form).await.unwrap();

    assert_eq!(suggestion.story_id, StoryId::new("1"));
    let rows = store.rows(StoreKind::RemixSuggestions);
    assert_eq!(rows[0]["story_id"], "1");
    assert_eq!(rows[0]["remix_text"], "What if the co-op also ran a seed library?");
}

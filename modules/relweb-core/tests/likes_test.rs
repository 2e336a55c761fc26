//! Optimistic like toggling against the in-memory store.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use relweb_common::{Category, NoticeKind, RelWebError, StoreKind, StoryId, StoryRecord};
use relweb_core::likes::{LIKED_NOTICE, LIKE_FAILED_NOTICE};
use relweb_core::{load_board, MemoryStore, NoticeBuffer, PersistOutcome, StoryBoard};

fn story(id: &str, likes: u32) -> StoryRecord {
    StoryRecord::new(id, format!("Story {id}"), "A vignette.", Category::Community, likes)
}

fn store_with(stories: &[StoryRecord]) -> MemoryStore {
    let rows = stories
        .iter()
        .map(|s| serde_json::to_value(s).unwrap())
        .collect();
    MemoryStore::new().with_rows(StoreKind::Stories, rows)
}

fn stored_likes(store: &MemoryStore, id: &str) -> u64 {
    store
        .rows(StoreKind::Stories)
        .into_iter()
        .find(|row| row["id"] == id)
        .and_then(|row| row["likes"].as_u64())
        .unwrap()
}

fn likes_of(board: &StoryBoard, id: &str) -> (u32, bool) {
    let s = board.get(&StoryId::new(id)).unwrap();
    (s.likes, s.liked_by_viewer)
}

// =========================================================================
// Single toggles
// =========================================================================

#[tokio::test]
async fn like_is_applied_and_saved() {
    let store = store_with(&[story("a", 5)]);
    let mut board = load_board(&store, None).await.unwrap();
    let notices = NoticeBuffer::new();

    let outcome = board
        .toggle_like(&StoryId::new("a"), &store, &notices)
        .await
        .unwrap();

    assert_eq!(outcome, PersistOutcome::Confirmed);
    assert_eq!(likes_of(&board, "a"), (6, true));
    assert_eq!(stored_likes(&store, "a"), 6);
    assert_eq!(notices.notices().len(), 1);
    assert_eq!(notices.notices()[0].message, LIKED_NOTICE);
}

#[tokio::test]
async fn failed_write_rolls_back_with_one_error() {
    let store = store_with(&[story("a", 5)]);
    let mut board = load_board(&store, None).await.unwrap();
    let notices = NoticeBuffer::new();
    store.set_fail_writes(true);

    let outcome = board
        .toggle_like(&StoryId::new("a"), &store, &notices)
        .await
        .unwrap();

    assert!(matches!(outcome, PersistOutcome::RolledBack { .. }));
    assert_eq!(likes_of(&board, "a"), (5, false));
    assert_eq!(stored_likes(&store, "a"), 5);
    assert_eq!(notices.count(NoticeKind::Error), 1);
    assert_eq!(notices.count(NoticeKind::Success), 0);
    assert_eq!(notices.notices()[0].message, LIKE_FAILED_NOTICE);
}

#[tokio::test]
async fn unknown_story_is_a_quiet_no_op() {
    let store = store_with(&[story("a", 5)]);
    let mut board = load_board(&store, None).await.unwrap();
    let before = board.stories().to_vec();
    let notices = NoticeBuffer::new();

    let result = board
        .toggle_like(&StoryId::new("missing"), &store, &notices)
        .await;

    assert!(matches!(result, Err(RelWebError::StoryNotFound(_))));
    assert_eq!(board.stories(), before.as_slice());
    assert!(notices.notices().is_empty());
}

#[tokio::test]
async fn double_toggle_restores_original_state() {
    let store = store_with(&[story("a", 5)]);
    let mut board = load_board(&store, None).await.unwrap();
    let notices = NoticeBuffer::new();
    let id = StoryId::new("a");

    board.toggle_like(&id, &store, &notices).await.unwrap();
    board.toggle_like(&id, &store, &notices).await.unwrap();

    assert_eq!(likes_of(&board, "a"), (5, false));
    assert_eq!(stored_likes(&store, "a"), 5);
    // Only the like raises a success toast; the unlike is silent.
    assert_eq!(notices.count(NoticeKind::Success), 1);
}

#[tokio::test]
async fn unlike_never_goes_negative() {
    let mut stale = story("a", 0);
    stale.liked_by_viewer = true;
    let store = store_with(&[stale.clone()]);
    let mut board = StoryBoard::new(vec![stale]);
    let notices = NoticeBuffer::new();

    board
        .toggle_like(&StoryId::new("a"), &store, &notices)
        .await
        .unwrap();

    assert_eq!(likes_of(&board, "a"), (0, false));
}

#[tokio::test]
async fn toggles_on_different_stories_are_independent() {
    let store = store_with(&[story("a", 1), story("b", 2)]);
    let mut board = load_board(&store, None).await.unwrap();
    let notices = NoticeBuffer::new();

    let first = board.begin_toggle(&StoryId::new("a")).unwrap();
    let second = board.begin_toggle(&StoryId::new("b")).unwrap();
    assert_eq!(likes_of(&board, "a"), (2, true));
    assert_eq!(likes_of(&board, "b"), (3, true));

    let second_outcome = second.persist(&store).await;
    board.settle(second, second_outcome, &notices);
    let first_outcome = first.persist(&store).await;
    board.settle(first, first_outcome, &notices);

    assert_eq!(likes_of(&board, "a"), (2, true));
    assert_eq!(likes_of(&board, "b"), (3, true));
    assert_eq!(stored_likes(&store, "a"), 2);
    assert_eq!(stored_likes(&store, "b"), 3);
}

// =========================================================================
// Overlapping toggles
// =========================================================================

#[tokio::test]
async fn failed_rollback_discards_later_unconfirmed_toggle() {
    let store = store_with(&[story("a", 1), story("b", 2)]);
    let mut board = load_board(&store, None).await.unwrap();
    let notices = NoticeBuffer::new();

    let first = board.begin_toggle(&StoryId::new("a")).unwrap();
    let second = board.begin_toggle(&StoryId::new("b")).unwrap();

    store.fail_next_writes(1);
    let first_outcome = first.persist(&store).await;
    board.settle(first, first_outcome, &notices);

    // The whole-collection snapshot taken by the first toggle predates the
    // second, so the second's optimistic change is gone as well.
    assert_eq!(likes_of(&board, "a"), (1, false));
    assert_eq!(likes_of(&board, "b"), (2, false));

    let second_outcome = second.persist(&store).await;
    let settled = board.settle(second, second_outcome, &notices);

    assert!(settled.is_confirmed());
    assert_eq!(stored_likes(&store, "b"), 3);
    assert_eq!(likes_of(&board, "b"), (2, false));
    assert_eq!(notices.count(NoticeKind::Error), 1);
}

#[tokio::test]
async fn same_story_toggled_twice_before_settling() {
    let store = store_with(&[story("a", 4)]);
    let mut board = load_board(&store, None).await.unwrap();
    let notices = NoticeBuffer::new();
    let id = StoryId::new("a");

    let like = board.begin_toggle(&id).unwrap();
    let unlike = board.begin_toggle(&id).unwrap();
    assert_eq!(like.likes(), 5);
    assert_eq!(unlike.likes(), 4);
    assert!(like.liked());
    assert!(!unlike.liked());

    let outcome = like.persist(&store).await;
    board.settle(like, outcome, &notices);
    let outcome = unlike.persist(&store).await;
    board.settle(unlike, outcome, &notices);

    assert_eq!(likes_of(&board, "a"), (4, false));
    assert_eq!(stored_likes(&store, "a"), 4);
}

// =========================================================================
// Randomized sequences
// =========================================================================

#[tokio::test]
async fn counters_track_liked_flag_through_failures() {
    let base = [story("a", 0), story("b", 3), story("c", 1)];
    let store = store_with(&base);
    let mut board = load_board(&store, None).await.unwrap();
    let notices = NoticeBuffer::new();

    let mut rng = StdRng::seed_from_u64(99);
    let mut errors = 0;
    for _ in 0..300 {
        let pick = &base[rng.random_range(0..base.len())];
        let fail = rng.random_bool(0.25);
        if fail {
            store.fail_next_writes(1);
            errors += 1;
        }

        board.toggle_like(&pick.id, &store, &notices).await.unwrap();

        for original in &base {
            let current = board.get(&original.id).unwrap();
            let expected = original.likes + u32::from(current.liked_by_viewer);
            assert_eq!(current.likes, expected);
        }
    }

    assert_eq!(notices.count(NoticeKind::Error), errors);
}

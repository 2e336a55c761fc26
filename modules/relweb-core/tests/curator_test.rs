//! Ordering guarantees of the gallery curator.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use relweb_common::{Category, StoryRecord};
use relweb_core::{organize, seed};

fn story(id: &str, category: Category, likes: u32) -> StoryRecord {
    StoryRecord::new(id, format!("Story {id}"), "A vignette.", category, likes)
}

fn ids(stories: &[StoryRecord]) -> Vec<&str> {
    stories.iter().map(|s| s.id.as_str()).collect()
}

fn random_collection(rng: &mut StdRng) -> Vec<StoryRecord> {
    let len = rng.random_range(0..14usize);
    (0..len)
        .map(|i| {
            let category = Category::ALL[rng.random_range(0..Category::ALL.len())];
            // Narrow like range so ties are common.
            let likes = rng.random_range(0..6u32);
            story(&format!("s{i}"), category, likes)
        })
        .collect()
}

/// Number of records placed before the popularity-sorted tail.
fn head_len(input: &[StoryRecord], anchor_title: Option<&str>) -> usize {
    let anchor = anchor_title.and_then(|t| input.iter().position(|s| s.title == t));
    let anchor_category = anchor.map(|i| input[i].category);
    let categories: HashSet<Category> = input
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != anchor)
        .map(|(_, s)| s.category)
        .filter(|c| Some(*c) != anchor_category)
        .collect();
    anchor.map_or(0, |_| 1) + categories.len()
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn diversity_pass_then_popularity() {
    let input = vec![
        story("a", Category::Learning, 10),
        story("b", Category::Learning, 20),
        story("c", Category::Community, 5),
    ];

    let output = organize(input, None);

    assert_eq!(ids(&output), vec!["b", "c", "a"]);
}

#[test]
fn single_anchor_record() {
    let input = vec![StoryRecord::new("x", "X", "Only story.", Category::Care, 0)];

    let output = organize(input, Some("X"));

    assert_eq!(output.len(), 1);
    assert_eq!(output[0].title, "X");
}

#[test]
fn empty_input_yields_empty_output() {
    assert!(organize(Vec::new(), Some("Anything")).is_empty());
    assert!(organize(Vec::new(), None).is_empty());
}

#[test]
fn unmatched_anchor_is_ignored() {
    let input = vec![
        story("a", Category::Ai, 3),
        story("b", Category::Care, 9),
    ];

    let with_missing = organize(input.clone(), Some("No Such Story"));
    let without = organize(input, None);

    assert_eq!(ids(&with_missing), ids(&without));
}

#[test]
fn anchor_covers_its_category() {
    let input = vec![
        story("low", Category::Care, 1),
        story("high", Category::Care, 30),
        story("ai", Category::Ai, 2),
    ];

    let output = organize(input, Some("Story low"));

    // The anchor already represents Care, so the diversity pass moves on to
    // AI and the better-liked Care story waits in the tail.
    assert_eq!(ids(&output), vec!["low", "ai", "high"]);
}

#[test]
fn anchor_title_must_match_exactly() {
    let input = vec![story("a", Category::Ai, 3)];

    let output = organize(input, Some("story a"));

    assert_eq!(ids(&output), vec!["a"]);
    assert_eq!(head_len(&output, Some("story a")), 1);
}

#[test]
fn category_tie_goes_to_first_occurrence() {
    let input = vec![
        story("first", Category::Discovery, 7),
        story("second", Category::Discovery, 7),
    ];

    let output = organize(input, None);

    assert_eq!(ids(&output), vec!["first", "second"]);
}

#[test]
fn categories_follow_fixed_order_not_popularity() {
    let input = vec![
        story("ai", Category::Ai, 100),
        story("learning", Category::Learning, 1),
        story("care", Category::Care, 50),
    ];

    let output = organize(input, None);

    assert_eq!(ids(&output), vec!["learning", "care", "ai"]);
}

#[test]
fn launch_stories_order() {
    let output = organize(seed::default_stories(), Some("Networked Abundance"));

    assert_eq!(ids(&output), vec!["1", "5", "8", "2", "3", "7", "4", "6"]);
}

// =========================================================================
// Properties over generated collections
// =========================================================================

#[test]
fn output_is_permutation_of_input() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let input = random_collection(&mut rng);
        let anchor = input.first().map(|s| s.title.clone());

        let output = organize(input.clone(), anchor.as_deref());

        let mut expected: Vec<&str> = ids(&input);
        let mut actual: Vec<&str> = ids(&output);
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected);
    }
}

#[test]
fn matched_anchor_is_always_first() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..500 {
        let input = random_collection(&mut rng);
        if input.is_empty() {
            continue;
        }
        let pick = rng.random_range(0..input.len());
        let title = input[pick].title.clone();

        let output = organize(input, Some(&title));

        assert_eq!(output[0].title, title);
    }
}

#[test]
fn head_has_one_story_per_category() {
    let mut rng = StdRng::seed_from_u64(23);
    for round in 0..500 {
        let input = random_collection(&mut rng);
        let anchor = if round % 2 == 0 {
            input.last().map(|s| s.title.clone())
        } else {
            None
        };
        let head = head_len(&input, anchor.as_deref());

        let output = organize(input, anchor.as_deref());

        let skip = usize::from(anchor.is_some() && !output.is_empty());
        let mut seen = HashSet::new();
        for s in &output[skip..head] {
            assert!(seen.insert(s.category), "category {} repeated in head", s.category);
        }
    }
}

#[test]
fn tail_is_sorted_and_stable() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let input = random_collection(&mut rng);
        let position = |id: &str| input.iter().position(|s| s.id.as_str() == id);
        let head = head_len(&input, None);

        let output = organize(input.clone(), None);
        let tail = &output[head..];

        for pair in tail.windows(2) {
            assert!(pair[0].likes >= pair[1].likes);
            if pair[0].likes == pair[1].likes {
                assert!(position(pair[0].id.as_str()) < position(pair[1].id.as_str()));
            }
        }
    }
}

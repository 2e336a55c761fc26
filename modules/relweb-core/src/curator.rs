//! Gallery ordering.
//!
//! The gallery leads with an optional anchor story, then the best-liked story
//! of each category, then everything else by popularity. This keeps the top of
//! the page spread across tags instead of letting one popular category take
//! every slot.

use relweb_common::{Category, StoryRecord};

/// Order a loaded collection for display.
///
/// 1. The first record whose title equals `anchor_title` goes first.
/// 2. Walking `Category::ALL`, the highest-liked remaining record of each
///    category not already covered by the anchor is appended. Ties go to the
///    earlier record.
/// 3. Whatever is left follows, sorted by likes descending. Equal counts keep
///    their original relative order.
///
/// The result is always a permutation of `records`.
pub fn organize(records: Vec<StoryRecord>, anchor_title: Option<&str>) -> Vec<StoryRecord> {
    let mut remaining = records;
    let mut ordered = Vec::with_capacity(remaining.len());

    let mut anchor_category = None;
    if let Some(title) = anchor_title {
        if let Some(idx) = remaining.iter().position(|s| s.title == title) {
            let anchor = remaining.remove(idx);
            anchor_category = Some(anchor.category);
            ordered.push(anchor);
        }
    }

    for category in Category::ALL {
        if anchor_category == Some(category) {
            continue;
        }
        if let Some(idx) = top_of_category(&remaining, category) {
            ordered.push(remaining.remove(idx));
        }
    }

    // sort_by is stable
    remaining.sort_by(|a, b| b.likes.cmp(&a.likes));
    ordered.extend(remaining);
    ordered
}

/// Index of the highest-liked record in `category`; first occurrence wins ties.
fn top_of_category(records: &[StoryRecord], category: Category) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (idx, story) in records.iter().enumerate() {
        if story.category != category {
            continue;
        }
        match best {
            Some((_, likes)) if likes >= story.likes => {}
            _ => best = Some((idx, story.likes)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Stories shown under a filter button. `None` is "All Stories".
pub fn filter_by_category(records: &[StoryRecord], category: Option<Category>) -> Vec<&StoryRecord> {
    records
        .iter()
        .filter(|s| category.map_or(true, |c| s.category == c))
        .collect()
}

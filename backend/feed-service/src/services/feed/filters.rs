use super::predicate::FeedPredicate;
use crate::models::FeedFilter;

/// AND the optional search and tag filters onto `visibility`.
///
/// Search is a case-sensitive substring match. Tags match exactly and
/// case-sensitively; duplicates in the requested set are dropped.
pub fn compose(visibility: FeedPredicate, filter: &FeedFilter) -> FeedPredicate {
    let mut predicate = FeedPredicate::All(vec![visibility]);

    if let Some(text) = filter.search_text() {
        predicate = predicate.and(FeedPredicate::ContentContains {
            text: text.to_string(),
        });
    }

    let tags = dedup_tags(&filter.tags);
    if !tags.is_empty() {
        predicate = predicate.and(FeedPredicate::TagsOverlap { tags });
    }

    predicate
}

fn dedup_tags(tags: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(tag) {
            unique.push(tag.clone());
        }
    }
    unique
}

use super::predicate::FeedPredicate;

/// Posts `user_id` may see: their own, plus posts by every user they hold a
/// friend edge towards (`friends.user_id = user_id`, `friends.friend_id =
/// owner`). Edges are directed; the reverse edge alone grants nothing.
pub fn visible_to(user_id: &str) -> FeedPredicate {
    FeedPredicate::VisibleTo {
        user_id: user_id.to_string(),
    }
}

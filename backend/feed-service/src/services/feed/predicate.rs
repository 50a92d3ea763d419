//! Composable feed predicates.
//!
//! A predicate is a value, not SQL text. It is rendered into a
//! [`QueryBuilder`] where every user-supplied value goes through
//! `push_bind`, so filter input can never change the shape of the query.
//! Every rendered node is wrapped in parentheses and can be ANDed with
//! anything else without precedence surprises.

use sqlx::{Postgres, QueryBuilder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedPredicate {
    /// Post owner is the requester, or the requester has a friend edge
    /// pointing at the post owner.
    VisibleTo { user_id: String },
    /// Case-sensitive substring match on the post content.
    ContentContains { text: String },
    /// Post tags share at least one element with `tags`.
    TagsOverlap { tags: Vec<String> },
    /// Conjunction; an empty list renders as `TRUE`.
    All(Vec<FeedPredicate>),
}

impl FeedPredicate {
    /// AND two predicates, flattening nested conjunctions.
    pub fn and(self, other: FeedPredicate) -> FeedPredicate {
        let mut parts = match self {
            FeedPredicate::All(parts) => parts,
            single => vec![single],
        };
        match other {
            FeedPredicate::All(more) => parts.extend(more),
            single => parts.push(single),
        }
        FeedPredicate::All(parts)
    }

    /// Number of bind parameters this predicate pushes when rendered.
    #[cfg(test)]
    pub fn bind_count(&self) -> usize {
        match self {
            FeedPredicate::VisibleTo { .. } => 2,
            FeedPredicate::ContentContains { .. } | FeedPredicate::TagsOverlap { .. } => 1,
            FeedPredicate::All(parts) => parts.iter().map(FeedPredicate::bind_count).sum(),
        }
    }

    /// Append this predicate to `qb` as a single parenthesized condition.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            FeedPredicate::VisibleTo { user_id } => {
                qb.push("(p.user_id = ");
                qb.push_bind(user_id.clone());
                qb.push(" OR EXISTS (SELECT 1 FROM friends f WHERE f.user_id = ");
                qb.push_bind(user_id.clone());
                qb.push(" AND f.friend_id = p.user_id))");
            }
            FeedPredicate::ContentContains { text } => {
                // strpos keeps `%`, `_` and `\` literal, unlike LIKE patterns
                qb.push("(strpos(p.content, ");
                qb.push_bind(text.clone());
                qb.push(") > 0)");
            }
            FeedPredicate::TagsOverlap { tags } => {
                qb.push("(p.tags && ");
                qb.push_bind(tags.clone());
                qb.push("::text[])");
            }
            FeedPredicate::All(parts) if parts.is_empty() => {
                qb.push("TRUE");
            }
            FeedPredicate::All(parts) => {
                qb.push("(");
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        qb.push(" AND ");
                    }
                    part.push_sql(qb);
                }
                qb.push(")");
            }
        }
    }
}

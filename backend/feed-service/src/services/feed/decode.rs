//! Decoding of the aggregated comment payload.
//!
//! Each post row carries its comments as a JSON array whose elements are
//! positional tuples:
//!
//! ```text
//! [text, created_at, author_id, author_name, author_image_url,
//!  author_friend_count, author_created_at]
//! ```
//!
//! JSON keeps field boundaries structural, so commas, quotes or brackets in
//! comment text cannot shift the remaining fields. Anything that does not
//! match the tuple exactly is a data-integrity failure.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::db::feed_store::FeedRow;
use crate::error::FeedError;
use crate::models::{Comment, Creator, FeedPost, Post};

/// Fields per encoded comment tuple.
pub const COMMENT_FIELD_COUNT: usize = 7;

const FIELD_NAMES: [&str; COMMENT_FIELD_COUNT] = [
    "comment",
    "created_at",
    "author_id",
    "author_name",
    "author_image_url",
    "author_friend_count",
    "author_created_at",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("comment payload is not a JSON array (found {found})")]
    NotAnArray { found: &'static str },

    #[error("comment #{index} is not a tuple (found {found})")]
    NotATuple { index: usize, found: &'static str },

    #[error("comment #{index} has {found} fields, expected {expected}")]
    FieldCount {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("comment #{index} field `{field}`: {reason}")]
    Field {
        index: usize,
        field: &'static str,
        reason: String,
    },
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

struct TupleReader<'a> {
    index: usize,
    fields: &'a [Value],
}

impl<'a> TupleReader<'a> {
    fn field_error(&self, pos: usize, reason: String) -> DecodeError {
        DecodeError::Field {
            index: self.index,
            field: FIELD_NAMES[pos],
            reason,
        }
    }

    fn string(&self, pos: usize) -> Result<String, DecodeError> {
        match &self.fields[pos] {
            Value::String(s) => Ok(s.clone()),
            other => Err(self.field_error(pos, format!("expected string, found {}", json_type(other)))),
        }
    }

    fn optional_string(&self, pos: usize) -> Result<Option<String>, DecodeError> {
        match &self.fields[pos] {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            other => Err(self.field_error(
                pos,
                format!("expected string or null, found {}", json_type(other)),
            )),
        }
    }

    fn count(&self, pos: usize) -> Result<i64, DecodeError> {
        match self.fields[pos].as_i64() {
            Some(n) if n >= 0 => Ok(n),
            Some(n) => Err(self.field_error(pos, format!("negative count {}", n))),
            None => Err(self.field_error(
                pos,
                format!("expected integer, found {}", json_type(&self.fields[pos])),
            )),
        }
    }

    fn timestamp(&self, pos: usize) -> Result<DateTime<Utc>, DecodeError> {
        let raw = self.string(pos)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| self.field_error(pos, format!("invalid timestamp {:?}: {}", raw, e)))
    }
}

fn decode_comment(index: usize, value: &Value) -> Result<Comment, DecodeError> {
    let fields = value.as_array().ok_or(DecodeError::NotATuple {
        index,
        found: json_type(value),
    })?;

    if fields.len() != COMMENT_FIELD_COUNT {
        return Err(DecodeError::FieldCount {
            index,
            expected: COMMENT_FIELD_COUNT,
            found: fields.len(),
        });
    }

    let reader = TupleReader { index, fields };
    Ok(Comment {
        text: reader.string(0)?,
        created_at: reader.timestamp(1)?,
        creator: Creator {
            id: reader.string(2)?,
            name: reader.string(3)?,
            image_url: reader.optional_string(4)?,
            friend_count: reader.count(5)?,
            created_at: reader.timestamp(6)?,
        },
    })
}

/// Decode one post's aggregated comments, preserving emission order.
pub fn decode_comments(payload: &Value) -> Result<Vec<Comment>, DecodeError> {
    let items = payload.as_array().ok_or(DecodeError::NotAnArray {
        found: json_type(payload),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| decode_comment(index, item))
        .collect()
}

/// Turn a raw page row into a feed post.
pub fn decode_row(row: FeedRow) -> Result<FeedPost, FeedError> {
    let comments = decode_comments(&row.comments)
        .map_err(|e| FeedError::DataIntegrity(format!("post {}: {}", row.id, e)))?;

    let creator_friend_count = i64::from(row.creator_friend_count);
    if creator_friend_count < 0 {
        return Err(FeedError::DataIntegrity(format!(
            "post {}: creator {} has negative friend count {}",
            row.id, row.user_id, creator_friend_count
        )));
    }

    Ok(FeedPost {
        creator: Creator {
            id: row.user_id.clone(),
            name: row.creator_name,
            image_url: row.creator_image_url,
            friend_count: creator_friend_count,
            created_at: row.creator_created_at,
        },
        post: Post {
            id: row.id,
            owner_id: row.user_id,
            content: row.content,
            tags: row.tags,
            created_at: row.created_at,
        },
        comments,
    })
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::validator::Validator;

pub const CONTENT_MAX_BYTES: usize = 100;
pub const AUTHOR_MAX_BYTES: usize = 25;

/// Represents the 'comments' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: i64,

    /// Assigned by the database; never exposed to clients.
    #[serde(skip)]
    pub created_at: chrono::DateTime<chrono::Utc>,

    pub content: String,
    pub author: String,

    /// Bumped by the database on every successful update.
    pub version: i32,
}

/// The client-writable part of a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentInput {
    pub content: String,
    pub author: String,
}

/// DTO for creating a new comment.
///
/// Missing fields decode as empty strings so that they surface as
/// validation failures rather than decode errors.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateCommentRequest {
    pub content: String,
    pub author: String,
}

impl From<CreateCommentRequest> for CommentInput {
    fn from(req: CreateCommentRequest) -> Self {
        Self {
            content: req.content,
            author: req.author,
        }
    }
}

/// DTO for a partial update. Omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
    pub author: Option<String>,
}

impl UpdateCommentRequest {
    /// Overlays the supplied fields on top of the stored comment.
    pub fn apply_to(self, current: &Comment) -> CommentInput {
        CommentInput {
            content: self.content.unwrap_or_else(|| current.content.clone()),
            author: self.author.unwrap_or_else(|| current.author.clone()),
        }
    }
}

/// Field rules for a comment. Lengths are UTF-8 byte counts, matching the
/// `octet_length` checks on the table.
pub fn validate_comment(v: &mut Validator, comment: &CommentInput) {
    v.check(!comment.content.is_empty(), "content", "must be provided");
    v.check(!comment.author.is_empty(), "author", "must be provided");
    v.check(
        comment.content.len() <= CONTENT_MAX_BYTES,
        "content",
        "must not be more than 100 bytes long",
    );
    v.check(
        comment.author.len() <= AUTHOR_MAX_BYTES,
        "author",
        "must not be more than 25 bytes long",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(content: &str, author: &str) -> CommentInput {
        CommentInput {
            content: content.to_string(),
            author: author.to_string(),
        }
    }

    fn failures(content: &str, author: &str) -> Vec<(String, String)> {
        let mut v = Validator::new();
        validate_comment(&mut v, &input(content, author));
        v.into_errors().into_iter().collect()
    }

    #[test]
    fn boundary_lengths_pass() {
        assert!(failures("a", "b").is_empty());
        assert!(failures(&"c".repeat(100), &"d".repeat(25)).is_empty());
    }

    #[test]
    fn empty_fields_report_must_be_provided() {
        let errs = failures("", "");
        assert_eq!(
            errs,
            vec![
                ("author".to_string(), "must be provided".to_string()),
                ("content".to_string(), "must be provided".to_string()),
            ]
        );
    }

    #[test]
    fn over_limit_reports_only_that_key() {
        let errs = failures(&"x".repeat(101), "ann");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].0, "content");
        assert_eq!(errs[0].1, "must not be more than 100 bytes long");

        let errs = failures("hello", &"y".repeat(26));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].1, "must not be more than 25 bytes long");
    }

    #[test]
    fn length_is_measured_in_bytes() {
        // 13 chars, 26 bytes.
        let author = "é".repeat(13);
        assert_eq!(author.chars().count(), 13);

        let errs = failures("hello", &author);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].0, "author");
    }

    #[test]
    fn partial_update_keeps_missing_fields() {
        let stored = Comment {
            id: 1,
            created_at: chrono::Utc::now(),
            content: "hello".to_string(),
            author: "ann".to_string(),
            version: 1,
        };
        let patch = UpdateCommentRequest {
            content: Some("hi".to_string()),
            author: None,
        };

        assert_eq!(patch.apply_to(&stored), input("hi", "ann"));
    }

    #[test]
    fn serialized_comment_hides_created_at() {
        let comment = Comment {
            id: 7,
            created_at: chrono::Utc::now(),
            content: "hello".to_string(),
            author: "ann".to_string(),
            version: 3,
        };
        let value = serde_json::to_value(&comment).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"id": 7, "content": "hello", "author": "ann", "version": 3})
        );
    }

    #[test]
    fn request_bodies_must_be_objects() {
        use crate::utils::json::decode_json;

        assert!(decode_json::<CreateCommentRequest>(br#"["hello","ann"]"#).is_err());
        assert!(decode_json::<UpdateCommentRequest>(br#"["hi",null]"#).is_err());

        let patch: UpdateCommentRequest = decode_json(br#"{"content": "hi"}"#).unwrap();
        assert_eq!(patch.content.as_deref(), Some("hi"));
        assert!(patch.author.is_none());
    }
}

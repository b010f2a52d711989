use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A typed link between a user and a post. At most one row exists per
/// (user, post, type) triple; the schema enforces this with a composite
/// unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostInteraction {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub interaction_type: InteractionType,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    Like,
    Comment,
}

impl InteractionType {
    pub const ALL: [InteractionType; 2] = [Self::Like, Self::Comment];

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "like" => Some(Self::Like),
            "comment" => Some(Self::Comment),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Comment => "comment",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub author_name: String,
    pub post_id: i64,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

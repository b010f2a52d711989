use anyhow::Result;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::domain::interaction::{Comment, InteractionType, PostInteraction};
use crate::infra::db::Db;

const INTERACTION_COLUMNS: &str =
    "id, user_id, post_id, interaction_type::text AS interaction_type, created_at";

const COMMENT_COLUMNS: &str =
    "c.id, c.user_id, u.name AS author_name, c.post_id, c.content, c.created_at";

fn interaction_from_row(row: &PgRow) -> Result<PostInteraction> {
    let kind: String = row.get("interaction_type");
    let interaction_type = InteractionType::from_db(&kind)
        .ok_or_else(|| anyhow::anyhow!("unknown interaction type: {}", kind))?;

    Ok(PostInteraction {
        id: row.get("id"),
        user_id: row.get("user_id"),
        post_id: row.get("post_id"),
        interaction_type,
        created_at: row.get("created_at"),
    })
}

fn comment_from_row(row: &PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        user_id: row.get("user_id"),
        author_name: row.get("author_name"),
        post_id: row.get("post_id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeOutcome {
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Clone)]
pub struct InteractionService {
    db: Db,
}

impl InteractionService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    // ------------------------------------------------------------------
    // Interaction queries
    // ------------------------------------------------------------------

    /// Zero-or-one row for the exact (user, post, type) triple. Absence is a
    /// normal outcome.
    pub async fn find(
        &self,
        user_id: i64,
        post_id: i64,
        interaction_type: InteractionType,
    ) -> Result<Option<PostInteraction>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM post_interactions \
             WHERE user_id = $1 AND post_id = $2 AND interaction_type = $3::interaction_kind",
            INTERACTION_COLUMNS
        ))
        .bind(user_id)
        .bind(post_id)
        .bind(interaction_type.as_db())
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(interaction_from_row).transpose()
    }

    pub async fn list_by_post_and_type(
        &self,
        post_id: i64,
        interaction_type: InteractionType,
    ) -> Result<Vec<PostInteraction>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM post_interactions \
             WHERE post_id = $1 AND interaction_type = $2::interaction_kind \
             ORDER BY created_at DESC, id DESC",
            INTERACTION_COLUMNS
        ))
        .bind(post_id)
        .bind(interaction_type.as_db())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(interaction_from_row).collect()
    }

    pub async fn list_by_user_and_type(
        &self,
        user_id: i64,
        interaction_type: InteractionType,
    ) -> Result<Vec<PostInteraction>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM post_interactions \
             WHERE user_id = $1 AND interaction_type = $2::interaction_kind \
             ORDER BY created_at DESC, id DESC",
            INTERACTION_COLUMNS
        ))
        .bind(user_id)
        .bind(interaction_type.as_db())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(interaction_from_row).collect()
    }

    /// Lightweight presence probe; does not fetch the row.
    pub async fn exists(
        &self,
        user_id: i64,
        post_id: i64,
        interaction_type: InteractionType,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS( \
                SELECT 1 FROM post_interactions \
                WHERE user_id = $1 AND post_id = $2 AND interaction_type = $3::interaction_kind \
             )",
        )
        .bind(user_id)
        .bind(post_id)
        .bind(interaction_type.as_db())
        .fetch_one(self.db.pool())
        .await?;

        Ok(exists)
    }

    pub async fn count_by_post_and_type(
        &self,
        post_id: i64,
        interaction_type: InteractionType,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM post_interactions \
             WHERE post_id = $1 AND interaction_type = $2::interaction_kind",
        )
        .bind(post_id)
        .bind(interaction_type.as_db())
        .fetch_one(self.db.pool())
        .await?;

        Ok(count)
    }

    /// All interactions on a post, any type.
    pub async fn list_by_post(&self, post_id: i64) -> Result<Vec<PostInteraction>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM post_interactions \
             WHERE post_id = $1 \
             ORDER BY created_at DESC, id DESC",
            INTERACTION_COLUMNS
        ))
        .bind(post_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(interaction_from_row).collect()
    }

    // ------------------------------------------------------------------
    // Likes
    // ------------------------------------------------------------------

    /// Flips the like state for (user, post). Returns `None` when the post
    /// or user does not exist.
    pub async fn toggle_like(&self, user_id: i64, post_id: i64) -> Result<Option<LikeOutcome>> {
        if self.exists(user_id, post_id, InteractionType::Like).await? {
            sqlx::query(
                "DELETE FROM post_interactions \
                 WHERE user_id = $1 AND post_id = $2 AND interaction_type = $3::interaction_kind",
            )
            .bind(user_id)
            .bind(post_id)
            .bind(InteractionType::Like.as_db())
            .execute(self.db.pool())
            .await?;

            let like_count = self
                .count_by_post_and_type(post_id, InteractionType::Like)
                .await?;
            return Ok(Some(LikeOutcome {
                liked: false,
                like_count,
            }));
        }

        let result = sqlx::query(
            "INSERT INTO post_interactions (user_id, post_id, interaction_type) \
             VALUES ($1, $2, $3::interaction_kind) \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(post_id)
        .bind(InteractionType::Like.as_db())
        .execute(self.db.pool())
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(err)) if err.is_foreign_key_violation() => return Ok(None),
            Err(err) => return Err(err.into()),
        }

        let like_count = self
            .count_by_post_and_type(post_id, InteractionType::Like)
            .await?;
        Ok(Some(LikeOutcome {
            liked: true,
            like_count,
        }))
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    /// Inserts the comment and records the (user, post, comment) interaction.
    /// Returns `None` when the post or user does not exist.
    pub async fn add_comment(
        &self,
        user_id: i64,
        post_id: i64,
        content: String,
    ) -> Result<Option<Comment>> {
        let result = sqlx::query(&format!(
            "WITH inserted_comment AS ( \
                INSERT INTO comments (user_id, post_id, content) \
                VALUES ($1, $2, $3) \
                RETURNING id, user_id, post_id, content, created_at \
             ) \
             SELECT {} FROM inserted_comment c JOIN users u ON c.user_id = u.id",
            COMMENT_COLUMNS
        ))
        .bind(user_id)
        .bind(post_id)
        .bind(content)
        .fetch_one(self.db.pool())
        .await;

        let comment = match result {
            Ok(row) => comment_from_row(&row),
            Err(sqlx::Error::Database(err)) if err.is_foreign_key_violation() => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        sqlx::query(
            "INSERT INTO post_interactions (user_id, post_id, interaction_type) \
             VALUES ($1, $2, $3::interaction_kind) \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(post_id)
        .bind(InteractionType::Comment.as_db())
        .execute(self.db.pool())
        .await?;

        Ok(Some(comment))
    }

    /// Comments on a post in conversation order (oldest first).
    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM comments c JOIN users u ON c.user_id = u.id \
             WHERE c.post_id = $1 \
             ORDER BY c.created_at ASC, c.id ASC",
            COMMENT_COLUMNS
        ))
        .bind(post_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(comment_from_row).collect())
    }

    /// Ownership enforced in the WHERE clause; wrong owner reads as missing.
    pub async fn update_comment(
        &self,
        comment_id: i64,
        user_id: i64,
        content: String,
    ) -> Result<Option<Comment>> {
        let row = sqlx::query(&format!(
            "WITH updated_comment AS ( \
                UPDATE comments SET content = $3 \
                WHERE id = $1 AND user_id = $2 \
                RETURNING id, user_id, post_id, content, created_at \
             ) \
             SELECT {} FROM updated_comment c JOIN users u ON c.user_id = u.id",
            COMMENT_COLUMNS
        ))
        .bind(comment_id)
        .bind(user_id)
        .bind(content)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(comment_from_row))
    }

    /// Deletes the comment; when it was the user's last comment on the post,
    /// the (user, post, comment) interaction row goes with it.
    pub async fn delete_comment(&self, comment_id: i64, user_id: i64) -> Result<bool> {
        let row = sqlx::query(
            "DELETE FROM comments WHERE id = $1 AND user_id = $2 RETURNING post_id",
        )
        .bind(comment_id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(row) = row else {
            return Ok(false);
        };
        let post_id: i64 = row.get("post_id");

        let remaining: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments WHERE post_id = $1 AND user_id = $2",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(self.db.pool())
        .await?;

        if remaining == 0 {
            sqlx::query(
                "DELETE FROM post_interactions \
                 WHERE user_id = $1 AND post_id = $2 AND interaction_type = $3::interaction_kind",
            )
            .bind(user_id)
            .bind(post_id)
            .bind(InteractionType::Comment.as_db())
            .execute(self.db.pool())
            .await?;
        }

        Ok(true)
    }
}

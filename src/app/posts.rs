use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::domain::post::Post;
use crate::infra::db::Db;

const POST_COLUMNS: &str =
    "p.id, p.user_id, u.name AS author_name, p.title, p.description, p.created_at, \
     (SELECT COUNT(*) FROM post_interactions i \
        WHERE i.post_id = p.id AND i.interaction_type = 'like') AS like_count, \
     (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count";

fn post_from_row(row: &PgRow) -> Post {
    Post {
        id: row.get("id"),
        user_id: row.get("user_id"),
        author_name: row.get("author_name"),
        title: row.get("title"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        like_count: row.get("like_count"),
        comment_count: row.get("comment_count"),
    }
}

#[derive(Clone)]
pub struct PostService {
    db: Db,
}

impl PostService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Returns `None` when the owning user does not exist.
    pub async fn create(
        &self,
        user_id: i64,
        title: String,
        description: String,
    ) -> Result<Option<Post>> {
        let result = sqlx::query(&format!(
            "WITH inserted_post AS ( \
                INSERT INTO posts (user_id, title, description) \
                VALUES ($1, $2, $3) \
                RETURNING id, user_id, title, description, created_at \
             ) \
             SELECT {} FROM inserted_post p JOIN users u ON p.user_id = u.id",
            POST_COLUMNS
        ))
        .bind(user_id)
        .bind(title)
        .bind(description)
        .fetch_one(self.db.pool())
        .await;

        match result {
            Ok(row) => Ok(Some(post_from_row(&row))),
            Err(sqlx::Error::Database(err)) if err.is_foreign_key_violation() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get(&self, post_id: i64) -> Result<Option<Post>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM posts p JOIN users u ON p.user_id = u.id WHERE p.id = $1",
            POST_COLUMNS
        ))
        .bind(post_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(post_from_row))
    }

    /// All posts owned by a user. No ordering clause; an unknown user yields
    /// an empty vec, not an error.
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM posts p JOIN users u ON p.user_id = u.id WHERE p.user_id = $1",
            POST_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    /// All posts across all users, most recent first.
    pub async fn list_newest_first(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM posts p JOIN users u ON p.user_id = u.id \
             ORDER BY p.created_at DESC, p.id DESC",
            POST_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    /// One user's posts, most recent first.
    pub async fn list_by_user_newest_first(&self, user_id: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM posts p JOIN users u ON p.user_id = u.id \
             WHERE p.user_id = $1 \
             ORDER BY p.created_at DESC, p.id DESC",
            POST_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    /// Ownership enforced in the WHERE clause; wrong owner reads as missing.
    pub async fn update(
        &self,
        post_id: i64,
        user_id: i64,
        title: String,
        description: String,
    ) -> Result<Option<Post>> {
        let row = sqlx::query(&format!(
            "WITH updated_post AS ( \
                UPDATE posts SET title = $3, description = $4 \
                WHERE id = $1 AND user_id = $2 \
                RETURNING id, user_id, title, description, created_at \
             ) \
             SELECT {} FROM updated_post p JOIN users u ON p.user_id = u.id",
            POST_COLUMNS
        ))
        .bind(post_id)
        .bind(user_id)
        .bind(title)
        .bind(description)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(post_from_row))
    }

    pub async fn delete(&self, post_id: i64, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

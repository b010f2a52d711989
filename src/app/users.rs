use anyhow::Result;
use sqlx::Row;

use crate::domain::user::User;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct UserService {
    db: Db,
}

impl UserService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Returns `None` when the email is already taken.
    pub async fn create_user(&self, name: &str, email: &str) -> Result<Option<User>> {
        let result = sqlx::query(
            "INSERT INTO users (name, email) VALUES ($1, $2) \
             RETURNING id, name, email, created_at",
        )
        .bind(name)
        .bind(email)
        .fetch_one(self.db.pool())
        .await;

        match result {
            Ok(row) => Ok(Some(User {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
                created_at: row.get("created_at"),
            })),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, email, created_at FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?;

        let user = row.map(|row| User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        });

        Ok(user)
    }
}

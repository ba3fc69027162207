//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use es_core::domain::entities::user::User;
use es_core::errors::DomainError;
use es_core::repositories::UserRepository;

use super::{is_unique_violation, storage_error};

const USER_COLUMNS: &str = "id, email, password_hash, is_verified, created_at, updated_at";

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| storage_error("Failed to get id", e))?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::storage(format!("Invalid user UUID: {}", e)))?,
            email: row
                .try_get("email")
                .map_err(|e| storage_error("Failed to get email", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| storage_error("Failed to get password_hash", e))?,
            is_verified: row
                .try_get("is_verified")
                .map_err(|e| storage_error("Failed to get is_verified", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| storage_error("Failed to get created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| storage_error("Failed to get updated_at", e))?,
        })
    }

    fn email_conflict() -> DomainError {
        DomainError::Conflict {
            message: "Email already registered".to_string(),
        }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (id, email, password_hash, is_verified, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.is_verified)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Self::email_conflict()
                } else {
                    storage_error("Failed to create user", e)
                }
            })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = ? LIMIT 1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to find user", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE email = ? LIMIT 1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to find user by email", e))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn mark_verified(&self, id: Uuid, email: &str) -> Result<bool, DomainError> {
        // updated_at always changes, so a matched row always counts as affected
        let result = sqlx::query(
            "UPDATE users SET is_verified = TRUE, updated_at = ? WHERE id = ? AND email = ?",
        )
        .bind(Utc::now())
        .bind(id.to_string())
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to update verification flag", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn change_email(&self, id: Uuid, email: &str) -> Result<Option<User>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("Failed to begin transaction", e))?;

        let result = sqlx::query(
            "UPDATE users SET email = ?, is_verified = FALSE, updated_at = ? WHERE id = ?",
        )
        .bind(email)
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Self::email_conflict()
            } else {
                storage_error("Failed to change email", e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        // Links sent to the previous address must stop working with the change
        sqlx::query(
            "UPDATE user_verifications SET token_email = NULL, expires_at = NULL WHERE user_id = ?",
        )
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error("Failed to revoke verification token", e))?;

        tx.commit()
            .await
            .map_err(|e| storage_error("Failed to commit email change", e))?;

        self.find_by_id(id).await
    }
}

//! MySQL implementation of the VerificationRepository trait.
//!
//! Every mutation is a single statement, so each is atomic per row.
//! Consumption relies on `UPDATE .. WHERE user_id = ? AND token_email = ?`
//! affecting exactly one row for exactly one caller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use es_core::domain::entities::verification_record::VerificationRecord;
use es_core::errors::DomainError;
use es_core::repositories::VerificationRepository;

use super::storage_error;

/// MySQL implementation of VerificationRepository
pub struct MySqlVerificationRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlVerificationRepository {
    /// Create a new MySQL verification repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<VerificationRecord, DomainError> {
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| storage_error("Failed to get user_id", e))?;

        Ok(VerificationRecord {
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| DomainError::storage(format!("Invalid user UUID: {}", e)))?,
            token_plaintext: row
                .try_get("token_email")
                .map_err(|e| storage_error("Failed to get token_email", e))?,
            expires_at: row
                .try_get::<Option<DateTime<Utc>>, _>("expires_at")
                .map_err(|e| storage_error("Failed to get expires_at", e))?,
        })
    }
}

#[async_trait]
impl VerificationRepository for MySqlVerificationRepository {
    async fn create_for_user(&self, user_id: Uuid) -> Result<VerificationRecord, DomainError> {
        sqlx::query("INSERT IGNORE INTO user_verifications (user_id) VALUES (?)")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to create verification record", e))?;

        self.find_by_user_id(user_id)
            .await?
            .ok_or_else(|| DomainError::storage("verification record missing after insert"))
    }

    async fn issue(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<VerificationRecord, DomainError> {
        let query = r#"
            INSERT INTO user_verifications (user_id, token_email, expires_at)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE
                token_email = VALUES(token_email),
                expires_at = VALUES(expires_at)
        "#;

        sqlx::query(query)
            .bind(user_id.to_string())
            .bind(token)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("Failed to issue verification token", e))?;

        Ok(VerificationRecord {
            user_id,
            token_plaintext: Some(token.to_string()),
            expires_at: Some(expires_at),
        })
    }

    async fn find_by_plaintext(&self, token: &str) -> Result<Option<VerificationRecord>, DomainError> {
        let row = sqlx::query(
            "SELECT user_id, token_email, expires_at FROM user_verifications WHERE token_email = ? LIMIT 1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to look up verification token", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<VerificationRecord>, DomainError> {
        let row = sqlx::query(
            "SELECT user_id, token_email, expires_at FROM user_verifications WHERE user_id = ? LIMIT 1",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to find verification record", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn clear(&self, user_id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE user_verifications SET token_email = NULL, expires_at = NULL WHERE user_id = ?",
        )
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to clear verification record", e))?;

        // MySQL reports matched-but-unchanged rows as 0 affected
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        Ok(self.find_by_user_id(user_id).await?.is_some())
    }

    async fn clear_if_matches(&self, user_id: Uuid, token: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE user_verifications
            SET token_email = NULL, expires_at = NULL
            WHERE user_id = ? AND token_email = ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("Failed to consume verification token", e))?;

        Ok(result.rows_affected() == 1)
    }
}

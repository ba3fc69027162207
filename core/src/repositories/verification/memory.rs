//! In-memory implementation of VerificationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::DomainError;

use super::r#trait::VerificationRepository;

#[derive(Default)]
struct Store {
    records: HashMap<Uuid, VerificationRecord>,
    // plaintext token -> owning user
    by_token: HashMap<String, Uuid>,
}

impl Store {
    fn drop_token(&mut self, user_id: Uuid) {
        if let Some(record) = self.records.get_mut(&user_id) {
            if let Some(old) = record.token_plaintext.take() {
                self.by_token.remove(&old);
            }
            record.clear();
        }
    }
}

/// In-memory verification repository.
///
/// Records and the token index live behind a single lock so each operation
/// is atomic with respect to the others.
#[derive(Clone, Default)]
pub struct InMemoryVerificationRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryVerificationRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record as-is, bypassing the issuance invariants.
    ///
    /// Used to seed states that `issue` cannot produce, such as a token
    /// without an expiry.
    pub async fn insert_raw(&self, record: VerificationRecord) {
        let mut store = self.store.write().await;
        store.drop_token(record.user_id);
        if let Some(token) = &record.token_plaintext {
            store.by_token.insert(token.clone(), record.user_id);
        }
        store.records.insert(record.user_id, record);
    }

    /// Number of records that currently hold a token
    pub async fn live_token_count(&self) -> usize {
        self.store.read().await.by_token.len()
    }
}

#[async_trait]
impl VerificationRepository for InMemoryVerificationRepository {
    async fn create_for_user(&self, user_id: Uuid) -> Result<VerificationRecord, DomainError> {
        let mut store = self.store.write().await;
        Ok(store
            .records
            .entry(user_id)
            .or_insert_with(|| VerificationRecord::new(user_id))
            .clone())
    }

    async fn issue(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<VerificationRecord, DomainError> {
        let mut store = self.store.write().await;

        if let Some(owner) = store.by_token.get(token) {
            if *owner != user_id {
                return Err(DomainError::storage("duplicate verification token"));
            }
        }

        store.drop_token(user_id);
        let record = VerificationRecord {
            user_id,
            token_plaintext: Some(token.to_string()),
            expires_at: Some(expires_at),
        };
        store.by_token.insert(token.to_string(), user_id);
        store.records.insert(user_id, record.clone());
        Ok(record)
    }

    async fn find_by_plaintext(&self, token: &str) -> Result<Option<VerificationRecord>, DomainError> {
        let store = self.store.read().await;
        Ok(store
            .by_token
            .get(token)
            .and_then(|user_id| store.records.get(user_id))
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<VerificationRecord>, DomainError> {
        Ok(self.store.read().await.records.get(&user_id).cloned())
    }

    async fn clear(&self, user_id: Uuid) -> Result<bool, DomainError> {
        let mut store = self.store.write().await;
        if !store.records.contains_key(&user_id) {
            return Ok(false);
        }
        store.drop_token(user_id);
        Ok(true)
    }

    async fn clear_if_matches(&self, user_id: Uuid, token: &str) -> Result<bool, DomainError> {
        let mut store = self.store.write().await;
        let matches = store
            .records
            .get(&user_id)
            .map(|record| record.matches(token))
            .unwrap_or(false);

        if matches {
            store.drop_token(user_id);
        }
        Ok(matches)
    }
}

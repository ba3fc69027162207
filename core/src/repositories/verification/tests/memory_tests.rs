//! Tests for the in-memory verification repository

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::verification_record::VerificationRecord;
use crate::repositories::verification::{InMemoryVerificationRepository, VerificationRepository};

#[tokio::test]
async fn test_create_for_user_is_empty_and_idempotent() {
    let repo = InMemoryVerificationRepository::new();
    let user_id = Uuid::new_v4();

    let record = repo.create_for_user(user_id).await.unwrap();
    assert_eq!(record, VerificationRecord::new(user_id));

    repo.issue(user_id, "abc", Utc::now()).await.unwrap();
    let again = repo.create_for_user(user_id).await.unwrap();
    assert!(again.has_token());
}

#[tokio::test]
async fn test_issue_then_lookup() {
    let repo = InMemoryVerificationRepository::new();
    let user_id = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(1);

    repo.issue(user_id, "token-1", expires_at).await.unwrap();

    let by_token = repo.find_by_plaintext("token-1").await.unwrap().unwrap();
    assert_eq!(by_token.user_id, user_id);
    assert_eq!(by_token.expires_at, Some(expires_at));

    let by_user = repo.find_by_user_id(user_id).await.unwrap().unwrap();
    assert_eq!(by_user, by_token);

    assert!(repo.find_by_plaintext("token-2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_reissue_overwrites_previous_token() {
    let repo = InMemoryVerificationRepository::new();
    let user_id = Uuid::new_v4();

    repo.issue(user_id, "first", Utc::now()).await.unwrap();
    repo.issue(user_id, "second", Utc::now()).await.unwrap();

    assert!(repo.find_by_plaintext("first").await.unwrap().is_none());
    assert!(repo.find_by_plaintext("second").await.unwrap().is_some());
    assert_eq!(repo.live_token_count().await, 1);
}

#[tokio::test]
async fn test_clear_nulls_both_fields() {
    let repo = InMemoryVerificationRepository::new();
    let user_id = Uuid::new_v4();
    repo.issue(user_id, "token", Utc::now()).await.unwrap();

    assert!(repo.clear(user_id).await.unwrap());

    let record = repo.find_by_user_id(user_id).await.unwrap().unwrap();
    assert!(record.token_plaintext.is_none());
    assert!(record.expires_at.is_none());
    assert!(repo.find_by_plaintext("token").await.unwrap().is_none());

    assert!(!repo.clear(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn test_clear_if_matches_only_once() {
    let repo = InMemoryVerificationRepository::new();
    let user_id = Uuid::new_v4();
    repo.issue(user_id, "token", Utc::now()).await.unwrap();

    assert!(!repo.clear_if_matches(user_id, "other").await.unwrap());
    assert!(repo.clear_if_matches(user_id, "token").await.unwrap());
    assert!(!repo.clear_if_matches(user_id, "token").await.unwrap());
}

#[tokio::test]
async fn test_clear_if_matches_concurrent() {
    let repo = Arc::new(InMemoryVerificationRepository::new());
    let user_id = Uuid::new_v4();
    repo.issue(user_id, "token", Utc::now()).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.clear_if_matches(user_id, "token").await.unwrap()
        }));
    }

    let mut wins = 0;
    for handle in handles {
        if handle.await.unwrap() {
            wins += 1;
        }
    }
    assert_eq!(wins, 1);
}

#[tokio::test]
async fn test_is_expired_fails_closed() {
    let repo = InMemoryVerificationRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    repo.insert_raw(VerificationRecord {
        user_id,
        token_plaintext: Some("token".to_string()),
        expires_at: None,
    })
    .await;

    let record = repo.find_by_plaintext("token").await.unwrap().unwrap();
    assert!(repo.is_expired(&record, now));

    let live = VerificationRecord::issued(user_id, "t".into(), now, Duration::minutes(1));
    assert!(!repo.is_expired(&live, now));
    assert!(!repo.is_expired(&live, now + Duration::minutes(1)));
    assert!(repo.is_expired(&live, now + Duration::minutes(1) + Duration::seconds(1)));
}

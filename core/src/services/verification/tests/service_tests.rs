//! Unit tests for verification service

use chrono::Duration;
use mockable::DefaultClock;
use std::sync::Arc;

use crate::domain::entities::user::User;
use crate::domain::entities::verification_record::{VerificationRecord, TOKEN_MAX_LENGTH};
use crate::domain::entities::verification_state::VerificationState;
use crate::errors::{DomainError, TokenError};
use crate::repositories::user::{InMemoryUserRepository, UserRepository};
use crate::repositories::verification::VerificationRepository;
use crate::services::encryption::{AesGcmTokenCipher, EncryptionKey, SymmetricCipher};
use crate::services::verification::{ConfirmOutcome, VerificationService};

use super::mocks::{
    harness, t0, test_config, FailingVerificationRepository, Harness, RecordingScheduler, LINK_BASE,
};

async fn registered(h: &Harness, email: &str) -> User {
    let user = h
        .users
        .create(User::new(email.to_string(), "hash".to_string()))
        .await
        .unwrap();
    h.records.create_for_user(user.id).await.unwrap();
    user
}

fn token_error(result: Result<ConfirmOutcome, DomainError>) -> TokenError {
    match result {
        Err(DomainError::Token(e)) => e,
        other => panic!("expected token error, got {:?}", other),
    }
}

async fn is_verified(h: &Harness, user: &User) -> bool {
    h.users.find_by_id(user.id).await.unwrap().unwrap().is_verified
}

#[tokio::test]
async fn test_issue_persists_token_and_dispatches_link() {
    let h = harness();
    let user = registered(&h, "ada@example.com").await;

    let receipt = h.service.issue(&user).await.unwrap();
    assert_eq!(receipt.user_id, user.id);
    assert_eq!(receipt.expires_at, t0() + Duration::minutes(60));

    let record = h.records.find_by_user_id(user.id).await.unwrap().unwrap();
    let plaintext = record.token_plaintext.clone().unwrap();
    assert_eq!(plaintext.len(), TOKEN_MAX_LENGTH);
    assert!(plaintext.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(record.expires_at, Some(receipt.expires_at));

    assert_eq!(h.scheduler.count(), 1);
    let (recipient, link) = h.scheduler.dispatched.lock().unwrap()[0].clone();
    assert_eq!(recipient, "ada@example.com");
    assert!(link.starts_with(LINK_BASE));
    assert!(!link.contains(&plaintext));

    let cipher = AesGcmTokenCipher::new(&h.key);
    assert_eq!(cipher.decrypt(&h.scheduler.last_token()).unwrap(), plaintext);
}

#[tokio::test]
async fn test_issue_for_unknown_user() {
    let h = harness();
    let result = h.service.issue_for_user(uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
    assert_eq!(h.scheduler.count(), 0);
}

#[tokio::test]
async fn test_confirm_once_verifies_and_consumes() {
    let h = harness();
    let user = registered(&h, "ada@example.com").await;
    h.service.issue(&user).await.unwrap();
    let token = h.scheduler.last_token();

    let outcome = h.service.confirm(Some(&token)).await.unwrap();
    assert_eq!(outcome, ConfirmOutcome::Verified { user_id: user.id });
    assert!(is_verified(&h, &user).await);

    let record = h.records.find_by_user_id(user.id).await.unwrap().unwrap();
    assert!(record.token_plaintext.is_none());
    assert!(record.expires_at.is_none());

    let again = h.service.confirm(Some(&token)).await;
    assert_eq!(token_error(again), TokenError::TokenNotFound);
}

#[tokio::test]
async fn test_absent_or_empty_token_is_invalid() {
    let h = harness();
    let user = registered(&h, "ada@example.com").await;
    h.service.issue(&user).await.unwrap();

    assert_eq!(token_error(h.service.confirm(None).await), TokenError::InvalidToken);
    assert_eq!(token_error(h.service.confirm(Some("")).await), TokenError::InvalidToken);
    assert_eq!(token_error(h.service.confirm(Some("   ")).await), TokenError::InvalidToken);
    assert!(!is_verified(&h, &user).await);
}

#[tokio::test]
async fn test_garbage_and_foreign_tokens_are_invalid() {
    let h = harness();
    let user = registered(&h, "ada@example.com").await;
    h.service.issue(&user).await.unwrap();
    let before = h.records.find_by_user_id(user.id).await.unwrap();

    let garbage = h.service.confirm(Some("definitely-not-a-token")).await;
    assert_eq!(token_error(garbage), TokenError::InvalidToken);

    let plaintext = before.clone().unwrap().token_plaintext.unwrap();
    let foreign = AesGcmTokenCipher::new(&EncryptionKey::generate())
        .encrypt(&plaintext)
        .unwrap();
    let result = h.service.confirm(Some(&foreign)).await;
    assert_eq!(token_error(result), TokenError::InvalidToken);

    assert_eq!(h.records.find_by_user_id(user.id).await.unwrap(), before);
    assert!(!is_verified(&h, &user).await);
}

#[tokio::test]
async fn test_second_issue_invalidates_first_link() {
    let h = harness();
    let user = registered(&h, "ada@example.com").await;

    h.service.issue(&user).await.unwrap();
    let first = h.scheduler.last_token();
    h.service.issue(&user).await.unwrap();
    let second = h.scheduler.last_token();

    // still decrypts, but no longer matches a record
    assert!(AesGcmTokenCipher::new(&h.key).decrypt(&first).is_ok());
    assert_eq!(
        token_error(h.service.confirm(Some(&first)).await),
        TokenError::TokenNotFound
    );

    let outcome = h.service.confirm(Some(&second)).await.unwrap();
    assert_eq!(outcome, ConfirmOutcome::Verified { user_id: user.id });
}

#[tokio::test]
async fn test_expired_token_reissues_exactly_once() {
    let h = harness();
    let user = registered(&h, "ada@example.com").await;
    h.service.issue(&user).await.unwrap();
    let old_token = h.scheduler.last_token();
    let old_plaintext = h
        .records
        .find_by_user_id(user.id)
        .await
        .unwrap()
        .unwrap()
        .token_plaintext;

    h.clock.advance(Duration::minutes(61));
    let outcome = h.service.confirm(Some(&old_token)).await.unwrap();

    assert_eq!(outcome, ConfirmOutcome::Reissued { user_id: user.id });
    assert!(!is_verified(&h, &user).await);
    assert_eq!(h.scheduler.count(), 2);

    let record = h.records.find_by_user_id(user.id).await.unwrap().unwrap();
    assert_ne!(record.token_plaintext, old_plaintext);
    assert_eq!(
        record.expires_at,
        Some(t0() + Duration::minutes(61) + Duration::minutes(60))
    );

    assert_eq!(
        token_error(h.service.confirm(Some(&old_token)).await),
        TokenError::TokenNotFound
    );
    assert_eq!(h.scheduler.count(), 2);
}

#[tokio::test]
async fn test_window_boundaries() {
    let h = harness();
    let user = registered(&h, "ada@example.com").await;
    h.service.issue(&user).await.unwrap();
    let token = h.scheduler.last_token();

    h.clock.advance(Duration::minutes(59));
    let outcome = h.service.confirm(Some(&token)).await.unwrap();
    assert_eq!(outcome, ConfirmOutcome::Verified { user_id: user.id });

    h.clock.advance(Duration::seconds(1));
    assert_eq!(
        token_error(h.service.confirm(Some(&token)).await),
        TokenError::TokenNotFound
    );
}

#[tokio::test]
async fn test_token_valid_at_exact_expiry() {
    let h = harness();
    let user = registered(&h, "ada@example.com").await;
    h.service.issue(&user).await.unwrap();
    let token = h.scheduler.last_token();

    h.clock.advance(Duration::minutes(60));
    let outcome = h.service.confirm(Some(&token)).await.unwrap();
    assert_eq!(outcome, ConfirmOutcome::Verified { user_id: user.id });
}

#[tokio::test]
async fn test_missing_expiry_fails_closed() {
    let h = harness();
    let user = registered(&h, "ada@example.com").await;
    h.records
        .insert_raw(VerificationRecord {
            user_id: user.id,
            token_plaintext: Some("a".repeat(TOKEN_MAX_LENGTH)),
            expires_at: None,
        })
        .await;
    let token = AesGcmTokenCipher::new(&h.key)
        .encrypt(&"a".repeat(TOKEN_MAX_LENGTH))
        .unwrap();

    let outcome = h.service.confirm(Some(&token)).await.unwrap();
    assert_eq!(outcome, ConfirmOutcome::Reissued { user_id: user.id });
    assert!(!is_verified(&h, &user).await);
    assert_eq!(h.scheduler.count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_confirms_have_one_winner() {
    let h = harness();
    let user = registered(&h, "ada@example.com").await;
    h.service.issue(&user).await.unwrap();
    let token = h.scheduler.last_token();

    let mut handles = Vec::new();
    for _ in 0..32 {
        let service = h.service.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move { service.confirm(Some(&token)).await }));
    }

    let mut verified = 0;
    let mut not_found = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(ConfirmOutcome::Verified { .. }) => verified += 1,
            Err(DomainError::Token(TokenError::TokenNotFound)) => not_found += 1,
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    assert_eq!(verified, 1);
    assert_eq!(not_found, 31);
    assert!(is_verified(&h, &user).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_expired_confirms_reissue_once() {
    let h = harness();
    let user = registered(&h, "ada@example.com").await;
    h.service.issue(&user).await.unwrap();
    let token = h.scheduler.last_token();
    h.clock.advance(Duration::hours(2));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = h.service.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move { service.confirm(Some(&token)).await }));
    }

    let mut reissued = 0;
    for handle in handles {
        if let Ok(ConfirmOutcome::Reissued { .. }) = handle.await.unwrap() {
            reissued += 1;
        }
    }

    assert_eq!(reissued, 1);
    assert_eq!(h.scheduler.count(), 2);
}

#[tokio::test]
async fn test_state_follows_lifecycle() {
    let h = harness();
    let user = registered(&h, "ada@example.com").await;

    assert_eq!(h.service.state(user.id).await.unwrap(), VerificationState::NoToken);

    h.service.issue(&user).await.unwrap();
    assert_eq!(
        h.service.state(user.id).await.unwrap(),
        VerificationState::TokenPending {
            expires_at: t0() + Duration::minutes(60)
        }
    );

    h.clock.advance(Duration::minutes(61));
    assert_eq!(
        h.service.state(user.id).await.unwrap(),
        VerificationState::TokenExpired
    );

    let token = h.scheduler.last_token();
    h.service.confirm(Some(&token)).await.unwrap();
    let token = h.scheduler.last_token();
    h.service.confirm(Some(&token)).await.unwrap();
    assert_eq!(h.service.state(user.id).await.unwrap(), VerificationState::Verified);
}

#[tokio::test]
async fn test_storage_failure_propagates() {
    let users = Arc::new(InMemoryUserRepository::new());
    let scheduler = Arc::new(RecordingScheduler::default());
    let key = EncryptionKey::generate();
    let cipher = Arc::new(AesGcmTokenCipher::new(&key));
    let service = VerificationService::new(
        users.clone(),
        Arc::new(FailingVerificationRepository),
        cipher.clone(),
        scheduler.clone(),
        Arc::new(DefaultClock),
        test_config(),
    );

    let user = users
        .create(User::new("ada@example.com".to_string(), "hash".to_string()))
        .await
        .unwrap();

    let issued = service.issue(&user).await;
    assert!(matches!(issued, Err(DomainError::Storage { .. })));
    assert_eq!(scheduler.count(), 0);

    let token = cipher.encrypt("whatever").unwrap();
    let confirmed = service.confirm(Some(&token)).await;
    assert!(matches!(confirmed, Err(DomainError::Storage { .. })));
}

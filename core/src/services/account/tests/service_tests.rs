use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::{DomainError, TokenError, ValidationError};
use crate::repositories::user::{InMemoryUserRepository, UserRepository};
use crate::repositories::verification::{InMemoryVerificationRepository, VerificationRepository};
use crate::services::account::AccountService;
use crate::services::encryption::{AesGcmTokenCipher, EncryptionKey};
use crate::services::verification::{
    DeliveryScheduler, VerificationService, VerificationServiceConfig,
};

#[derive(Default)]
struct CountingScheduler {
    sent: Mutex<Vec<(String, String)>>,
}

impl DeliveryScheduler for CountingScheduler {
    fn dispatch(&self, recipient: &str, link: String) {
        self.sent.lock().unwrap().push((recipient.to_string(), link));
    }
}

// In-memory store whose `issue` can be switched to fail
#[derive(Default)]
struct SwitchableRecords {
    inner: InMemoryVerificationRepository,
    fail_issue: AtomicBool,
}

#[async_trait]
impl VerificationRepository for SwitchableRecords {
    async fn create_for_user(&self, user_id: Uuid) -> Result<VerificationRecord, DomainError> {
        self.inner.create_for_user(user_id).await
    }

    async fn issue(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<VerificationRecord, DomainError> {
        if self.fail_issue.load(Ordering::SeqCst) {
            return Err(DomainError::storage("connection reset"));
        }
        self.inner.issue(user_id, token, expires_at).await
    }

    async fn find_by_plaintext(&self, token: &str) -> Result<Option<VerificationRecord>, DomainError> {
        self.inner.find_by_plaintext(token).await
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<VerificationRecord>, DomainError> {
        self.inner.find_by_user_id(user_id).await
    }

    async fn clear(&self, user_id: Uuid) -> Result<bool, DomainError> {
        self.inner.clear(user_id).await
    }

    async fn clear_if_matches(&self, user_id: Uuid, token: &str) -> Result<bool, DomainError> {
        self.inner.clear_if_matches(user_id, token).await
    }
}

type TestVerification =
    VerificationService<InMemoryUserRepository, SwitchableRecords, AesGcmTokenCipher, CountingScheduler>;

struct Fixture {
    accounts: AccountService<
        InMemoryUserRepository,
        SwitchableRecords,
        AesGcmTokenCipher,
        CountingScheduler,
    >,
    verification: Arc<TestVerification>,
    users: Arc<InMemoryUserRepository>,
    records: Arc<SwitchableRecords>,
    scheduler: Arc<CountingScheduler>,
}

fn fixture() -> Fixture {
    let users = Arc::new(InMemoryUserRepository::new());
    let records = Arc::new(SwitchableRecords::default());
    let scheduler = Arc::new(CountingScheduler::default());
    let verification = Arc::new(VerificationService::new(
        users.clone(),
        records.clone(),
        Arc::new(AesGcmTokenCipher::new(&EncryptionKey::generate())),
        scheduler.clone(),
        Arc::new(DefaultClock),
        VerificationServiceConfig::default(),
    ));

    Fixture {
        accounts: AccountService::new(users.clone(), records.clone(), verification.clone()),
        verification,
        users,
        records,
        scheduler,
    }
}

impl Fixture {
    fn recipients(&self) -> Vec<String> {
        self.scheduler
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|(recipient, _)| recipient.clone())
            .collect()
    }

    /// Transport token carried by the most recent link
    fn last_token(&self) -> String {
        let sent = self.scheduler.sent.lock().unwrap();
        let (_, link) = sent.last().unwrap();
        link.split_once("token=").unwrap().1.to_string()
    }
}

#[tokio::test]
async fn test_register_creates_unverified_account_and_sends_link() {
    let f = fixture();

    let registered = f
        .accounts
        .register("  Ada@Example.COM ", "hash".to_string())
        .await
        .unwrap();

    assert_eq!(registered.user.email, "Ada@example.com");
    assert!(!registered.user.is_verified);
    assert_eq!(registered.receipt.user_id, registered.user.id);

    let record = f.records.find_by_user_id(registered.user.id).await.unwrap().unwrap();
    assert!(record.has_token());
    assert_eq!(f.recipients(), vec!["Ada@example.com".to_string()]);
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_bad_addresses() {
    let f = fixture();
    f.accounts.register("ada@example.com", "hash".into()).await.unwrap();

    let duplicate = f.accounts.register("ada@EXAMPLE.com", "hash".into()).await;
    assert!(matches!(duplicate, Err(DomainError::Conflict { .. })));

    let invalid = f.accounts.register("not-an-email", "hash".into()).await;
    assert!(matches!(
        invalid,
        Err(DomainError::ValidationErr(ValidationError::InvalidEmail))
    ));

    assert_eq!(f.users.len().await, 1);
    assert_eq!(f.recipients().len(), 1);
}

#[tokio::test]
async fn test_change_email_resets_verification_and_reissues() {
    let f = fixture();
    let user = f.accounts.register("ada@example.com", "hash".into()).await.unwrap().user;
    f.users.mark_verified(user.id, &user.email).await.unwrap();

    let updated = f
        .accounts
        .change_email(user.id, "ada@lovelace.dev")
        .await
        .unwrap();

    assert_eq!(updated.user.email, "ada@lovelace.dev");
    assert!(!updated.user.is_verified);
    assert_eq!(
        f.recipients(),
        vec!["ada@example.com".to_string(), "ada@lovelace.dev".to_string()]
    );
}

#[tokio::test]
async fn test_change_email_to_same_address_is_rejected() {
    let f = fixture();
    let user = f.accounts.register("ada@example.com", "hash".into()).await.unwrap().user;

    let result = f.accounts.change_email(user.id, "ada@EXAMPLE.com").await;
    assert!(matches!(result, Err(DomainError::BusinessRule { .. })));
    assert_eq!(f.recipients().len(), 1);
}

#[tokio::test]
async fn test_resend_only_for_unverified_accounts() {
    let f = fixture();
    let user = f.accounts.register("ada@example.com", "hash".into()).await.unwrap().user;

    f.accounts.resend_verification(user.id).await.unwrap();
    assert_eq!(f.recipients().len(), 2);

    f.users.mark_verified(user.id, &user.email).await.unwrap();
    let result = f.accounts.resend_verification(user.id).await;
    assert!(matches!(result, Err(DomainError::Conflict { .. })));
    assert_eq!(f.recipients().len(), 2);

    let missing = f.accounts.resend_verification(uuid::Uuid::new_v4()).await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_link_for_previous_address_stops_working_after_change() {
    let f = fixture();
    let user = f.accounts.register("old@example.com", "hash".into()).await.unwrap().user;
    let old_link = f.last_token();

    f.accounts.change_email(user.id, "new@example.com").await.unwrap();

    let result = f.verification.confirm(Some(&old_link)).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::TokenNotFound))));
    assert!(!f.users.find_by_id(user.id).await.unwrap().unwrap().is_verified);

    // The link sent to the new address still verifies it
    let new_link = f.last_token();
    f.verification.confirm(Some(&new_link)).await.unwrap();
    assert!(f.users.find_by_id(user.id).await.unwrap().unwrap().is_verified);
}

#[tokio::test]
async fn test_failed_reissue_on_change_still_revokes_previous_link() {
    let f = fixture();
    let user = f.accounts.register("old@example.com", "hash".into()).await.unwrap().user;
    let old_link = f.last_token();

    f.records.fail_issue.store(true, Ordering::SeqCst);
    let changed = f.accounts.change_email(user.id, "new@example.com").await;
    assert!(matches!(changed, Err(DomainError::Storage { .. })));

    let result = f.verification.confirm(Some(&old_link)).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::TokenNotFound))));

    let stored = f.users.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.email, "new@example.com");
    assert!(!stored.is_verified);
}

#[tokio::test]
async fn test_change_email_to_taken_address_keeps_current_link() {
    let f = fixture();
    f.accounts.register("grace@example.com", "hash".into()).await.unwrap();
    let user = f.accounts.register("ada@example.com", "hash".into()).await.unwrap().user;
    let link = f.last_token();

    let result = f.accounts.change_email(user.id, "grace@example.com").await;
    assert!(matches!(result, Err(DomainError::Conflict { .. })));

    f.verification.confirm(Some(&link)).await.unwrap();
    assert!(f.users.find_by_id(user.id).await.unwrap().unwrap().is_verified);
}

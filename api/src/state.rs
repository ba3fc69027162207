//! Application state and dependency wiring

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use es_core::errors::DomainError;
use es_core::repositories::{
    InMemoryUserRepository, InMemoryVerificationRepository, UserRepository, VerificationRepository,
};
use es_core::services::{
    AccountService, AesGcmTokenCipher, DeliveryScheduler, EncryptionKey, RetryPolicy,
    SymmetricCipher, TokioDeliveryScheduler, VerificationService, VerificationServiceConfig,
};
use es_infra::database::{DatabasePool, MySqlUserRepository, MySqlVerificationRepository};
use es_infra::email::{create_email_service, EmailVerificationNotifier};
use es_infra::InfrastructureError;
use es_shared::{AppConfig, AuthConfig, ConfigError};

pub type DynVerificationService = VerificationService<
    dyn UserRepository,
    dyn VerificationRepository,
    dyn SymmetricCipher,
    dyn DeliveryScheduler,
>;

pub type DynAccountService = AccountService<
    dyn UserRepository,
    dyn VerificationRepository,
    dyn SymmetricCipher,
    dyn DeliveryScheduler,
>;

/// Errors raised while wiring the application at startup
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid encryption key: {0}")]
    Key(DomainError),

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

/// Shared services handed to every request handler
pub struct AppState {
    pub accounts: Arc<DynAccountService>,
    pub verification: Arc<DynVerificationService>,
    pub auth: AuthConfig,
    /// Page confirmation redirects point at
    pub landing_path: String,
    /// bcrypt work factor for password hashing
    pub bcrypt_cost: u32,
}

impl AppState {
    /// Assemble the services around the given collaborators
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        records: Arc<dyn VerificationRepository>,
        cipher: Arc<dyn SymmetricCipher>,
        scheduler: Arc<dyn DeliveryScheduler>,
        clock: Arc<dyn Clock>,
        verification_config: VerificationServiceConfig,
        auth: AuthConfig,
        landing_path: String,
    ) -> Self {
        let verification = Arc::new(VerificationService::new(
            users.clone(),
            records.clone(),
            cipher,
            scheduler,
            clock,
            verification_config,
        ));
        let accounts = Arc::new(AccountService::new(users, records, verification.clone()));

        Self {
            accounts,
            verification,
            auth,
            landing_path,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }
}

/// Resolve the process-wide encryption key.
///
/// Outside production a missing key is replaced by an ephemeral one, which
/// invalidates outstanding links on every restart.
pub fn load_encryption_key(config: &AppConfig) -> Result<EncryptionKey, BootstrapError> {
    match config.verification.encryption_key.as_deref() {
        Some(encoded) => EncryptionKey::from_base64(encoded).map_err(BootstrapError::Key),
        None if config.environment.is_production() => Err(BootstrapError::Config(
            ConfigError::Missing("VERIFICATION_ENCRYPTION_KEY"),
        )),
        None => {
            tracing::warn!("VERIFICATION_ENCRYPTION_KEY not set; using an ephemeral key");
            Ok(EncryptionKey::generate())
        }
    }
}

/// Build the application state from configuration.
///
/// Uses MySQL when `DATABASE_URL` is set and in-memory stores otherwise.
/// Must run inside the tokio runtime that will serve requests.
pub async fn build_state(config: &AppConfig) -> Result<AppState, BootstrapError> {
    config.validate()?;

    let key = load_encryption_key(config)?;
    let cipher: Arc<dyn SymmetricCipher> = Arc::new(AesGcmTokenCipher::new(&key));

    let (users, records): (Arc<dyn UserRepository>, Arc<dyn VerificationRepository>) =
        if config.database.url.is_some() {
            let pool = DatabasePool::new(&config.database).await?;
            pool.run_migrations().await?;
            (
                Arc::new(MySqlUserRepository::new(pool.get_pool().clone())),
                Arc::new(MySqlVerificationRepository::new(pool.get_pool().clone())),
            )
        } else {
            tracing::warn!("DATABASE_URL not set; accounts are kept in memory");
            (
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryVerificationRepository::new()),
            )
        };

    let email = create_email_service(&config.delivery)?;
    let notifier = Arc::new(EmailVerificationNotifier::new(email));
    let scheduler: Arc<dyn DeliveryScheduler> = Arc::new(TokioDeliveryScheduler::new(
        notifier,
        RetryPolicy::from_config(&config.delivery),
    ));

    Ok(AppState::new(
        users,
        records,
        cipher,
        scheduler,
        Arc::new(DefaultClock),
        VerificationServiceConfig::from(config),
        config.auth.clone(),
        config.server.landing_path.clone(),
    ))
}

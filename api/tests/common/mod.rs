//! Shared fixtures for the HTTP tests

#![allow(dead_code)]

use actix_web::web;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, Mutex};

use es_api::AppState;
use es_core::repositories::{InMemoryUserRepository, InMemoryVerificationRepository};
use es_core::services::{
    AesGcmTokenCipher, DeliveryScheduler, EncryptionKey, VerificationServiceConfig,
};
use es_shared::AuthConfig;

pub const LINK_BASE: &str = "http://events.test/api/v1/users/confirm?token=";
pub const JWT_SECRET: &str = "http-test-secret";
pub const LANDING: &str = "/welcome";

pub struct TestClock(Mutex<DateTime<Utc>>);

impl TestClock {
    pub fn advance(&self, delta: Duration) {
        *self.0.lock().unwrap() += delta;
    }
}

impl Clock for TestClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[derive(Default)]
pub struct RecordingScheduler {
    dispatched: Mutex<Vec<(String, String)>>,
}

impl RecordingScheduler {
    pub fn count(&self) -> usize {
        self.dispatched.lock().unwrap().len()
    }

    pub fn last_recipient(&self) -> String {
        self.dispatched.lock().unwrap().last().unwrap().0.clone()
    }

    /// Path and query of the most recent link, ready for a test request
    pub fn last_confirm_uri(&self) -> String {
        let link = self.dispatched.lock().unwrap().last().unwrap().1.clone();
        let token = link.strip_prefix(LINK_BASE).unwrap();
        format!("/api/v1/users/confirm?token={}", token)
    }
}

impl DeliveryScheduler for RecordingScheduler {
    fn dispatch(&self, recipient: &str, link: String) {
        self.dispatched
            .lock()
            .unwrap()
            .push((recipient.to_string(), link));
    }
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub scheduler: Arc<RecordingScheduler>,
    pub clock: Arc<TestClock>,
}

pub fn context() -> TestContext {
    let scheduler = Arc::new(RecordingScheduler::default());
    let clock = Arc::new(TestClock(Mutex::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    )));

    let state = AppState::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryVerificationRepository::new()),
        Arc::new(AesGcmTokenCipher::new(&EncryptionKey::generate())),
        scheduler.clone(),
        clock.clone(),
        VerificationServiceConfig {
            token_validity: Duration::minutes(60),
            confirmation_link_base: LINK_BASE.to_string(),
        },
        AuthConfig::new(JWT_SECRET),
        LANDING.to_string(),
    )
    // Lowest cost bcrypt accepts
    .with_bcrypt_cost(4);

    TestContext {
        state: web::Data::new(state),
        scheduler,
        clock,
    }
}

//! Brevo transactional email API client
//!
//! Sends through `POST /v3/smtp/email` authenticated with the `api-key`
//! header.

use async_trait::async_trait;
use es_shared::{mask_email, DeliveryConfig};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::email_service::{EmailMessage, EmailService};
use crate::InfrastructureError;

/// Production API origin
pub const BREVO_API_BASE: &str = "https://api.brevo.com";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoEmailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendEmailBody<'a> {
    sender: BrevoEmailAddress<'a>,
    to: Vec<BrevoEmailAddress<'a>>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendEmailResponse {
    message_id: Option<String>,
}

/// Brevo email service
pub struct BrevoEmailService {
    client: Client,
    api_key: String,
    api_base: String,
    sender_address: String,
    sender_name: Option<String>,
}

impl BrevoEmailService {
    /// Create a client for the production API
    pub fn new(
        api_key: impl Into<String>,
        sender_address: impl Into<String>,
        sender_name: Option<String>,
        timeout: Duration,
    ) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("events-scheduler/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_base: BREVO_API_BASE.to_string(),
            sender_address: sender_address.into(),
            sender_name,
        })
    }

    /// Create from delivery configuration; requires `BREVO_API_KEY`
    pub fn from_config(config: &DeliveryConfig) -> Result<Self, InfrastructureError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| InfrastructureError::Config("BREVO_API_KEY is required".to_string()))?;

        Self::new(
            api_key,
            config.sender_address.clone(),
            config.sender_name.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Point the client at another origin
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl EmailService for BrevoEmailService {
    async fn send_email(&self, message: &EmailMessage) -> Result<String, InfrastructureError> {
        let body = BrevoSendEmailBody {
            sender: BrevoEmailAddress {
                email: &self.sender_address,
                name: self.sender_name.as_deref(),
            },
            to: vec![BrevoEmailAddress {
                email: &message.to,
                name: None,
            }],
            subject: &message.subject,
            html_content: &message.html_body,
            text_content: &message.text_body,
        };

        let response = self
            .client
            .post(format!("{}/v3/smtp/email", self.api_base))
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(
                provider = "brevo",
                recipient = %mask_email(&message.to),
                status = status.as_u16(),
                "Brevo rejected email"
            );
            return Err(InfrastructureError::Email(format!(
                "Brevo send failed (status={}): {}",
                status.as_u16(),
                detail
            )));
        }

        let parsed: BrevoSendEmailResponse = response.json().await?;
        let message_id = parsed
            .message_id
            .ok_or_else(|| InfrastructureError::Email("Brevo response missing messageId".to_string()))?;

        tracing::debug!(
            provider = "brevo",
            recipient = %mask_email(&message.to),
            message_id = %message_id,
            "Email sent"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Brevo"
    }
}

//! Types for verification service results

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Result of issuing a token. The transport token itself is never returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueReceipt {
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful confirmation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The token was consumed and the account is now verified
    Verified { user_id: Uuid },
    /// The token had expired; a fresh one was issued and sent
    Reissued { user_id: Uuid },
}

impl ConfirmOutcome {
    pub fn user_id(&self) -> Uuid {
        match self {
            ConfirmOutcome::Verified { user_id } | ConfirmOutcome::Reissued { user_id } => *user_id,
        }
    }
}

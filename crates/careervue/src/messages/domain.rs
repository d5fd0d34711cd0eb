use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sentiment::{MessageText, Sentiment};

/// Identifier wrapper for stored contact messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Workflow state of a contact message in the admin inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Unread,
    Read,
    Replied,
    Archived,
}

impl MessageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MessageStatus::Unread => "unread",
            MessageStatus::Read => "read",
            MessageStatus::Replied => "replied",
            MessageStatus::Archived => "archived",
        }
    }

    pub fn ordered() -> [MessageStatus; 4] {
        [
            MessageStatus::Unread,
            MessageStatus::Read,
            MessageStatus::Replied,
            MessageStatus::Archived,
        ]
    }
}

/// Triage priority assigned by admins; new messages start at `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessagePriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl MessagePriority {
    pub fn label(&self) -> &'static str {
        match self {
            MessagePriority::Low => "low",
            MessagePriority::Medium => "medium",
            MessagePriority::High => "high",
            MessagePriority::Urgent => "urgent",
        }
    }

    pub fn ordered() -> [MessagePriority; 4] {
        [
            MessagePriority::Low,
            MessagePriority::Medium,
            MessagePriority::High,
            MessagePriority::Urgent,
        ]
    }
}

/// Payload accepted from the public contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Reply recorded by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminResponse {
    pub message: String,
    pub responded_by: Option<String>,
    pub responded_at: DateTime<Utc>,
}

/// Stored contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: MessageId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub status: MessageStatus,
    pub priority: MessagePriority,
    pub is_active: bool,
    pub admin_response: Option<AdminResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn new(id: MessageId, submission: ContactSubmission, received_at: DateTime<Utc>) -> Self {
        let ContactSubmission {
            name,
            email,
            phone,
            subject,
            message,
        } = submission;

        Self {
            id,
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            phone: phone
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            subject: subject.trim().to_string(),
            message: message.trim().to_string(),
            status: MessageStatus::Unread,
            priority: MessagePriority::Medium,
            is_active: true,
            admin_response: None,
            created_at: received_at,
            updated_at: received_at,
        }
    }

    pub(crate) fn matches_search(&self, needle: &str) -> bool {
        [&self.name, &self.email, &self.subject, &self.message]
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl MessageText for ContactMessage {
    fn subject(&self) -> Option<&str> {
        Some(&self.subject)
    }

    fn body(&self) -> Option<&str> {
        Some(&self.message)
    }
}

/// Admin inbox row: the message plus its sentiment label and score.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    #[serde(flatten)]
    pub message: ContactMessage,
    pub sentiment: Sentiment,
    pub sentiment_score: f64,
}

use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{
    AdminResponse, ContactMessage, ContactSubmission, MessageId, MessagePriority, MessageStatus,
    MessageView,
};
use super::repository::{MessageRepository, RepositoryError};
use crate::sentiment::{Sentiment, SentimentScorer, SentimentStats};

const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;
const STATISTICS_WINDOW_DAYS: i64 = 30;

static MESSAGE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_message_id() -> MessageId {
    let id = MESSAGE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    MessageId(format!("msg-{id:06}"))
}

/// Field used to order the admin inbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    Name,
    Subject,
    Status,
    Priority,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filters and paging for the admin inbox listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageQuery {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<MessageStatus>,
    #[serde(default)]
    pub priority: Option<MessagePriority>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl MessageQuery {
    fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    fn accepts(&self, message: &ContactMessage, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            if !message.matches_search(needle) {
                return false;
            }
        }
        self.status.map_or(true, |status| message.status == status)
            && self
                .priority
                .map_or(true, |priority| message.priority == priority)
            && self
                .is_active
                .map_or(true, |active| message.is_active == active)
    }

    fn compare(&self, left: &ContactMessage, right: &ContactMessage) -> CmpOrdering {
        let ordering = match self.sort_by {
            SortField::CreatedAt => left.created_at.cmp(&right.created_at),
            SortField::Name => left.name.to_lowercase().cmp(&right.name.to_lowercase()),
            SortField::Subject => left
                .subject
                .to_lowercase()
                .cmp(&right.subject.to_lowercase()),
            SortField::Status => left.status.cmp(&right.status),
            SortField::Priority => left.priority.cmp(&right.priority),
        }
        .then_with(|| left.created_at.cmp(&right.created_at))
        .then_with(|| left.id.cmp(&right.id));

        match self.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// One page of the admin inbox.
#[derive(Debug, Clone, Serialize)]
pub struct MessagePage {
    pub messages: Vec<MessageView>,
    pub total_pages: usize,
    pub current_page: usize,
    pub total: usize,
}

/// Admin change to a message's triage fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: Option<MessageStatus>,
    #[serde(default)]
    pub priority: Option<MessagePriority>,
}

/// Admin reply to a message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyRequest {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub responded_by: Option<String>,
}

/// Headline inbox counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageOverview {
    pub total_messages: usize,
    pub unread_messages: usize,
    pub replied_messages: usize,
    pub today_messages: usize,
    pub read_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: MessageStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCount {
    pub priority: MessagePriority,
    pub count: usize,
}

/// Messages received on one UTC day, split by sentiment bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMessages {
    pub date: NaiveDate,
    pub count: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

/// Dashboard payload combining inbox breakdowns with sentiment aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageStatistics {
    pub total_messages: usize,
    pub messages_by_status: Vec<StatusCount>,
    pub daily_messages: Vec<DailyMessages>,
    pub messages_by_priority: Vec<PriorityCount>,
    pub sentiment_stats: SentimentStats,
}

/// Service composing the message repository and the sentiment scorer.
pub struct MessageService<R> {
    repository: Arc<R>,
    scorer: Arc<SentimentScorer>,
}

impl<R> MessageService<R>
where
    R: MessageRepository + 'static,
{
    pub fn new(repository: Arc<R>, scorer: Arc<SentimentScorer>) -> Self {
        Self { repository, scorer }
    }

    pub fn scorer(&self) -> &SentimentScorer {
        &self.scorer
    }

    /// Accept a public contact-form submission.
    pub fn submit(
        &self,
        submission: ContactSubmission,
    ) -> Result<ContactMessage, MessageServiceError> {
        self.submit_at(submission, Utc::now())
    }

    pub fn submit_at(
        &self,
        submission: ContactSubmission,
        received_at: DateTime<Utc>,
    ) -> Result<ContactMessage, MessageServiceError> {
        validate_submission(&submission)?;

        let message = ContactMessage::new(next_message_id(), submission, received_at);
        let stored = self.repository.insert(message)?;

        let sentiment = self.scorer.classify_message(&stored);
        info!(
            message_id = %stored.id.0,
            sentiment = sentiment.sentiment.label(),
            score = sentiment.score,
            "contact message received"
        );
        Ok(stored)
    }

    pub fn list(&self, query: &MessageQuery) -> Result<MessagePage, MessageServiceError> {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .map(str::to_lowercase);

        let mut matching: Vec<ContactMessage> = self
            .repository
            .all()?
            .into_iter()
            .filter(|message| query.accepts(message, needle.as_deref()))
            .collect();
        matching.sort_by(|left, right| query.compare(left, right));

        let total = matching.len();
        let page = query.page();
        let limit = query.limit();
        let total_pages = total.div_ceil(limit);

        let page_items: Vec<ContactMessage> = matching
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();
        let results: Vec<_> = self.scorer.classify_batch(&page_items).collect();
        let messages = page_items
            .into_iter()
            .zip(results)
            .map(|(message, result)| MessageView {
                message,
                sentiment: result.sentiment,
                sentiment_score: result.score,
            })
            .collect();

        debug!(total, page, limit, "listed contact messages");

        Ok(MessagePage {
            messages,
            total_pages,
            current_page: page,
            total,
        })
    }

    /// Fetch a message for the detail view; unread messages become read.
    pub fn get(&self, id: &MessageId) -> Result<ContactMessage, MessageServiceError> {
        let viewed_at = Utc::now();
        self.modify_existing(id, |message| {
            if message.status == MessageStatus::Unread {
                message.status = MessageStatus::Read;
                message.updated_at = viewed_at;
            }
        })
    }

    pub fn update_status(
        &self,
        id: &MessageId,
        update: StatusUpdate,
    ) -> Result<ContactMessage, MessageServiceError> {
        let updated_at = Utc::now();
        let message = self.modify_existing(id, |message| {
            if let Some(status) = update.status {
                message.status = status;
            }
            if let Some(priority) = update.priority {
                message.priority = priority;
            }
            message.updated_at = updated_at;
        })?;

        info!(
            message_id = %id.0,
            status = message.status.label(),
            priority = message.priority.label(),
            "message triage updated"
        );
        Ok(message)
    }

    pub fn respond(
        &self,
        id: &MessageId,
        reply: ReplyRequest,
    ) -> Result<ContactMessage, MessageServiceError> {
        self.respond_at(id, reply, Utc::now())
    }

    pub fn respond_at(
        &self,
        id: &MessageId,
        reply: ReplyRequest,
        responded_at: DateTime<Utc>,
    ) -> Result<ContactMessage, MessageServiceError> {
        let response = reply.response.trim();
        if response.is_empty() {
            return Err(MessageValidationError::EmptyResponse.into());
        }

        let admin_response = AdminResponse {
            message: response.to_string(),
            responded_by: reply.responded_by,
            responded_at,
        };
        let message = self.modify_existing(id, |message| {
            message.status = MessageStatus::Replied;
            message.admin_response = Some(admin_response);
            message.updated_at = responded_at;
        })?;

        info!(message_id = %id.0, "admin response recorded");
        Ok(message)
    }

    pub fn delete(&self, id: &MessageId) -> Result<ContactMessage, MessageServiceError> {
        let removed = self
            .repository
            .delete(id)?
            .ok_or(RepositoryError::NotFound)?;
        info!(message_id = %id.0, "contact message deleted");
        Ok(removed)
    }

    pub fn overview(&self, now: DateTime<Utc>) -> Result<MessageOverview, MessageServiceError> {
        let messages = self.repository.all()?;
        let today = now.date_naive();

        let total_messages = messages.len();
        let count_status = |status: MessageStatus| {
            messages
                .iter()
                .filter(|message| message.status == status)
                .count()
        };
        let unread_messages = count_status(MessageStatus::Unread);
        let replied_messages = count_status(MessageStatus::Replied);
        let today_messages = messages
            .iter()
            .filter(|message| message.created_at.date_naive() == today)
            .count();

        let read_rate = if total_messages > 0 {
            (replied_messages as f64 / total_messages as f64 * 100.0).round() as u32
        } else {
            0
        };

        Ok(MessageOverview {
            total_messages,
            unread_messages,
            replied_messages,
            today_messages,
            read_rate,
        })
    }

    /// Dashboard statistics; the daily series covers the thirty days before `now`.
    pub fn statistics(
        &self,
        now: DateTime<Utc>,
    ) -> Result<MessageStatistics, MessageServiceError> {
        let messages = self.repository.all()?;
        let window_start = now - Duration::days(STATISTICS_WINDOW_DAYS);

        let messages_by_status = MessageStatus::ordered()
            .into_iter()
            .filter_map(|status| {
                let count = messages
                    .iter()
                    .filter(|message| message.status == status)
                    .count();
                (count > 0).then_some(StatusCount { status, count })
            })
            .collect();

        let messages_by_priority = MessagePriority::ordered()
            .into_iter()
            .filter_map(|priority| {
                let count = messages
                    .iter()
                    .filter(|message| message.priority == priority)
                    .count();
                (count > 0).then_some(PriorityCount { priority, count })
            })
            .collect();

        let mut daily: BTreeMap<NaiveDate, DailyMessages> = BTreeMap::new();
        for message in messages
            .iter()
            .filter(|message| message.created_at >= window_start)
        {
            let date = message.created_at.date_naive();
            let entry = daily.entry(date).or_insert_with(|| DailyMessages {
                date,
                count: 0,
                positive: 0,
                negative: 0,
                neutral: 0,
            });
            entry.count += 1;
            match self.scorer.classify_message(message).sentiment {
                Sentiment::Positive => entry.positive += 1,
                Sentiment::Negative => entry.negative += 1,
                Sentiment::Neutral => entry.neutral += 1,
            }
        }

        let sentiment_stats = self.scorer.aggregate_stats(&messages);

        Ok(MessageStatistics {
            total_messages: messages.len(),
            messages_by_status,
            daily_messages: daily.into_values().collect(),
            messages_by_priority,
            sentiment_stats,
        })
    }

    fn modify_existing<F>(
        &self,
        id: &MessageId,
        change: F,
    ) -> Result<ContactMessage, MessageServiceError>
    where
        F: FnOnce(&mut ContactMessage),
    {
        let message = self
            .repository
            .modify(id, change)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(message)
    }
}

fn validate_submission(submission: &ContactSubmission) -> Result<(), MessageValidationError> {
    let required = [
        ("name", &submission.name),
        ("email", &submission.email),
        ("subject", &submission.subject),
        ("message", &submission.message),
    ];
    let missing: Vec<&'static str> = required
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MessageValidationError::MissingFields(missing))
    }
}

/// Rejected input from the contact form or admin tools.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageValidationError {
    #[error("please provide all required fields: name, email, subject, and message (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("response message is required")]
    EmptyResponse,
}

/// Error raised by the message service.
#[derive(Debug, thiserror::Error)]
pub enum MessageServiceError {
    #[error(transparent)]
    Validation(#[from] MessageValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

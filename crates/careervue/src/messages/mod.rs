//! Contact-message intake, admin inbox management, and dashboard statistics.
//!
//! Every message is scored with the shared [`SentimentScorer`](crate::sentiment::SentimentScorer)
//! when it is listed or aggregated; scores are never stored alongside the message.

pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AdminResponse, ContactMessage, ContactSubmission, MessageId, MessagePriority, MessageStatus,
    MessageView,
};
pub use import::{ImportError, ImportFormat};
pub use repository::{MessageRepository, RepositoryError};
pub use router::message_router;
pub use service::{
    DailyMessages, MessageOverview, MessagePage, MessageQuery, MessageService,
    MessageServiceError, MessageStatistics, MessageValidationError, PriorityCount, ReplyRequest,
    SortField, SortOrder, StatusCount, StatusUpdate,
};

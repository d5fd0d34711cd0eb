use super::domain::{ContactMessage, MessageId};

/// Storage abstraction so the message service can run against any backing store.
pub trait MessageRepository: Send + Sync {
    fn insert(&self, message: ContactMessage) -> Result<ContactMessage, RepositoryError>;
    /// Apply `change` to the stored record in one step; `None` when the id is unknown.
    fn modify<F>(&self, id: &MessageId, change: F) -> Result<Option<ContactMessage>, RepositoryError>
    where
        F: FnOnce(&mut ContactMessage);
    fn delete(&self, id: &MessageId) -> Result<Option<ContactMessage>, RepositoryError>;
    fn all(&self) -> Result<Vec<ContactMessage>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

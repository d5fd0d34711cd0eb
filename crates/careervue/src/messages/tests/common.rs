use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::messages::domain::{ContactMessage, ContactSubmission, MessageId};
use crate::messages::repository::{MessageRepository, RepositoryError};
use crate::messages::service::MessageService;
use crate::sentiment::SentimentScorer;

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<MessageId, ContactMessage>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, id: &MessageId) -> Option<ContactMessage> {
        self.records.lock().expect("repository mutex").get(id).cloned()
    }
}

impl MessageRepository for MemoryRepository {
    fn insert(&self, message: ContactMessage) -> Result<ContactMessage, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex");
        if guard.contains_key(&message.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(message.id.clone(), message.clone());
        Ok(message)
    }

    fn modify<F>(&self, id: &MessageId, change: F) -> Result<Option<ContactMessage>, RepositoryError>
    where
        F: FnOnce(&mut ContactMessage),
    {
        let mut guard = self.records.lock().expect("repository mutex");
        Ok(guard.get_mut(id).map(|message| {
            change(message);
            message.clone()
        }))
    }

    fn delete(&self, id: &MessageId) -> Result<Option<ContactMessage>, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex").remove(id))
    }

    fn all(&self) -> Result<Vec<ContactMessage>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("repository mutex")
            .values()
            .cloned()
            .collect())
    }
}

type PendingChange = Box<dyn FnOnce(&mut ContactMessage) + Send>;

/// Applies one competing write to a record just before the next change to it lands.
pub(super) struct InterleavingRepository {
    inner: MemoryRepository,
    competing: Mutex<Option<PendingChange>>,
}

impl InterleavingRepository {
    pub(super) fn new<F>(inner: MemoryRepository, competing: F) -> Self
    where
        F: FnOnce(&mut ContactMessage) + Send + 'static,
    {
        Self {
            inner,
            competing: Mutex::new(Some(Box::new(competing))),
        }
    }
}

impl MessageRepository for InterleavingRepository {
    fn insert(&self, message: ContactMessage) -> Result<ContactMessage, RepositoryError> {
        self.inner.insert(message)
    }

    fn modify<F>(&self, id: &MessageId, change: F) -> Result<Option<ContactMessage>, RepositoryError>
    where
        F: FnOnce(&mut ContactMessage),
    {
        let competing = self.competing.lock().expect("competing mutex").take();
        if let Some(competing) = competing {
            self.inner.modify(id, competing)?;
        }
        self.inner.modify(id, change)
    }

    fn delete(&self, id: &MessageId) -> Result<Option<ContactMessage>, RepositoryError> {
        self.inner.delete(id)
    }

    fn all(&self) -> Result<Vec<ContactMessage>, RepositoryError> {
        self.inner.all()
    }
}

pub(super) struct UnavailableRepository;

impl MessageRepository for UnavailableRepository {
    fn insert(&self, _message: ContactMessage) -> Result<ContactMessage, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn modify<F>(&self, _id: &MessageId, _change: F) -> Result<Option<ContactMessage>, RepositoryError>
    where
        F: FnOnce(&mut ContactMessage),
    {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn delete(&self, _id: &MessageId) -> Result<Option<ContactMessage>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn all(&self) -> Result<Vec<ContactMessage>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) fn service_with(repository: MemoryRepository) -> MessageService<MemoryRepository> {
    MessageService::new(Arc::new(repository), Arc::new(SentimentScorer::default()))
}

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn submission(name: &str, subject: &str, message: &str) -> ContactSubmission {
    ContactSubmission {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: None,
        subject: subject.to_string(),
        message: message.to_string(),
    }
}

pub(super) fn positive_submission() -> ContactSubmission {
    submission(
        "Asha",
        "Excellent Job Portal!",
        "This is an amazing platform! The interface is user-friendly. Thank you so much!",
    )
}

pub(super) fn negative_submission() -> ContactSubmission {
    submission(
        "Lee",
        "Search broken",
        "The site is broken and the search is slow and confusing.",
    )
}

pub(super) fn neutral_submission() -> ContactSubmission {
    submission(
        "Maya",
        "Question about CV upload",
        "How do I attach a cover letter to my application?",
    )
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

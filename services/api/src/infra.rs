use careervue::messages::{ContactMessage, MessageId, MessageRepository, RepositoryError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local message store backing the HTTP service.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMessageRepository {
    records: Arc<Mutex<HashMap<MessageId, ContactMessage>>>,
}

impl InMemoryMessageRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<MessageId, ContactMessage>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("message store lock poisoned".to_string()))
    }
}

impl MessageRepository for InMemoryMessageRepository {
    fn insert(&self, message: ContactMessage) -> Result<ContactMessage, RepositoryError> {
        let mut guard = self.lock()?;
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
        let mut guard = self.lock()?;
        Ok(guard.get_mut(id).map(|message| {
            change(message);
            message.clone()
        }))
    }

    fn delete(&self, id: &MessageId) -> Result<Option<ContactMessage>, RepositoryError> {
        Ok(self.lock()?.remove(id))
    }

    fn all(&self) -> Result<Vec<ContactMessage>, RepositoryError> {
        Ok(self.lock()?.values().cloned().collect())
    }
}

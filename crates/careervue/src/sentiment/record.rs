use serde::{Deserialize, Serialize};

/// Anything carrying a subject line and a body that can be scored as one text.
pub trait MessageText {
    fn subject(&self) -> Option<&str>;
    fn body(&self) -> Option<&str>;

    /// Subject and body joined by a single space; missing parts count as empty.
    fn scoring_text(&self) -> String {
        format!(
            "{} {}",
            self.subject().unwrap_or_default(),
            self.body().unwrap_or_default()
        )
    }
}

impl<T: MessageText + ?Sized> MessageText for &T {
    fn subject(&self) -> Option<&str> {
        (**self).subject()
    }

    fn body(&self) -> Option<&str> {
        (**self).body()
    }
}

/// Loose message shape used by imports and ad-hoc scoring requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageRecord {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            message: Some(message.into()),
        }
    }
}

impl MessageText for MessageRecord {
    fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    fn body(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

// Notification Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// Source-provided notification identifier, unique per live notification
pub type NotificationId = u32;

/// Raw snapshot entry as produced by the notification source, before
/// title/body extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNotification {
    pub id: NotificationId,
    /// Ordered text elements of the notification's structured content
    pub text_elements: Vec<String>,
}

impl RawNotification {
    pub fn new(id: NotificationId, text_elements: Vec<impl Into<String>>) -> Self {
        Self {
            id,
            text_elements: text_elements.into_iter().map(Into::into).collect(),
        }
    }
}

/// Immutable notification value entity. Identity is the `id`; title and body
/// never mutate after construction. A later snapshot entry with the same id
/// but different content is not detected - only presence/absence is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(id: NotificationId, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Extract title and body from a raw snapshot entry.
    ///
    /// The first text element is the title; all remaining elements are
    /// joined with newline as the body. Zero text elements violates the
    /// source contract and is an error rather than a silent skip.
    ///
    /// # Errors
    /// - `DomainError::MalformedNotification` if the entry has no text elements
    pub fn from_raw(raw: RawNotification) -> Result<Self> {
        let mut elements = raw.text_elements.into_iter();
        let title = elements
            .next()
            .ok_or(DomainError::MalformedNotification { id: raw.id })?;
        let body = elements.collect::<Vec<_>>().join("\n");

        Ok(Self {
            id: raw.id,
            title,
            body,
        })
    }

    /// Case-sensitive substring match against title or body
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        self.title.contains(keyword) || self.body.contains(keyword)
    }
}

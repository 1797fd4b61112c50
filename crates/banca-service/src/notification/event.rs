//! Notification event types.

use banca_core::Client;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle event kind. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationType {
    Create,
    Update,
    Delete,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// A client lifecycle event.
///
/// Carries the affected client for creates and updates; deletes have no
/// payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Event identity, for logging and audit consumers.
    pub id: Uuid,
    /// What happened.
    pub event_type: NotificationType,
    /// The affected client, absent for deletes.
    pub client: Option<Client>,
    /// When the event was published.
    pub occurred_at: DateTime<Utc>,
}

impl NotificationEvent {
    fn new(event_type: NotificationType, client: Option<Client>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            client,
            occurred_at: Utc::now(),
        }
    }

    /// Event for a successfully created client.
    #[must_use]
    pub fn create(client: Client) -> Self {
        Self::new(NotificationType::Create, Some(client))
    }

    /// Event for a successfully updated client.
    #[must_use]
    pub fn update(client: Client) -> Self {
        Self::new(NotificationType::Update, Some(client))
    }

    /// Event for a successfully deleted client. No payload.
    #[must_use]
    pub fn delete() -> Self {
        Self::new(NotificationType::Delete, None)
    }
}

impl fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.client {
            Some(client) => write!(
                f,
                "{} client={} ({})",
                self.event_type,
                client.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                client.username
            ),
            None => write!(f, "{}", self.event_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banca_core::{ClientId, Email};

    fn test_client() -> Client {
        Client::new(
            "Jane".to_string(),
            "janedoe".to_string(),
            Email::new_unchecked("jane@example.com"),
        )
        .with_id(ClientId::from_raw(7))
    }

    #[test]
    fn test_create_event_carries_client() {
        let event = NotificationEvent::create(test_client());
        assert_eq!(event.event_type, NotificationType::Create);
        assert!(event.client.is_some());
    }

    #[test]
    fn test_delete_event_has_no_payload() {
        let event = NotificationEvent::delete();
        assert_eq!(event.event_type, NotificationType::Delete);
        assert!(event.client.is_none());
    }

    #[test]
    fn test_event_ids_are_unique() {
        let a = NotificationEvent::delete();
        let b = NotificationEvent::delete();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_event_type_serialization() {
        assert_eq!(
            serde_json::to_string(&NotificationType::Create).unwrap(),
            "\"CREATE\""
        );
        assert_eq!(
            serde_json::to_string(&NotificationType::Delete).unwrap(),
            "\"DELETE\""
        );
    }

    #[test]
    fn test_event_display() {
        let event = NotificationEvent::update(test_client());
        let shown = event.to_string();
        assert!(shown.contains("UPDATE"));
        assert!(shown.contains("janedoe"));
    }
}

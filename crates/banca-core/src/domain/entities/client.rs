//! Client entity.

use super::super::value_objects::Email;
use crate::{CardNumber, ClientId, Entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Client aggregate.
///
/// The remote store is canonical for clients: the id is `None` until the
/// remote store assigns one on creation, and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Client {
    /// Remote-assigned identifier. `None` for a client that has not been
    /// created remotely yet.
    pub id: Option<ClientId>,

    /// Display name.
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    /// Unique username.
    #[validate(length(min = 3, max = 32))]
    pub username: String,

    /// Client's email address.
    pub email: Email,

    /// Numbers of the bank cards associated with this client.
    #[serde(default)]
    pub cards: Vec<CardNumber>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Creates a new client without an id (not yet created remotely).
    #[must_use]
    pub fn new(name: String, username: String, email: Email) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name,
            username,
            email,
            cards: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Assigns the remote-provided id. Ignored if an id is already set;
    /// ids are immutable once assigned.
    pub fn assign_id(&mut self, id: ClientId) {
        if self.id.is_none() {
            self.id = Some(id);
        }
    }

    /// Returns a copy of this client with the given id assigned.
    #[must_use]
    pub fn with_id(mut self, id: ClientId) -> Self {
        self.assign_id(id);
        self
    }

    /// Updates the client's profile fields.
    pub fn update_profile(&mut self, name: String, username: String, email: Email) {
        self.name = name;
        self.username = username;
        self.email = email;
        self.updated_at = Utc::now();
    }

    /// Associates a card with this client.
    pub fn add_card(&mut self, number: CardNumber) {
        if !self.cards.contains(&number) {
            self.cards.push(number);
            self.updated_at = Utc::now();
        }
    }

    /// Removes a card association.
    pub fn remove_card(&mut self, number: &CardNumber) {
        let before = self.cards.len();
        self.cards.retain(|c| c != number);
        if self.cards.len() != before {
            self.updated_at = Utc::now();
        }
    }

    /// Refreshes the update timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Entity<ClientId> for Client {
    fn id(&self) -> Option<&ClientId> {
        self.id.as_ref()
    }
}

/// Builder for creating Client instances.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    id: Option<ClientId>,
    name: Option<String>,
    username: Option<String>,
    email: Option<Email>,
    cards: Vec<CardNumber>,
}

impl ClientBuilder {
    /// Creates a new client builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the id.
    #[must_use]
    pub fn id(mut self, id: ClientId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the username.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the email.
    #[must_use]
    pub fn email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }

    /// Adds an associated card.
    #[must_use]
    pub fn card(mut self, number: CardNumber) -> Self {
        self.cards.push(number);
        self
    }

    /// Builds the Client instance.
    ///
    /// # Panics
    ///
    /// Panics if name, username, or email are not set.
    #[must_use]
    pub fn build(self) -> Client {
        let mut client = Client::new(
            self.name.expect("name is required"),
            self.username.expect("username is required"),
            self.email.expect("email is required"),
        );
        if let Some(id) = self.id {
            client.assign_id(id);
        }
        client.cards = self.cards;
        client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_client(username: &str) -> Client {
        Client::new(
            "Test Client".to_string(),
            username.to_string(),
            Email::new(&format!("{}@example.com", username)).unwrap(),
        )
    }

    #[test]
    fn test_client_creation() {
        let client = create_client("janedoe");
        assert!(client.id.is_none());
        assert_eq!(client.username, "janedoe");
        assert!(client.cards.is_empty());
        assert_eq!(client.created_at, client.updated_at);
    }

    #[test]
    fn test_assign_id_once() {
        let mut client = create_client("janedoe");
        client.assign_id(ClientId::from_raw(7));
        assert_eq!(client.id, Some(ClientId::from_raw(7)));

        // a second assignment is ignored
        client.assign_id(ClientId::from_raw(8));
        assert_eq!(client.id, Some(ClientId::from_raw(7)));
    }

    #[test]
    fn test_with_id() {
        let client = create_client("janedoe").with_id(ClientId::from_raw(3));
        assert_eq!(client.id, Some(ClientId::from_raw(3)));
    }

    #[test]
    fn test_update_profile() {
        let mut client = create_client("janedoe");
        client.update_profile(
            "Jane Doe".to_string(),
            "jane".to_string(),
            Email::new("jane@example.com").unwrap(),
        );
        assert_eq!(client.name, "Jane Doe");
        assert_eq!(client.username, "jane");
        assert_eq!(client.email.as_str(), "jane@example.com");
    }

    #[test]
    fn test_add_and_remove_card() {
        let mut client = create_client("janedoe");
        let number = CardNumber::from("4539148803436467");
        client.add_card(number.clone());
        client.add_card(number.clone());
        assert_eq!(client.cards.len(), 1);

        client.remove_card(&number);
        assert!(client.cards.is_empty());
    }

    #[test]
    fn test_client_builder() {
        let client = ClientBuilder::new()
            .id(ClientId::from_raw(9))
            .name("Jane Doe")
            .username("janedoe")
            .email(Email::new("jane@example.com").unwrap())
            .card(CardNumber::from("4539148803436467"))
            .build();

        assert_eq!(client.id, Some(ClientId::from_raw(9)));
        assert_eq!(client.cards.len(), 1);
    }

    #[test]
    fn test_client_validation() {
        use validator::Validate;

        let client = create_client("janedoe");
        assert!(client.validate().is_ok());

        let mut invalid = create_client("ab");
        invalid.username = "ab".to_string();
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_entity_id() {
        let client = create_client("janedoe").with_id(ClientId::from_raw(1));
        assert_eq!(Entity::id(&client), Some(&ClientId::from_raw(1)));
    }

    #[test]
    fn test_client_serde_roundtrip() {
        let client = create_client("janedoe").with_id(ClientId::from_raw(5));
        let json = serde_json::to_string(&client).unwrap();
        let parsed: Client = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, client);
    }
}

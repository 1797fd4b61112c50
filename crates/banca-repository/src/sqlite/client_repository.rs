//! SQLite client repository implementation.

use crate::{traits::ClientRepository, DatabasePoolInterface};
use banca_core::{BancaError, BancaResult, CardNumber, Client, ClientId, Email};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// SQLite client repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = ClientRepository)]
pub struct SqliteClientRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl SqliteClientRepository {
    /// Creates a new SQLite client repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    /// Loads the numbers of the cards associated with a client.
    async fn load_card_numbers(&self, id: ClientId) -> BancaResult<Vec<CardNumber>> {
        let numbers: Vec<String> =
            sqlx::query_scalar("SELECT number FROM bank_cards WHERE client_id = ? ORDER BY number")
                .bind(id.into_inner())
                .fetch_all(self.pool.inner())
                .await?;

        Ok(numbers.into_iter().map(CardNumber::from).collect())
    }

    async fn attach_cards(&self, mut client: Client) -> BancaResult<Client> {
        if let Some(id) = client.id {
            client.cards = self.load_card_numbers(id).await?;
        }
        Ok(client)
    }
}

/// Database row representation of a client.
#[derive(Debug, FromRow)]
struct ClientRow {
    id: i64,
    name: String,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: Some(ClientId::from_raw(row.id)),
            name: row.name,
            username: row.username,
            email: Email::new_unchecked(row.email),
            cards: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn require_id(client: &Client) -> BancaResult<i64> {
    client
        .id
        .map(ClientId::into_inner)
        .ok_or_else(|| BancaError::Database("cannot persist a client without an id".to_string()))
}

#[async_trait]
impl ClientRepository for SqliteClientRepository {
    async fn find_all(&self) -> BancaResult<Vec<Client>> {
        debug!("Finding all clients");

        let rows = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, name, username, email, created_at, updated_at
            FROM clients
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.inner())
        .await?;

        let mut clients = Vec::with_capacity(rows.len());
        for row in rows {
            clients.push(self.attach_cards(Client::from(row)).await?);
        }
        Ok(clients)
    }

    async fn find_by_id(&self, id: ClientId) -> BancaResult<Option<Client>> {
        debug!("Finding client by id: {}", id);

        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, name, username, email, created_at, updated_at
            FROM clients
            WHERE id = ?
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        match row {
            Some(row) => Ok(Some(self.attach_cards(Client::from(row)).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_username(&self, username: &str) -> BancaResult<Option<Client>> {
        debug!("Finding client by username: {}", username);

        let row = sqlx::query_as::<_, ClientRow>(
            r#"
            SELECT id, name, username, email, created_at, updated_at
            FROM clients
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool.inner())
        .await?;

        match row {
            Some(row) => Ok(Some(self.attach_cards(Client::from(row)).await?)),
            None => Ok(None),
        }
    }

    async fn exists_by_username(&self, username: &str) -> BancaResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE username = ?")
            .bind(username)
            .fetch_one(self.pool.inner())
            .await?;
        Ok(count > 0)
    }

    async fn exists_by_email(&self, email: &str) -> BancaResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE LOWER(email) = LOWER(?)")
                .bind(email)
                .fetch_one(self.pool.inner())
                .await?;
        Ok(count > 0)
    }

    async fn save(&self, client: &Client) -> BancaResult<Client> {
        let id = require_id(client)?;
        debug!("Saving client: {}", id);

        sqlx::query(
            r#"
            INSERT INTO clients (id, name, username, email, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                username = excluded.username,
                email = excluded.email,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(&client.name)
        .bind(&client.username)
        .bind(client.email.as_str())
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(self.pool.inner())
        .await?;

        Ok(client.clone())
    }

    async fn update(&self, id: ClientId, client: &Client) -> BancaResult<Option<Client>> {
        debug!("Updating client: {}", id);

        let result = sqlx::query(
            r#"
            UPDATE clients
            SET name = ?, username = ?, email = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&client.name)
        .bind(&client.username)
        .bind(client.email.as_str())
        .bind(client.updated_at)
        .bind(id.into_inner())
        .execute(self.pool.inner())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn delete(&self, id: ClientId) -> BancaResult<bool> {
        debug!("Deleting client: {}", id);

        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> BancaResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(self.pool.inner())
            .await?;
        Ok(count as u64)
    }
}

impl std::fmt::Debug for SqliteClientRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteClientRepository").finish_non_exhaustive()
    }
}

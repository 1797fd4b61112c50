//! SQLite bank card repository implementation.

use crate::{traits::BankCardRepository, DatabasePoolInterface};
use banca_core::{BancaResult, BankCard, CardNumber, ClientId};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// SQLite bank card repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = BankCardRepository)]
pub struct SqliteBankCardRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl SqliteBankCardRepository {
    /// Creates a new SQLite bank card repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a bank card.
#[derive(Debug, FromRow)]
struct CardRow {
    number: String,
    client_id: Option<i64>,
    expiration_date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CardRow> for BankCard {
    fn from(row: CardRow) -> Self {
        BankCard {
            number: CardNumber::from(row.number),
            client_id: row.client_id.map(ClientId::from_raw),
            expiration_date: row.expiration_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl BankCardRepository for SqliteBankCardRepository {
    async fn find_all(&self) -> BancaResult<Vec<BankCard>> {
        debug!("Finding all bank cards");

        let rows = sqlx::query_as::<_, CardRow>(
            r#"
            SELECT number, client_id, expiration_date, created_at, updated_at
            FROM bank_cards
            ORDER BY number
            "#,
        )
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(BankCard::from).collect())
    }

    async fn find_by_number(&self, number: &CardNumber) -> BancaResult<Option<BankCard>> {
        debug!("Finding bank card by number: {}", number);

        let row = sqlx::query_as::<_, CardRow>(
            r#"
            SELECT number, client_id, expiration_date, created_at, updated_at
            FROM bank_cards
            WHERE number = ?
            "#,
        )
        .bind(number.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(BankCard::from))
    }

    async fn find_by_client_id(&self, client_id: ClientId) -> BancaResult<Vec<BankCard>> {
        debug!("Finding bank cards for client: {}", client_id);

        let rows = sqlx::query_as::<_, CardRow>(
            r#"
            SELECT number, client_id, expiration_date, created_at, updated_at
            FROM bank_cards
            WHERE client_id = ?
            ORDER BY number
            "#,
        )
        .bind(client_id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(BankCard::from).collect())
    }

    async fn save(&self, card: &BankCard) -> BancaResult<BankCard> {
        debug!("Saving bank card: {}", card.number);

        sqlx::query(
            r#"
            INSERT INTO bank_cards (number, client_id, expiration_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(number) DO UPDATE SET
                client_id = excluded.client_id,
                expiration_date = excluded.expiration_date,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(card.number.as_str())
        .bind(card.client_id.map(ClientId::into_inner))
        .bind(card.expiration_date)
        .bind(card.created_at)
        .bind(card.updated_at)
        .execute(self.pool.inner())
        .await?;

        Ok(card.clone())
    }

    async fn update(&self, number: &CardNumber, card: &BankCard) -> BancaResult<Option<BankCard>> {
        debug!("Updating bank card: {}", number);

        let result = sqlx::query(
            r#"
            UPDATE bank_cards
            SET client_id = ?, expiration_date = ?, updated_at = ?
            WHERE number = ?
            "#,
        )
        .bind(card.client_id.map(ClientId::into_inner))
        .bind(card.expiration_date)
        .bind(card.updated_at)
        .bind(number.as_str())
        .execute(self.pool.inner())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_number(number).await
    }

    async fn delete(&self, number: &CardNumber) -> BancaResult<bool> {
        debug!("Deleting bank card: {}", number);

        let result = sqlx::query("DELETE FROM bank_cards WHERE number = ?")
            .bind(number.as_str())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for SqliteBankCardRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBankCardRepository").finish_non_exhaustive()
    }
}

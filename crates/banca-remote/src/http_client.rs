//! HTTP implementations of the remote store repositories.

use crate::dto::{
    parse_json, ApiEnvelope, CardPayload, CardWritePayload, ClientPayload, ClientWritePayload,
};
use crate::{RemoteBankCardRepository, RemoteClientRepository};
use banca_config::RemoteConfig;
use banca_core::{BancaError, BancaResult, BankCard, CardNumber, Client, ClientId};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use shaku::Component;
use tracing::debug;

/// Builds the shared HTTP client from configuration.
///
/// The per-request timeout bounds every remote call; on expiry the
/// operation reports `RemoteUnavailable` instead of blocking the caller.
pub fn build_http_client(config: &RemoteConfig) -> BancaResult<HttpClient> {
    HttpClient::builder()
        .timeout(config.timeout())
        .pool_max_idle_per_host(16)
        .build()
        .map_err(|e| BancaError::Internal(format!("Failed to create HTTP client: {}", e)))
}

fn transport_error(err: reqwest::Error) -> BancaError {
    if err.is_timeout() {
        BancaError::RemoteUnavailable(format!("Remote request timed out: {}", err))
    } else {
        BancaError::RemoteUnavailable(format!("Remote request failed: {}", err))
    }
}

fn read_status_error(status: StatusCode, resource: &'static str, id: &str) -> BancaError {
    if status == StatusCode::NOT_FOUND {
        BancaError::not_found(resource, id)
    } else {
        BancaError::RemoteUnavailable(format!("Remote returned {} reading {} {}", status, resource, id))
    }
}

fn write_status_error(status: StatusCode, resource: &'static str, id: &str) -> BancaError {
    if status == StatusCode::NOT_FOUND {
        BancaError::not_found(resource, id)
    } else if status.is_client_error() {
        BancaError::RemoteWriteFailed(format!("Remote rejected write for {} {}: {}", resource, id, status))
    } else {
        BancaError::RemoteUnavailable(format!("Remote returned {} writing {} {}", status, resource, id))
    }
}

/// HTTP client for the remote client API.
#[derive(Component)]
#[shaku(interface = RemoteClientRepository)]
pub struct HttpRemoteClientRepository {
    client: HttpClient,
    base_url: String,
}

impl HttpRemoteClientRepository {
    /// Creates a new remote client repository from configuration.
    pub fn new(config: &RemoteConfig) -> BancaResult<Self> {
        Ok(Self::with_client(
            build_http_client(config)?,
            &config.base_url,
        ))
    }

    /// Creates a remote client repository with a preconfigured HTTP client.
    #[must_use]
    pub fn with_client(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl RemoteClientRepository for HttpRemoteClientRepository {
    async fn get_all(&self) -> BancaResult<Vec<Client>> {
        debug!("Remote GetAll clients");

        let response = self
            .client
            .get(self.url("/api/v1/clients"))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(read_status_error(response.status(), "Client", "*"));
        }

        let envelope: ApiEnvelope<Vec<ClientPayload>> = parse_json(response).await?;
        Ok(envelope
            .data
            .into_iter()
            .map(ClientPayload::into_client)
            .collect())
    }

    async fn get_by_id(&self, id: ClientId) -> BancaResult<Client> {
        debug!("Remote GetById client: {}", id);

        let response = self
            .client
            .get(self.url(&format!("/api/v1/clients/{}", id)))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(read_status_error(response.status(), "Client", &id.to_string()));
        }

        let envelope: ApiEnvelope<ClientPayload> = parse_json(response).await?;
        Ok(envelope.data.into_client())
    }

    async fn create(&self, client: &Client) -> BancaResult<Client> {
        debug!("Remote Create client: {}", client.username);

        let response = self
            .client
            .post(self.url("/api/v1/clients"))
            .json(&ClientWritePayload::from(client))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(write_status_error(
                response.status(),
                "Client",
                &client.username,
            ));
        }

        let payload: ClientPayload = parse_json(response).await?;
        Ok(payload.into_client())
    }

    async fn update(&self, id: ClientId, client: &Client) -> BancaResult<Client> {
        debug!("Remote Update client: {}", id);

        let response = self
            .client
            .put(self.url(&format!("/api/v1/clients/{}", id)))
            .json(&ClientWritePayload::from(client))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(write_status_error(response.status(), "Client", &id.to_string()));
        }

        let payload: ClientPayload = parse_json(response).await?;
        Ok(payload.into_client())
    }

    async fn delete(&self, id: ClientId) -> BancaResult<()> {
        debug!("Remote Delete client: {}", id);

        let response = self
            .client
            .delete(self.url(&format!("/api/v1/clients/{}", id)))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(write_status_error(response.status(), "Client", &id.to_string()));
        }

        Ok(())
    }
}

impl std::fmt::Debug for HttpRemoteClientRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRemoteClientRepository")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// HTTP client for the remote bank card API.
#[derive(Component)]
#[shaku(interface = RemoteBankCardRepository)]
pub struct HttpRemoteBankCardRepository {
    client: HttpClient,
    base_url: String,
}

impl HttpRemoteBankCardRepository {
    /// Creates a new remote card repository from configuration.
    pub fn new(config: &RemoteConfig) -> BancaResult<Self> {
        Ok(Self::with_client(
            build_http_client(config)?,
            &config.base_url,
        ))
    }

    /// Creates a remote card repository with a preconfigured HTTP client.
    #[must_use]
    pub fn with_client(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl RemoteBankCardRepository for HttpRemoteBankCardRepository {
    async fn get_all(&self) -> BancaResult<Vec<BankCard>> {
        debug!("Remote GetAll cards");

        let response = self
            .client
            .get(self.url("/api/v1/cards"))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(read_status_error(response.status(), "BankCard", "*"));
        }

        let envelope: ApiEnvelope<Vec<CardPayload>> = parse_json(response).await?;
        Ok(envelope.data.into_iter().map(CardPayload::into_card).collect())
    }

    async fn get_by_number(&self, number: &CardNumber) -> BancaResult<BankCard> {
        debug!("Remote GetByNumber card: {}", number);

        let response = self
            .client
            .get(self.url(&format!("/api/v1/cards/{}", number)))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(read_status_error(response.status(), "BankCard", number.as_str()));
        }

        let envelope: ApiEnvelope<CardPayload> = parse_json(response).await?;
        Ok(envelope.data.into_card())
    }

    async fn create(&self, card: &BankCard) -> BancaResult<BankCard> {
        debug!("Remote Create card: {}", card.number);

        let response = self
            .client
            .post(self.url("/api/v1/cards"))
            .json(&CardWritePayload::from(card))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(write_status_error(
                response.status(),
                "BankCard",
                card.number.as_str(),
            ));
        }

        let payload: CardPayload = parse_json(response).await?;
        Ok(payload.into_card())
    }

    async fn update(&self, number: &CardNumber, card: &BankCard) -> BancaResult<BankCard> {
        debug!("Remote Update card: {}", number);

        let response = self
            .client
            .put(self.url(&format!("/api/v1/cards/{}", number)))
            .json(&CardWritePayload::from(card))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(write_status_error(
                response.status(),
                "BankCard",
                number.as_str(),
            ));
        }

        let payload: CardPayload = parse_json(response).await?;
        Ok(payload.into_card())
    }

    async fn delete(&self, number: &CardNumber) -> BancaResult<()> {
        debug!("Remote Delete card: {}", number);

        let response = self
            .client
            .delete(self.url(&format!("/api/v1/cards/{}", number)))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(write_status_error(
                response.status(),
                "BankCard",
                number.as_str(),
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for HttpRemoteBankCardRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRemoteBankCardRepository")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

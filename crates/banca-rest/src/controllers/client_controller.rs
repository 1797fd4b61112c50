//! Client management controller.

use crate::{
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use banca_core::{BancaError, ClientId};
use banca_service::{ClientResponse, CreateClientRequest, ImportSummary, UpdateClientRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

/// Creates the client router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/import", post(import_clients))
        .route("/export", post(export_clients))
        .route(
            "/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
}

/// File reference for bulk import/export.
#[derive(Debug, Deserialize)]
struct FileRequest {
    path: PathBuf,
}

/// List all clients.
async fn list_clients(State(state): State<AppState>) -> ApiResult<Vec<ClientResponse>> {
    debug!("List clients request");

    let response = state.client_service.find_all_clients().await?;
    ok(response)
}

/// Create a new client.
async fn create_client(
    State(state): State<AppState>,
    Json(request): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ClientResponse>>), AppError> {
    debug!("Create client request: {}", request.username);

    let response = state.client_service.save_client(request).await?;
    Ok(created(response))
}

/// Get a client by ID.
async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ClientResponse> {
    debug!("Get client request: {}", id);

    let client_id = parse_client_id(&id)?;
    let response = state.client_service.find_by_client_id(client_id).await?;
    ok(response)
}

/// Update a client.
async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateClientRequest>,
) -> ApiResult<ClientResponse> {
    debug!("Update client request: {}", id);

    let client_id = parse_client_id(&id)?;
    let response = state
        .client_service
        .update_client(client_id, request)
        .await?;
    ok(response)
}

/// Delete a client.
async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete client request: {}", id);

    let client_id = parse_client_id(&id)?;
    state.client_service.delete_client(client_id).await?;
    Ok(no_content())
}

/// Bulk-import clients from a JSON file on the server.
async fn import_clients(
    State(state): State<AppState>,
    Json(request): Json<FileRequest>,
) -> ApiResult<ImportSummary> {
    debug!("Import clients request: {}", request.path.display());

    let summary = state
        .client_service
        .import_clients_from_json(&request.path)
        .await?;
    ok(summary)
}

/// Export all clients to a JSON file on the server.
async fn export_clients(
    State(state): State<AppState>,
    Json(request): Json<FileRequest>,
) -> ApiResult<usize> {
    debug!("Export clients request: {}", request.path.display());

    let count = state
        .client_service
        .export_clients_to_json(&request.path)
        .await?;
    ok(count)
}

fn parse_client_id(id: &str) -> Result<ClientId, AppError> {
    ClientId::parse(id)
        .map_err(|_| AppError(BancaError::validation(format!("Invalid client id: {}", id))))
}

//! Bank card controller.

use crate::{
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use banca_core::{BancaError, CardNumber, ClientId};
use banca_service::{CardResponse, CreateCardRequest, UpdateCardRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::debug;

/// Creates the card router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cards).post(create_card))
        .route("/by-client/:id", get(cards_by_client))
        .route(
            "/:number",
            get(get_card).put(update_card).delete(delete_card),
        )
}

/// List all cards.
async fn list_cards(State(state): State<AppState>) -> ApiResult<Vec<CardResponse>> {
    debug!("List cards request");

    let response = state.card_service.find_all_cards().await?;
    ok(response)
}

/// List the cards associated with a client.
async fn cards_by_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<CardResponse>> {
    debug!("List cards for client: {}", id);

    let client_id = ClientId::parse(&id)
        .map_err(|_| AppError(BancaError::validation(format!("Invalid client id: {}", id))))?;
    let response = state.card_service.find_cards_by_client_id(client_id).await?;
    ok(response)
}

/// Register a new card.
async fn create_card(
    State(state): State<AppState>,
    Json(request): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CardResponse>>), AppError> {
    debug!("Create card request: {}", request.number);

    let response = state.card_service.save_card(request).await?;
    Ok(created(response))
}

/// Get a card by number.
async fn get_card(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> ApiResult<CardResponse> {
    debug!("Get card request: {}", number);

    let number = CardNumber::from(number);
    let response = state.card_service.find_card_by_number(&number).await?;
    ok(response)
}

/// Update a card.
async fn update_card(
    State(state): State<AppState>,
    Path(number): Path<String>,
    Json(request): Json<UpdateCardRequest>,
) -> ApiResult<CardResponse> {
    debug!("Update card request: {}", number);

    let number = CardNumber::from(number);
    let response = state.card_service.update_card(&number, request).await?;
    ok(response)
}

/// Delete a card.
async fn delete_card(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete card request: {}", number);

    let number = CardNumber::from(number);
    state.card_service.delete_card(&number).await?;
    Ok(no_content())
}

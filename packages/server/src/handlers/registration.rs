use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::registration;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::registration::{
    RegisterRequest, RegisterResponse, RegistrationItem, RegistrationListResponse,
    validate_register_request,
};
use crate::registration::RegistrationService;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/register",
    tag = "Registrations",
    operation_id = "register",
    summary = "Register a participant",
    description = "Stores a registration and adds one participant to every selected game per occurrence, in a single transaction. Every field is required and `games` must be non-empty. Each game must exist, be active and have room; otherwise nothing is stored.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration stored", body = RegisterResponse),
        (status = 400, description = "Missing field or unknown game (VALIDATION_ERROR, UNKNOWN_GAME)", body = ErrorBody),
        (status = 409, description = "Game inactive or full (GAME_INACTIVE, GAME_FULL)", body = ErrorBody),
        (status = 500, description = "Database failure (DATABASE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_registration = validate_register_request(payload)?;

    let model = RegistrationService::new(&state.db)
        .register(&new_registration)
        .await?;

    info!(
        registration_id = model.id,
        roll_number = %model.roll_number,
        games = ?new_registration.games.names(),
        "Participant registered"
    );

    Ok((StatusCode::CREATED, Json(RegisterResponse::new(model.id))))
}

#[utoipa::path(
    get,
    path = "/registrations",
    tag = "Registrations",
    operation_id = "listRegistrations",
    summary = "List all registrations",
    description = "Returns every registration, most recent first. Not paginated.",
    responses(
        (status = 200, description = "All registrations", body = RegistrationListResponse),
        (status = 500, description = "Database failure (DATABASE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_registrations(
    State(state): State<AppState>,
) -> Result<Json<RegistrationListResponse>, AppError> {
    let models = registration::Entity::find()
        .order_by_desc(registration::Column::RegistrationDate)
        .order_by_desc(registration::Column::Id)
        .all(&state.db)
        .await
        .map_err(AppError::database("Failed to fetch registrations"))?;

    let registrations: Vec<RegistrationItem> = models.into_iter().map(Into::into).collect();

    Ok(Json(RegistrationListResponse {
        success: true,
        count: registrations.len(),
        registrations,
    }))
}

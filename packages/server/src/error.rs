use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::registration::RegistrationError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    #[schema(example = false)]
    pub success: bool,
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`, `UNKNOWN_GAME`,
    /// `GAME_INACTIVE`, `GAME_FULL`, `DATABASE_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "All fields are required. Games must be a non-empty array.")]
    pub message: String,
    /// Underlying failure text, present on server errors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Connection pool timed out")]
    pub error: Option<String>,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    UnknownGame(String),
    GameInactive(String),
    GameFull(String),
    /// A database call failed. `context` is the route's failure message.
    Database {
        context: &'static str,
        detail: String,
    },
}

impl AppError {
    /// Wrap a database error with the failure message of the route it hit.
    pub fn database(context: &'static str) -> impl FnOnce(DbErr) -> AppError {
        move |err| AppError::Database {
            context,
            detail: err.to_string(),
        }
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("VALIDATION_ERROR", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new("NOT_FOUND", msg)),
            AppError::UnknownGame(name) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("UNKNOWN_GAME", format!("Unknown game: {name}")),
            ),
            AppError::GameInactive(name) => (
                StatusCode::CONFLICT,
                ErrorBody::new(
                    "GAME_INACTIVE",
                    format!("{name} is not accepting registrations"),
                ),
            ),
            AppError::GameFull(name) => (
                StatusCode::CONFLICT,
                ErrorBody::new("GAME_FULL", format!("{name} has no places left")),
            ),
            AppError::Database { context, detail } => {
                tracing::error!(error = %detail, "{}", context);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: Some(detail),
                        ..ErrorBody::new("DATABASE_ERROR", context.to_string())
                    },
                )
            }
        }
    }
}

impl ErrorBody {
    fn new(code: &'static str, message: String) -> Self {
        Self {
            success: false,
            code,
            message,
            error: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::UnknownGame(name) => {
                tracing::warn!(game = %name, "Registration rejected: unknown game");
                AppError::UnknownGame(name)
            }
            RegistrationError::GameInactive(name) => {
                tracing::warn!(game = %name, "Registration rejected: game inactive");
                AppError::GameInactive(name)
            }
            RegistrationError::GameFull(name) => {
                tracing::warn!(game = %name, "Registration rejected: game full");
                AppError::GameFull(name)
            }
            RegistrationError::Database(e) => AppError::database("Registration failed")(e),
        }
    }
}

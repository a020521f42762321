use axum::{Json, extract::State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::game;
use crate::error::{AppError, ErrorBody};
use crate::models::game::{GameStats, GameStatsResponse};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/games-stats",
    tag = "Games",
    operation_id = "gamesStats",
    summary = "Participation per game",
    description = "Returns capacity, participant count, fill percentage and active flag for every game, ordered by name. `fillPercentage` is truncated, and 0 for a game without capacity.",
    responses(
        (status = 200, description = "Per-game statistics", body = GameStatsResponse),
        (status = 500, description = "Database failure (DATABASE_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn games_stats(
    State(state): State<AppState>,
) -> Result<Json<GameStatsResponse>, AppError> {
    let games: Vec<GameStats> = game::Entity::find()
        .order_by_asc(game::Column::Name)
        .all(&state.db)
        .await
        .map_err(AppError::database("Failed to fetch games statistics"))?
        .into_iter()
        .map(GameStats::from)
        .collect();

    Ok(Json(GameStatsResponse {
        success: true,
        count: games.len(),
        games,
    }))
}

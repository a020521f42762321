use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::registration::register))
        .routes(routes!(handlers::registration::list_registrations))
        .routes(routes!(handlers::game::games_stats))
}

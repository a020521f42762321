pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod registration;
pub mod routes;
pub mod seed;
pub mod state;

use std::time::Duration;

use axum::http::{HeaderValue, Uri};
use axum::routing::any;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{CorsConfig, StaticAssetsConfig};
use crate::error::AppError;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sports Fest Registration API",
        version = "1.0.0",
        description = "Participant registration and game statistics for the university sports fest"
    ),
    tags(
        (name = "Registrations", description = "Submitting and listing registrations"),
        (name = "Games", description = "Game catalog participation"),
    ),
)]
struct ApiDoc;

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);
    let static_assets = state.config.static_assets.clone();

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes())
        .split_for_parts();

    let router = router
        .route("/api/{*path}", any(api_not_found))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api));

    with_static_assets(router, &static_assets).layer(cors)
}

/// Unknown `/api/*` paths get a JSON 404 instead of reaching the front-end
/// fallback.
async fn api_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No API route for {}", uri.path()))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age));

    if config.allow_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Serve the built front-end for every path no route claims, falling back to
/// `index.html` so client-side routing works.
fn with_static_assets(router: axum::Router, config: &StaticAssetsConfig) -> axum::Router {
    if !config.enabled {
        return router;
    }

    tracing::info!(dir = %config.dir.display(), "Serving static assets");
    let index = ServeFile::new(config.dir.join("index.html"));
    router.fallback_service(ServeDir::new(&config.dir).fallback(index))
}

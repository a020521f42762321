use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

/// Shared by every request. Holds no mutable state of its own; the pool hands
/// out connections per statement or transaction.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
}

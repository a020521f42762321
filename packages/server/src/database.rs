use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::DatabaseConfig;

/// Open the connection pool.
///
/// The pool is shared by all requests; each statement or transaction borrows a
/// connection and hands it back when the borrowing value is dropped. No
/// connection is made here, so an unreachable database does not stop startup.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let timeout = Duration::from_secs(config.connect_timeout_secs);
    let mut opt = ConnectOptions::new(config.url());

    opt.max_connections(config.max_connections)
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .connect_lazy(true)
        .sqlx_logging(config.sqlx_logging);

    Database::connect(opt).await
}

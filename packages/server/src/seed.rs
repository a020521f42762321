use sea_orm::sea_query::PostgresQueryBuilder;
use sea_orm::*;
use tracing::{info, warn};

use crate::entity::{game, registration};

/// Games seeded into an empty catalog.
pub const DEFAULT_GAMES: &[&str] = &["Cricket", "Football", "Badminton", "Table Tennis", "Athletics"];

/// Create missing tables and seed the game catalog. Safe to run on every start.
pub async fn bootstrap_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    ensure_table(db, registration::Entity).await?;
    ensure_table(db, game::Entity).await?;

    verify_table_access(db, registration::Entity).await;
    verify_table_access(db, game::Entity).await;

    seed_games(db).await?;

    info!("Database schema setup complete");
    Ok(())
}

/// Whether a table named `table` exists in the current schema.
pub async fn table_exists(db: &DatabaseConnection, table: &str) -> Result<bool, DbErr> {
    let row = db
        .query_one_raw(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT 1 FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = $1",
            [table.into()],
        ))
        .await?;
    Ok(row.is_some())
}

async fn ensure_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let table = entity.table_name();

    if table_exists(db, table).await? {
        info!(table, "Table already exists");
        return Ok(());
    }

    info!(table, "Creating table");
    let stmt = Schema::new(DbBackend::Postgres)
        .create_table_from_entity(entity)
        .if_not_exists()
        .to_string(PostgresQueryBuilder);
    db.execute_unprepared(&stmt).await?;
    info!(table, "Table created");

    Ok(())
}

/// Read one row to confirm the table is usable. Failures are only logged.
async fn verify_table_access<E: EntityTrait>(db: &DatabaseConnection, entity: E) {
    let table = entity.table_name();
    match E::find().one(db).await {
        Ok(_) => info!(table, "Verified table access"),
        Err(e) => warn!(table, error = %e, "Table verification failed"),
    }
}

/// Insert the default catalog when the `Games` table is empty.
pub async fn seed_games(db: &DatabaseConnection) -> Result<(), DbErr> {
    let existing = game::Entity::find().count(db).await?;
    if existing > 0 {
        info!(existing, "Game catalog already seeded");
        return Ok(());
    }

    // Two processes may race past the emptiness check; the unique name
    // constraint keeps the catalog single.
    let mut inserted = 0u64;
    for &name in DEFAULT_GAMES {
        let model = game::ActiveModel {
            name: Set(name.to_string()),
            max_participants: Set(game::DEFAULT_MAX_PARTICIPANTS),
            current_participants: Set(0),
            is_active: Set(true),
            ..Default::default()
        };

        let result = game::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(game::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(rows) => inserted += rows,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!(inserted, "Seeded game catalog");
    }

    Ok(())
}

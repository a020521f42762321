//! Transactional registration writer.
//!
//! A registration is one unit of work: the `Registrations` row and every
//! `Games` counter increment it implies commit together or not at all.

use chrono::Utc;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::entity::{game, registration};
use crate::models::registration::NewRegistration;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("unknown game: {0}")]
    UnknownGame(String),
    #[error("game is not accepting registrations: {0}")]
    GameInactive(String),
    #[error("game has no places left: {0}")]
    GameFull(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

pub struct RegistrationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RegistrationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persist a registration and bump the counter of every game it names.
    ///
    /// On any error the transaction is rolled back and the database is left as
    /// it was before the call.
    pub async fn register(
        &self,
        new: &NewRegistration,
    ) -> Result<registration::Model, RegistrationError> {
        let txn = self.db.begin().await?;

        match write_registration(&txn, new).await {
            Ok(model) => {
                txn.commit().await?;
                Ok(model)
            }
            Err(e) => {
                // A failed rollback must not hide `e`.
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(error = %rollback_err, "Rollback after failed registration errored");
                }
                Err(e)
            }
        }
    }
}

async fn write_registration(
    txn: &DatabaseTransaction,
    new: &NewRegistration,
) -> Result<registration::Model, RegistrationError> {
    let model = registration::ActiveModel {
        full_name: Set(new.full_name.clone()),
        roll_number: Set(new.roll_number.clone()),
        department: Set(new.department.clone()),
        section: Set(new.section.clone()),
        gender: Set(new.gender.clone()),
        games: Set(new.games.encode()),
        registration_date: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    debug!(registration_id = model.id, "Registration row staged");

    // Lock game rows in name order so concurrent registrations naming the same
    // games cannot deadlock on each other.
    let mut occurrences = new.games.occurrences();
    occurrences.sort_by(|a, b| a.0.cmp(b.0));

    for (name, count) in occurrences {
        let game = find_game_for_update(txn, name).await?;
        check_can_take(&game, count)?;
        increment_participants(txn, game.id, count).await?;
    }

    Ok(model)
}

async fn find_game_for_update(
    txn: &DatabaseTransaction,
    name: &str,
) -> Result<game::Model, RegistrationError> {
    game::Entity::find()
        .filter(game::Column::Name.eq(name))
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| RegistrationError::UnknownGame(name.to_string()))
}

/// Reject a game that is inactive or lacks room for `count` more entrants.
fn check_can_take(game: &game::Model, count: i32) -> Result<(), RegistrationError> {
    if !game.is_active {
        return Err(RegistrationError::GameInactive(game.name.clone()));
    }
    if game.current_participants + count > game.max_participants {
        return Err(RegistrationError::GameFull(game.name.clone()));
    }
    Ok(())
}

async fn increment_participants(
    txn: &DatabaseTransaction,
    game_id: i32,
    count: i32,
) -> Result<(), RegistrationError> {
    let result = game::Entity::update_many()
        .col_expr(
            game::Column::CurrentParticipants,
            Expr::cust(format!("\"currentParticipants\" + {count}")),
        )
        .filter(game::Column::Id.eq(game_id))
        .exec(txn)
        .await?;

    if result.rows_affected != 1 {
        return Err(DbErr::RecordNotUpdated.into());
    }
    Ok(())
}

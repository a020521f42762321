use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Capacity given to catalog entries unless seeded otherwise.
pub const DEFAULT_MAX_PARTICIPANTS: i32 = 50;

/// Catalog entry for one sport offering.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(column_name = "maxParticipants", default_value = 50)]
    pub max_participants: i32,

    /// Only ever changed by the registration writer, under a row lock.
    #[sea_orm(column_name = "currentParticipants", default_value = 0)]
    pub current_participants: i32,

    #[sea_orm(column_name = "isActive", default_value = true)]
    pub is_active: bool,
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One participant's submission. Written once by the registration writer,
/// never updated.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Registrations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_name = "fullName")]
    pub full_name: String,
    #[sea_orm(column_name = "rollNumber")]
    pub roll_number: String,
    pub department: String,
    pub section: String,
    pub gender: String,

    /// Selected game names as a JSON array, see `GameList`.
    #[sea_orm(column_type = "Text")]
    pub games: String,

    #[sea_orm(column_name = "registrationDate")]
    pub registration_date: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

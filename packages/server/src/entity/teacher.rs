use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teacher")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String, // argon2 PHC string

    /// The single live session token; `None` when logged out.
    #[sea_orm(column_type = "Text", nullable)]
    pub session_token: Option<String>,

    #[sea_orm(has_many)]
    pub classes: HasMany<super::class::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

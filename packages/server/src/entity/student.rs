use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Allowed length of a student identifier, in characters.
pub const ID_MIN_LEN: usize = 3;
pub const ID_MAX_LEN: usize = 20;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    /// Chosen by the teacher when the student is added to a class.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,
    pub password: String, // argon2 PHC string

    /// NULL once the student has been removed from their class.
    pub class_id: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub session_token: Option<String>,

    #[sea_orm(has_many)]
    pub scores: HasMany<super::score::Entity>,

    #[sea_orm(has_many)]
    pub assignments: HasMany<super::student_assignment::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

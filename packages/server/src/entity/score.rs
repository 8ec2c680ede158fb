use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "score")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String, // uuid v7

    pub student_id: String,
    #[sea_orm(belongs_to, from = "student_id", to = "id")]
    pub student: HasOne<super::student::Entity>,

    /// NULL for a standalone typing test.
    pub assignment_id: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub typed_text: String,
    pub accuracy: f64,
    pub wpm: f64,
    /// Seconds spent on the attempt, when known.
    pub time_taken: Option<f64>,

    pub completed_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::required;
use crate::entity::score;
use crate::error::AppError;

/// Record an attempt. `accuracy` and `wpm` are taken as reported by the client.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateScoreRequest {
    /// Omit for a standalone typing test.
    #[schema(example = "01927b3c-6f70-7182-9a3b-4c5d6e7f8a02")]
    pub assignment_id: Option<String>,
    #[schema(example = "the quick brown fox")]
    pub typed_text: Option<String>,
    #[schema(example = 98.5)]
    pub accuracy: Option<f64>,
    #[schema(example = 42.0)]
    pub wpm: Option<f64>,
    /// Seconds spent on the attempt, fractional allowed.
    #[schema(example = 95.5)]
    pub time_taken: Option<f64>,
}

pub struct ValidScore {
    pub assignment_id: Option<String>,
    pub typed_text: String,
    pub accuracy: f64,
    pub wpm: f64,
    pub time_taken: Option<f64>,
}

pub fn validate_create_score(payload: CreateScoreRequest) -> Result<ValidScore, AppError> {
    let typed_text = payload
        .typed_text
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingFields)?;
    let accuracy = required(payload.accuracy)?;
    let wpm = required(payload.wpm)?;

    if !accuracy.is_finite() || !(0.0..=100.0).contains(&accuracy) {
        return Err(AppError::Validation(
            "accuracy must be between 0 and 100".into(),
        ));
    }
    if !wpm.is_finite() || wpm < 0.0 {
        return Err(AppError::Validation("wpm must be >= 0".into()));
    }
    if let Some(t) = payload.time_taken
        && (!t.is_finite() || t < 0.0)
    {
        return Err(AppError::Validation("timeTaken must be >= 0".into()));
    }

    Ok(ValidScore {
        assignment_id: payload.assignment_id.filter(|id| !id.trim().is_empty()),
        typed_text,
        accuracy,
        wpm,
        time_taken: payload.time_taken,
    })
}

/// Filter for score listing. Students only ever see their own scores.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FetchScoresRequest {
    #[schema(example = "alice01")]
    pub student_id: Option<String>,
    #[schema(example = "01927b3c-6f70-7182-9a3b-4c5d6e7f8a02")]
    pub assignment_id: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreIdRequest {
    #[schema(example = "01927b3d-0c1d-7e2f-8a4b-6c7d8e9fa003")]
    pub score_id: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    #[schema(example = "01927b3d-0c1d-7e2f-8a4b-6c7d8e9fa003")]
    pub id: String,
    #[schema(example = "alice01")]
    pub student_id: String,
    pub assignment_id: Option<String>,
    pub typed_text: String,
    #[schema(example = 98.5)]
    pub accuracy: f64,
    #[schema(example = 42.0)]
    pub wpm: f64,
    #[schema(example = 95.5)]
    pub time_taken: Option<f64>,
    pub completed_at: DateTime<Utc>,
}

impl From<score::Model> for ScoreResponse {
    fn from(m: score::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            assignment_id: m.assignment_id,
            typed_text: m.typed_text,
            accuracy: m.accuracy,
            wpm: m.wpm,
            time_taken: m.time_taken,
            completed_at: m.completed_at,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::assignment::AssignmentResponse;
use super::score::ScoreResponse;
use super::shared::{required, required_text};
use crate::entity::student_assignment;
use crate::error::AppError;

/// A typed response to be scored by the server.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptRequest {
    #[schema(example = "01927b3c-6f70-7182-9a3b-4c5d6e7f8a02")]
    pub assignment_id: Option<String>,
    #[schema(example = "the quick brown fox")]
    pub typed_text: Option<String>,
    /// Elapsed seconds, fractional allowed.
    #[schema(example = 12.5)]
    pub time_taken: Option<f64>,
}

pub struct ValidAttempt {
    pub assignment_id: String,
    pub typed_text: String,
    pub time_taken: f64,
}

pub fn validate_submit_attempt(payload: SubmitAttemptRequest) -> Result<ValidAttempt, AppError> {
    let assignment_id = required_text(payload.assignment_id)?;
    let typed_text = payload
        .typed_text
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingFields)?;
    let time_taken = required(payload.time_taken)?;
    if !time_taken.is_finite() || time_taken <= 0.0 {
        return Err(AppError::Validation("timeTaken must be > 0".into()));
    }
    Ok(ValidAttempt {
        assignment_id,
        typed_text,
        time_taken,
    })
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    #[schema(example = "alice01")]
    pub student_id: String,
    #[schema(example = "01927b3c-6f70-7182-9a3b-4c5d6e7f8a02")]
    pub assignment_id: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub score_id: Option<String>,
}

impl From<student_assignment::Model> for CompletionResponse {
    fn from(m: student_assignment::Model) -> Self {
        Self {
            student_id: m.student_id,
            assignment_id: m.assignment_id,
            completed: m.completed,
            completed_at: m.completed_at,
            score_id: m.score_id,
        }
    }
}

/// One active assignment as seen by a student.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssignmentItem {
    pub assignment: AssignmentResponse,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    /// Most recent attempt at this assignment, if any.
    pub latest_score: Option<ScoreResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAttemptResponse {
    pub score: ScoreResponse,
    /// Word slots that differ from the correct text.
    #[schema(example = 1)]
    pub word_errors: u32,
    pub completion: CompletionResponse,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{parse_deadline, required_text, validate_title};
use crate::entity::assignment;
use crate::error::AppError;
use crate::utils::image::validate_image_url;

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    #[schema(example = "Lesson 3 dictation")]
    pub title: Option<String>,
    #[schema(example = "Transcribe the passage at 60 wpm")]
    pub description: Option<String>,
    /// Must be hosted on the configured image host.
    #[schema(example = "https://res.cloudinary.com/demo/image/upload/steno.png")]
    pub image_url: Option<String>,
    /// Text the student is expected to type.
    #[schema(example = "the quick brown fox")]
    pub correct_text: Option<String>,
    #[schema(example = "01927b3c-1a2b-7c3d-8e4f-5a6b7c8d9e01")]
    pub class_id: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[schema(example = "2025-01-01")]
    pub deadline: Option<String>,
}

pub struct ValidAssignment {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub correct_text: String,
    pub class_id: String,
    pub deadline: Option<DateTime<Utc>>,
}

pub fn validate_create_assignment(
    payload: CreateAssignmentRequest,
    image_host: &str,
) -> Result<ValidAssignment, AppError> {
    let title = required_text(payload.title)?;
    // Whitespace in the canonical text is significant; only presence is checked.
    let correct_text = payload
        .correct_text
        .filter(|t| !t.trim().is_empty())
        .ok_or(AppError::MissingFields)?;
    let class_id = required_text(payload.class_id)?;

    validate_title(&title)?;
    if correct_text.chars().count() > 20_000 {
        return Err(AppError::Validation(
            "correctText must be at most 20000 characters".into(),
        ));
    }

    let image_url = match payload.image_url.map(|u| u.trim().to_string()) {
        Some(url) if !url.is_empty() => {
            validate_image_url(&url, image_host)
                .map_err(|e| AppError::Validation(e.message().into()))?;
            Some(url)
        }
        _ => None,
    };

    let deadline = payload
        .deadline
        .filter(|d| !d.trim().is_empty())
        .map(|d| parse_deadline(&d))
        .transpose()?;

    Ok(ValidAssignment {
        title,
        description: payload.description.unwrap_or_default(),
        image_url,
        correct_text,
        class_id,
        deadline,
    })
}

/// Fetch one assignment (`assignmentId`) or every assignment of a class
/// (`classId`). At least one is required.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FetchAssignmentsRequest {
    #[schema(example = "01927b3c-6f70-7182-9a3b-4c5d6e7f8a02")]
    pub assignment_id: Option<String>,
    #[schema(example = "01927b3c-1a2b-7c3d-8e4f-5a6b7c8d9e01")]
    pub class_id: Option<String>,
}

/// Body naming a single assignment.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentIdRequest {
    #[schema(example = "01927b3c-6f70-7182-9a3b-4c5d6e7f8a02")]
    pub assignment_id: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    #[schema(example = "01927b3c-6f70-7182-9a3b-4c5d6e7f8a02")]
    pub id: String,
    #[schema(example = "Lesson 3 dictation")]
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub correct_text: String,
    #[schema(example = "01927b3c-1a2b-7c3d-8e4f-5a6b7c8d9e01")]
    pub class_id: String,
    pub deadline: Option<DateTime<Utc>>,
    #[schema(example = true)]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<assignment::Model> for AssignmentResponse {
    fn from(m: assignment::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            image_url: m.image_url,
            correct_text: m.correct_text,
            class_id: m.class_id,
            deadline: m.deadline,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}

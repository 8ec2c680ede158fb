use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;

/// Success envelope shared by the class, assignment, score and
/// student-assignment endpoints.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ApiResponse<T> {
    /// HTTP status code, repeated in the body.
    #[schema(example = 200)]
    pub status: u16,
    /// Human-readable outcome.
    #[schema(example = "Assignment created successfully")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Identifier of a deleted record.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    #[schema(example = "01927b3c-5f0e-7cc4-9a53-2b1d8e4f6a10")]
    pub id: String,
}

/// Fresh primary key for classes, assignments and scores.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Require a field to be present.
pub fn required<T>(value: Option<T>) -> Result<T, AppError> {
    value.ok_or(AppError::MissingFields)
}

/// Require a text field to be present and non-blank. Returns it trimmed.
pub fn required_text(value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(AppError::MissingFields),
    }
}

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    if title.is_empty() || title.chars().count() > 256 {
        return Err(AppError::Validation(
            "Title must be 1-256 characters".into(),
        ));
    }
    Ok(())
}

/// Validate a display name (1-100 Unicode characters).
pub fn validate_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() || name.chars().count() > 100 {
        return Err(AppError::Validation("Name must be 1-100 characters".into()));
    }
    Ok(())
}

/// Parse a deadline given either as RFC 3339 or as a bare `YYYY-MM-DD` date
/// (interpreted as midnight UTC).
pub fn parse_deadline(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            AppError::Validation(
                "deadline must be an RFC 3339 timestamp or a YYYY-MM-DD date".into(),
            )
        })
}

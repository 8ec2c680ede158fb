use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{required_text, validate_name};
use crate::entity::{class, student};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateClassRequest {
    #[schema(example = "Steno 101")]
    pub name: Option<String>,
}

pub fn validate_create_class(payload: CreateClassRequest) -> Result<String, AppError> {
    let name = required_text(payload.name)?;
    validate_name(&name)?;
    Ok(name)
}

/// Body naming a single class.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassIdRequest {
    #[schema(example = "01927b3c-1a2b-7c3d-8e4f-5a6b7c8d9e01")]
    pub class_id: Option<String>,
}

/// Add a student to a class. An unknown `studentId` creates the student, in
/// which case `name` and `password` are required; an existing student is moved.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignStudentRequest {
    #[schema(example = "01927b3c-1a2b-7c3d-8e4f-5a6b7c8d9e01")]
    pub class_id: Option<String>,
    #[schema(example = "alice01")]
    pub student_id: Option<String>,
    #[schema(example = "Alice")]
    pub name: Option<String>,
    #[schema(example = "typing123")]
    pub password: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveStudentRequest {
    #[schema(example = "01927b3c-1a2b-7c3d-8e4f-5a6b7c8d9e01")]
    pub class_id: Option<String>,
    #[schema(example = "alice01")]
    pub student_id: Option<String>,
}

pub fn validate_remove_student(
    payload: RemoveStudentRequest,
) -> Result<(String, String), AppError> {
    let class_id = required_text(payload.class_id)?;
    let student_id = required_text(payload.student_id)?;
    Ok((class_id, student_id))
}

/// Validate a student identifier (3-20 characters: letters, digits, `_`, `-`).
pub fn validate_student_id(id: &str) -> Result<(), AppError> {
    let len = id.chars().count();
    if !(student::ID_MIN_LEN..=student::ID_MAX_LEN).contains(&len) {
        return Err(AppError::Validation(format!(
            "Student ID must be {}-{} characters",
            student::ID_MIN_LEN,
            student::ID_MAX_LEN
        )));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::Validation(
            "Student ID must contain only letters, digits, '_' and '-'".into(),
        ));
    }
    Ok(())
}

pub fn validate_student_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if !(6..=128).contains(&len) {
        return Err(AppError::Validation(
            "Password must be 6-128 characters".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassResponse {
    #[schema(example = "01927b3c-1a2b-7c3d-8e4f-5a6b7c8d9e01")]
    pub id: String,
    #[schema(example = "Steno 101")]
    pub name: String,
    #[schema(example = 42)]
    pub teacher_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<class::Model> for ClassResponse {
    fn from(m: class::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            teacher_id: m.teacher_id,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    #[schema(example = "alice01")]
    pub id: String,
    #[schema(example = "Alice")]
    pub name: String,
    pub class_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<student::Model> for StudentResponse {
    fn from(m: student::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            class_id: m.class_id,
            created_at: m.created_at,
        }
    }
}

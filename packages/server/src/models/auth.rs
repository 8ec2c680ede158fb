use serde::{Deserialize, Serialize};

use super::shared::{required_text, validate_name};
use crate::entity::{student, teacher};
use crate::error::AppError;

/// Discriminator between the two kinds of account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

/// Request body for teacher registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Ms. Rivera")]
    pub name: Option<String>,
    #[schema(example = "rivera@school.edu")]
    pub email: Option<String>,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: Option<String>,
}

pub struct ValidRegister {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn validate_register_request(payload: RegisterRequest) -> Result<ValidRegister, AppError> {
    let name = required_text(payload.name)?;
    let email = required_text(payload.email)?.to_lowercase();
    let password = payload.password.filter(|p| !p.is_empty());
    let password = password.ok_or(AppError::MissingFields)?;

    validate_name(&name)?;
    validate_email(&email)?;
    let password_len = password.chars().count();
    if !(8..=128).contains(&password_len) {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(ValidRegister {
        name,
        email,
        password,
    })
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = email.len() <= 254
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
        && !email.chars().any(char::is_whitespace);
    if !valid {
        return Err(AppError::Validation("Email address is invalid".into()));
    }
    Ok(())
}

/// Request body for teacher login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "rivera@school.edu")]
    pub email: Option<String>,
    #[schema(example = "s3cure_P@ss!")]
    pub password: Option<String>,
}

/// Request body for student login.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentLoginRequest {
    #[schema(example = "alice01")]
    pub student_id: Option<String>,
    #[schema(example = "typing123")]
    pub password: Option<String>,
}

/// Request body for logout. The bearer token's subject must equal `userId`.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[schema(example = "42")]
    pub user_id: Option<String>,
}

/// Public view of an account. Never carries password or session fields.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Teacher id (numeric, as a string) or student id.
    #[schema(example = "42")]
    pub id: String,
    #[schema(example = "Ms. Rivera")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
}

impl From<teacher::Model> for UserResponse {
    fn from(t: teacher::Model) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name,
            email: Some(t.email),
            role: Role::Teacher,
            class_id: None,
        }
    }
}

impl From<student::Model> for UserResponse {
    fn from(s: student::Model) -> Self {
        Self {
            id: s.id,
            name: s.name,
            email: None,
            role: Role::Student,
            class_id: s.class_id,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    pub user: UserResponse,
    /// Bearer token to send as `Authorization: Bearer <token>`.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

/// Successful registration response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "Teacher registered successfully")]
    pub message: String,
    pub user: UserResponse,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Logged out successfully")]
    pub message: String,
}

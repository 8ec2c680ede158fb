use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{student, teacher};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    AuthResponse, LoginRequest, LogoutRequest, MessageResponse, RegisterRequest, RegisterResponse,
    Role, StudentLoginRequest, validate_register_request,
};
use crate::models::shared::required_text;
use crate::state::AppState;
use crate::utils::{hash, jwt};

#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    operation_id = "registerTeacher",
    summary = "Register a teacher account",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Teacher registered", body = RegisterResponse),
        (status = 400, description = "Missing or invalid field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email already registered (CONFLICT)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let valid = validate_register_request(payload)?;

    let taken = teacher::Entity::find()
        .filter(teacher::Column::Email.eq(&valid.email))
        .one(&state.db)
        .await?
        .is_some();
    if taken {
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    let hash = hash::hash_password(&valid.password)?;

    let new_teacher = teacher::ActiveModel {
        name: Set(valid.name),
        email: Set(valid.email),
        password: Set(hash),
        session_token: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_teacher.insert(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!("Registration race condition: unique constraint caught on insert");
            AppError::Conflict("Email is already registered".into())
        }
        _ => AppError::from(e),
    })?;

    tracing::info!(teacher_id = model.id, "Teacher registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Teacher registered successfully".into(),
            user: model.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "loginTeacher",
    summary = "Log in as a teacher",
    description = "Verifies the password, issues a bearer token and stores it as the account's only live session. Any earlier token stops working.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Missing field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong email or password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = required_text(payload.email)?.to_lowercase();
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or(AppError::MissingFields)?;

    let existing = teacher::Entity::find()
        .filter(teacher::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !hash::verify_password(&password, &existing.password)? {
        return Err(AppError::InvalidCredentials);
    }

    let auth = &state.config.auth;
    let token = jwt::sign(
        &existing.id.to_string(),
        Role::Teacher,
        &auth.jwt_secret,
        auth.token_ttl_hours,
    )?;

    let mut active: teacher::ActiveModel = existing.into();
    active.session_token = Set(Some(token.clone()));
    let model = active.update(&state.db).await?;

    tracing::info!(teacher_id = model.id, "Teacher logged in");

    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        user: model.into(),
        token,
    }))
}

#[utoipa::path(
    post,
    path = "/student/login",
    tag = "Auth",
    operation_id = "loginStudent",
    summary = "Log in as a student",
    request_body = StudentLoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Missing field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong student ID or password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn student_login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<StudentLoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let student_id = required_text(payload.student_id)?;
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or(AppError::MissingFields)?;

    let existing = student::Entity::find_by_id(student_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !hash::verify_password(&password, &existing.password)? {
        return Err(AppError::InvalidCredentials);
    }

    let auth = &state.config.auth;
    let token = jwt::sign(
        &existing.id,
        Role::Student,
        &auth.jwt_secret,
        auth.token_ttl_hours,
    )?;

    let mut active: student::ActiveModel = existing.into();
    active.session_token = Set(Some(token.clone()));
    let model = active.update(&state.db).await?;

    tracing::info!(student_id = %model.id, "Student logged in");

    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        user: model.into(),
        token,
    }))
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    operation_id = "logout",
    summary = "End the current session",
    description = "The bearer token's subject must equal `userId`. On success the stored session token is cleared and the bearer token is no longer accepted.",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 400, description = "Missing field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Token missing, invalid, or issued to another user", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn logout(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<LogoutRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let user_id = required_text(payload.user_id)?;
    if user_id != auth_user.user_id {
        tracing::warn!(requested = %user_id, "Logout subject mismatch");
        return Err(AppError::TokenInvalid);
    }

    match auth_user.role {
        Role::Teacher => {
            let id = auth_user.require_teacher()?;
            let existing = teacher::Entity::find_by_id(id)
                .one(&state.db)
                .await?
                .ok_or(AppError::TokenInvalid)?;
            let mut active: teacher::ActiveModel = existing.into();
            active.session_token = Set(None);
            active.update(&state.db).await?;
        }
        Role::Student => {
            let existing = student::Entity::find_by_id(auth_user.user_id.clone())
                .one(&state.db)
                .await?
                .ok_or(AppError::TokenInvalid)?;
            let mut active: student::ActiveModel = existing.into();
            active.session_token = Set(None);
            active.update(&state.db).await?;
        }
    }

    Ok(Json(MessageResponse {
        message: "Logged out successfully".into(),
    }))
}

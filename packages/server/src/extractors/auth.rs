use axum::{extract::FromRequestParts, http::request::Parts};
use sea_orm::EntityTrait;

use crate::entity::{student, teacher};
use crate::error::AppError;
use crate::models::auth::Role;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Beyond the signature and expiry, the token must still be the session token
/// stored on the account, so a logout or a newer login invalidates it.
/// Role checks happen via `require_teacher()` / `require_student()` in the
/// handler body.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
    pub token: String,
}

impl AuthUser {
    /// Returns the numeric teacher id, or `PermissionDenied` for students.
    pub fn require_teacher(&self) -> Result<i32, AppError> {
        match self.role {
            Role::Teacher => self.user_id.parse().map_err(|_| AppError::TokenInvalid),
            Role::Student => Err(AppError::PermissionDenied),
        }
    }

    /// Returns the student id, or `PermissionDenied` for teachers.
    pub fn require_student(&self) -> Result<&str, AppError> {
        match self.role {
            Role::Student => Ok(&self.user_id),
            Role::Teacher => Err(AppError::PermissionDenied),
        }
    }
}

/// Pull the raw bearer token out of the request headers.
pub fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::TokenMissing)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::TokenInvalid)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = jwt::verify(token, &state.config.auth.jwt_secret)?;

        let stored = match claims.role {
            Role::Teacher => {
                let id: i32 = claims.sub.parse().map_err(|_| AppError::TokenInvalid)?;
                teacher::Entity::find_by_id(id)
                    .one(&state.db)
                    .await?
                    .and_then(|t| t.session_token)
            }
            Role::Student => student::Entity::find_by_id(claims.sub.clone())
                .one(&state.db)
                .await?
                .and_then(|s| s.session_token),
        };

        if stored.as_deref() != Some(token) {
            tracing::debug!(user_id = %claims.sub, "Token is not the live session");
            return Err(AppError::TokenInvalid);
        }

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
            token: token.to_owned(),
        })
    }
}

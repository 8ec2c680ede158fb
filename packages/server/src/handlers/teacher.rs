use axum::extract::State;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{class, student};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::class::StudentResponse;
use crate::models::shared::ApiResponse;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/students",
    tag = "Teacher",
    operation_id = "fetchTeacherStudents",
    summary = "List every student across the calling teacher's classes",
    description = "Ordered by class, then by name.",
    responses(
        (status = 200, description = "Students", body = ApiResponse<Vec<StudentResponse>>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn fetch_students(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<StudentResponse>>, AppError> {
    let teacher_id = auth_user.require_teacher()?;

    let class_ids: Vec<String> = class::Entity::find()
        .select_only()
        .column(class::Column::Id)
        .filter(class::Column::TeacherId.eq(teacher_id))
        .into_tuple()
        .all(&state.db)
        .await?;

    if class_ids.is_empty() {
        return Ok(ApiResponse::ok("Students fetched successfully", Vec::new()));
    }

    let students = student::Entity::find()
        .filter(student::Column::ClassId.is_in(class_ids))
        .order_by_asc(student::Column::ClassId)
        .order_by_asc(student::Column::Name)
        .all(&state.db)
        .await?;

    Ok(ApiResponse::ok(
        "Students fetched successfully",
        students.into_iter().map(Into::into).collect(),
    ))
}

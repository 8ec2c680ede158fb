use axum::extract::State;
use sea_orm::*;
use tracing::instrument;

use super::class::find_owned_class;
use crate::entity::{assignment, student};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::assignment::*;
use crate::models::auth::Role;
use crate::models::shared::{ApiResponse, DeletedResponse, new_id, required_text};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/create",
    tag = "Assignments",
    operation_id = "createAssignment",
    summary = "Create an assignment in one of the teacher's classes",
    description = "New assignments start active. There is no duplicate detection: repeating the request creates another assignment.",
    request_body = CreateAssignmentRequest,
    responses(
        (status = 200, description = "Assignment created", body = ApiResponse<AssignmentResponse>),
        (status = 400, description = "Missing or invalid field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Class not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_assignment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateAssignmentRequest>,
) -> Result<ApiResponse<AssignmentResponse>, AppError> {
    let teacher_id = auth_user.require_teacher()?;
    let valid = validate_create_assignment(payload, &state.config.assets.image_host)?;

    find_owned_class(&state.db, &valid.class_id, teacher_id).await?;

    let model = assignment::ActiveModel {
        id: Set(new_id()),
        title: Set(valid.title),
        description: Set(valid.description),
        image_url: Set(valid.image_url),
        correct_text: Set(valid.correct_text),
        class_id: Set(valid.class_id),
        deadline: Set(valid.deadline),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(&state.db)
    .await?;

    tracing::info!(assignment_id = %model.id, class_id = %model.class_id, "Assignment created");

    Ok(ApiResponse::ok("Assignment created successfully", model.into()))
}

#[utoipa::path(
    post,
    path = "/fetch",
    tag = "Assignments",
    operation_id = "fetchAssignments",
    summary = "Fetch one assignment or all assignments of a class",
    description = "With `assignmentId` the list holds that single assignment; otherwise every assignment of `classId`, newest first. Students only see active assignments of their own class.",
    request_body = FetchAssignmentsRequest,
    responses(
        (status = 200, description = "Assignments", body = ApiResponse<Vec<AssignmentResponse>>),
        (status = 400, description = "Neither id given (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Class or assignment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn fetch_assignments(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<FetchAssignmentsRequest>,
) -> Result<ApiResponse<Vec<AssignmentResponse>>, AppError> {
    if let Some(assignment_id) = payload.assignment_id {
        let model = match auth_user.role {
            Role::Teacher => {
                find_teacher_assignment(&state.db, &assignment_id, auth_user.require_teacher()?)
                    .await?
            }
            Role::Student => {
                find_student_assignment(&state.db, &assignment_id, &auth_user.user_id).await?
            }
        };
        return Ok(ApiResponse::ok(
            "Assignment fetched successfully",
            vec![model.into()],
        ));
    }

    let class_id = required_text(payload.class_id)?;

    let mut select =
        assignment::Entity::find().filter(assignment::Column::ClassId.eq(class_id.as_str()));
    match auth_user.role {
        Role::Teacher => {
            find_owned_class(&state.db, &class_id, auth_user.require_teacher()?).await?;
        }
        Role::Student => {
            let me = current_student(&state.db, &auth_user.user_id).await?;
            if me.class_id.as_deref() != Some(class_id.as_str()) {
                return Err(AppError::NotFound("Class not found".into()));
            }
            select = select.filter(assignment::Column::IsActive.eq(true));
        }
    }

    let rows = select
        .order_by_desc(assignment::Column::CreatedAt)
        .order_by_desc(assignment::Column::Id)
        .all(&state.db)
        .await?;

    Ok(ApiResponse::ok(
        "Assignments fetched successfully",
        rows.into_iter().map(Into::into).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/toggle",
    tag = "Assignments",
    operation_id = "toggleAssignment",
    summary = "Flip an assignment between active and inactive",
    request_body = AssignmentIdRequest,
    responses(
        (status = 200, description = "Assignment toggled", body = ApiResponse<AssignmentResponse>),
        (status = 400, description = "Missing field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Assignment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn toggle_assignment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<AssignmentIdRequest>,
) -> Result<ApiResponse<AssignmentResponse>, AppError> {
    let teacher_id = auth_user.require_teacher()?;
    let assignment_id = required_text(payload.assignment_id)?;

    let existing = find_teacher_assignment(&state.db, &assignment_id, teacher_id).await?;
    let next = !existing.is_active;

    let mut active: assignment::ActiveModel = existing.into();
    active.is_active = Set(next);
    let model = active.update(&state.db).await?;

    let message = if model.is_active {
        "Assignment activated"
    } else {
        "Assignment deactivated"
    };
    Ok(ApiResponse::ok(message, model.into()))
}

#[utoipa::path(
    post,
    path = "/delete",
    tag = "Assignments",
    operation_id = "deleteAssignment",
    summary = "Delete an assignment",
    description = "Scores recorded against the assignment are kept.",
    request_body = AssignmentIdRequest,
    responses(
        (status = 200, description = "Assignment deleted", body = ApiResponse<DeletedResponse>),
        (status = 400, description = "Missing field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Assignment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn delete_assignment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<AssignmentIdRequest>,
) -> Result<ApiResponse<DeletedResponse>, AppError> {
    let teacher_id = auth_user.require_teacher()?;
    let assignment_id = required_text(payload.assignment_id)?;

    find_teacher_assignment(&state.db, &assignment_id, teacher_id).await?;
    assignment::Entity::delete_by_id(assignment_id.as_str())
        .exec(&state.db)
        .await?;

    Ok(ApiResponse::ok(
        "Assignment deleted successfully",
        DeletedResponse { id: assignment_id },
    ))
}

/// Load an assignment in a class owned by `teacher_id`.
pub(crate) async fn find_teacher_assignment<C: ConnectionTrait>(
    db: &C,
    assignment_id: &str,
    teacher_id: i32,
) -> Result<assignment::Model, AppError> {
    let model = assignment::Entity::find_by_id(assignment_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".into()))?;
    match find_owned_class(db, &model.class_id, teacher_id).await {
        Ok(_) => Ok(model),
        Err(AppError::NotFound(_)) => Err(AppError::NotFound("Assignment not found".into())),
        Err(e) => Err(e),
    }
}

/// Load an assignment of the student's own class, active or not.
async fn find_class_assignment<C: ConnectionTrait>(
    db: &C,
    assignment_id: &str,
    student_id: &str,
) -> Result<assignment::Model, AppError> {
    let me = current_student(db, student_id).await?;
    assignment::Entity::find_by_id(assignment_id)
        .one(db)
        .await?
        .filter(|a| me.class_id.as_deref() == Some(a.class_id.as_str()))
        .ok_or_else(|| AppError::NotFound("Assignment not found".into()))
}

/// Load an active assignment of the student's own class. Inactive ones are
/// hidden from students.
pub(crate) async fn find_student_assignment<C: ConnectionTrait>(
    db: &C,
    assignment_id: &str,
    student_id: &str,
) -> Result<assignment::Model, AppError> {
    let model = find_class_assignment(db, assignment_id, student_id).await?;
    if !model.is_active {
        return Err(AppError::NotFound("Assignment not found".into()));
    }
    Ok(model)
}

/// Load an assignment of the student's own class that still accepts work.
pub(crate) async fn find_open_assignment<C: ConnectionTrait>(
    db: &C,
    assignment_id: &str,
    student_id: &str,
) -> Result<assignment::Model, AppError> {
    let model = find_class_assignment(db, assignment_id, student_id).await?;
    if !model.is_active {
        return Err(AppError::Validation("Assignment is not active".into()));
    }
    Ok(model)
}

pub(crate) async fn current_student<C: ConnectionTrait>(
    db: &C,
    student_id: &str,
) -> Result<student::Model, AppError> {
    student::Entity::find_by_id(student_id.to_owned())
        .one(db)
        .await?
        .ok_or(AppError::TokenInvalid)
}

use axum::extract::State;
use sea_orm::*;
use tracing::instrument;

use super::assignment::{find_open_assignment, find_teacher_assignment};
use super::class::find_owned_class;
use crate::entity::{score, student};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::Role;
use crate::models::score::*;
use crate::models::shared::{ApiResponse, DeletedResponse, new_id, required_text};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/create",
    tag = "Scores",
    operation_id = "createScore",
    summary = "Record a typing attempt with client-reported figures",
    description = "Persists `accuracy` and `wpm` as sent, after range checks. The score belongs to the calling student. Use `/student-assignments/submit` for server-computed scoring.",
    request_body = CreateScoreRequest,
    responses(
        (status = 200, description = "Score created", body = ApiResponse<ScoreResponse>),
        (status = 400, description = "Missing or invalid field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a student (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Assignment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_score(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateScoreRequest>,
) -> Result<ApiResponse<ScoreResponse>, AppError> {
    let student_id = auth_user.require_student()?;
    let valid = validate_create_score(payload)?;

    if let Some(ref assignment_id) = valid.assignment_id {
        find_open_assignment(&state.db, assignment_id, student_id).await?;
    }

    let model = score::ActiveModel {
        id: Set(new_id()),
        student_id: Set(student_id.to_owned()),
        assignment_id: Set(valid.assignment_id),
        typed_text: Set(valid.typed_text),
        accuracy: Set(valid.accuracy),
        wpm: Set(valid.wpm),
        time_taken: Set(valid.time_taken),
        completed_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(ApiResponse::ok("Score created successfully", model.into()))
}

#[utoipa::path(
    post,
    path = "/fetch",
    tag = "Scores",
    operation_id = "fetchScores",
    summary = "List scores, newest first",
    description = "Students get their own scores, optionally narrowed by `assignmentId`. Teachers must name a `studentId` in one of their classes or an `assignmentId` of one of their classes.",
    request_body = FetchScoresRequest,
    responses(
        (status = 200, description = "Scores", body = ApiResponse<Vec<ScoreResponse>>),
        (status = 400, description = "Missing filter (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Student asking for another student's scores (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Student or assignment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn fetch_scores(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<FetchScoresRequest>,
) -> Result<ApiResponse<Vec<ScoreResponse>>, AppError> {
    let mut select = score::Entity::find();

    match auth_user.role {
        Role::Student => {
            if payload
                .student_id
                .as_deref()
                .is_some_and(|id| id != auth_user.user_id)
            {
                return Err(AppError::PermissionDenied);
            }
            select = select.filter(score::Column::StudentId.eq(auth_user.user_id.as_str()));
        }
        Role::Teacher => {
            let teacher_id = auth_user.require_teacher()?;
            if payload.student_id.is_none() && payload.assignment_id.is_none() {
                return Err(AppError::MissingFields);
            }
            if let Some(ref student_id) = payload.student_id {
                find_teacher_student(&state.db, student_id, teacher_id).await?;
                select = select.filter(score::Column::StudentId.eq(student_id.as_str()));
            }
            if let Some(ref assignment_id) = payload.assignment_id {
                find_teacher_assignment(&state.db, assignment_id, teacher_id).await?;
            }
        }
    }

    if let Some(assignment_id) = payload.assignment_id {
        select = select.filter(score::Column::AssignmentId.eq(assignment_id));
    }

    let rows = select
        .order_by_desc(score::Column::CompletedAt)
        .order_by_desc(score::Column::Id)
        .all(&state.db)
        .await?;

    Ok(ApiResponse::ok(
        "Scores fetched successfully",
        rows.into_iter().map(Into::into).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/delete",
    tag = "Scores",
    operation_id = "deleteScore",
    summary = "Delete a score",
    description = "Allowed when the score's student or assignment belongs to one of the teacher's classes.",
    request_body = ScoreIdRequest,
    responses(
        (status = 200, description = "Score deleted", body = ApiResponse<DeletedResponse>),
        (status = 400, description = "Missing field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Score not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn delete_score(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ScoreIdRequest>,
) -> Result<ApiResponse<DeletedResponse>, AppError> {
    let teacher_id = auth_user.require_teacher()?;
    let score_id = required_text(payload.score_id)?;

    let existing = score::Entity::find_by_id(score_id.as_str())
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Score not found".into()))?;

    let via_student = owned(find_teacher_student(&state.db, &existing.student_id, teacher_id).await)?;
    let via_assignment = match existing.assignment_id.as_deref() {
        Some(assignment_id) => {
            owned(find_teacher_assignment(&state.db, assignment_id, teacher_id).await)?
        }
        None => false,
    };
    if !via_student && !via_assignment {
        return Err(AppError::NotFound("Score not found".into()));
    }

    score::Entity::delete_by_id(score_id.as_str()).exec(&state.db).await?;

    Ok(ApiResponse::ok(
        "Score deleted successfully",
        DeletedResponse { id: score_id },
    ))
}

/// `NotFound` means "not the caller's"; other errors still propagate.
fn owned<T>(lookup: Result<T, AppError>) -> Result<bool, AppError> {
    match lookup {
        Ok(_) => Ok(true),
        Err(AppError::NotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Load a student currently in one of `teacher_id`'s classes.
pub(crate) async fn find_teacher_student<C: ConnectionTrait>(
    db: &C,
    student_id: &str,
    teacher_id: i32,
) -> Result<student::Model, AppError> {
    let not_found = || AppError::NotFound("Student not found".into());
    let model = student::Entity::find_by_id(student_id.to_owned())
        .one(db)
        .await?
        .ok_or_else(not_found)?;
    let Some(class_id) = model.class_id.as_deref() else {
        return Err(not_found());
    };
    match find_owned_class(db, class_id, teacher_id).await {
        Ok(_) => Ok(model),
        Err(AppError::NotFound(_)) => Err(not_found()),
        Err(e) => Err(e),
    }
}

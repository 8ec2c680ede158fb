use std::collections::HashMap;

use axum::extract::State;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;

use super::assignment::{current_student, find_open_assignment};
use crate::entity::{assignment, score, student_assignment};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::assignment::AssignmentIdRequest;
use crate::models::shared::{ApiResponse, new_id, required_text};
use crate::models::student_assignment::*;
use crate::state::AppState;
use crate::utils::scoring;

#[utoipa::path(
    post,
    path = "/fetch",
    tag = "Student Assignments",
    operation_id = "fetchStudentAssignments",
    summary = "List the calling student's active assignments",
    description = "Active assignments of the student's class, newest first, with completion status and the latest attempt. Empty when the student has no class.",
    responses(
        (status = 200, description = "Assignments with progress", body = ApiResponse<Vec<StudentAssignmentItem>>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a student (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn fetch_student_assignments(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<StudentAssignmentItem>>, AppError> {
    let student_id = auth_user.require_student()?;
    let me = current_student(&state.db, student_id).await?;

    let Some(class_id) = me.class_id else {
        return Ok(ApiResponse::ok("No class assigned", Vec::new()));
    };

    let assignments = assignment::Entity::find()
        .filter(assignment::Column::ClassId.eq(class_id.as_str()))
        .filter(assignment::Column::IsActive.eq(true))
        .order_by_desc(assignment::Column::CreatedAt)
        .order_by_desc(assignment::Column::Id)
        .all(&state.db)
        .await?;
    let ids: Vec<String> = assignments.iter().map(|a| a.id.clone()).collect();

    let mut completions: HashMap<String, student_assignment::Model> = student_assignment::Entity::find()
        .filter(student_assignment::Column::StudentId.eq(student_id))
        .filter(student_assignment::Column::AssignmentId.is_in(ids.clone()))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|c| (c.assignment_id.clone(), c))
        .collect();

    // Newest first, so the first score seen per assignment is the latest.
    let mut latest: HashMap<String, score::Model> = HashMap::new();
    let scores = score::Entity::find()
        .filter(score::Column::StudentId.eq(student_id))
        .filter(score::Column::AssignmentId.is_in(ids))
        .order_by_desc(score::Column::CompletedAt)
        .order_by_desc(score::Column::Id)
        .all(&state.db)
        .await?;
    for s in scores {
        if let Some(assignment_id) = s.assignment_id.clone() {
            latest.entry(assignment_id).or_insert(s);
        }
    }

    let items = assignments
        .into_iter()
        .map(|a| {
            let completion = completions.remove(&a.id);
            let latest_score = latest.remove(&a.id).map(Into::into);
            StudentAssignmentItem {
                completed: completion.as_ref().is_some_and(|c| c.completed),
                completed_at: completion.and_then(|c| c.completed_at),
                latest_score,
                assignment: a.into(),
            }
        })
        .collect();

    Ok(ApiResponse::ok("Assignments fetched successfully", items))
}

#[utoipa::path(
    post,
    path = "/complete",
    tag = "Student Assignments",
    operation_id = "completeStudentAssignment",
    summary = "Mark an assignment as completed",
    description = "Independent of score creation: marking completion records no score, and recording a score through `/scores/create` does not mark completion.",
    request_body = AssignmentIdRequest,
    responses(
        (status = 200, description = "Completion recorded", body = ApiResponse<CompletionResponse>),
        (status = 400, description = "Missing field or inactive assignment (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a student (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Assignment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn complete_assignment(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<AssignmentIdRequest>,
) -> Result<ApiResponse<CompletionResponse>, AppError> {
    let student_id = auth_user.require_student()?;
    let assignment_id = required_text(payload.assignment_id)?;

    find_open_assignment(&state.db, &assignment_id, student_id).await?;
    let model = mark_completed(&state.db, student_id, &assignment_id, None).await?;

    Ok(ApiResponse::ok("Assignment marked as completed", model.into()))
}

#[utoipa::path(
    post,
    path = "/submit",
    tag = "Student Assignments",
    operation_id = "submitStudentAssignment",
    summary = "Submit a typed response for server-side scoring",
    description = "Accuracy and WPM are computed from the typed text, the assignment's correct text and the elapsed time. The score and the completion are written in one transaction.",
    request_body = SubmitAttemptRequest,
    responses(
        (status = 200, description = "Attempt scored", body = ApiResponse<SubmitAttemptResponse>),
        (status = 400, description = "Missing or invalid field, or inactive assignment (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a student (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Assignment not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn submit_attempt(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SubmitAttemptRequest>,
) -> Result<ApiResponse<SubmitAttemptResponse>, AppError> {
    let student_id = auth_user.require_student()?;
    let attempt = validate_submit_attempt(payload)?;

    let txn = state.db.begin().await?;
    let target = find_open_assignment(&txn, &attempt.assignment_id, student_id).await?;

    let result = scoring::score(&attempt.typed_text, &target.correct_text, attempt.time_taken)
        .ok_or_else(|| AppError::Validation("timeTaken must be > 0".into()))?;

    let saved = score::ActiveModel {
        id: Set(new_id()),
        student_id: Set(student_id.to_owned()),
        assignment_id: Set(Some(target.id.clone())),
        typed_text: Set(attempt.typed_text),
        accuracy: Set(result.accuracy),
        wpm: Set(result.wpm),
        time_taken: Set(Some(attempt.time_taken)),
        completed_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let completion = mark_completed(&txn, student_id, &target.id, Some(saved.id.clone())).await?;
    txn.commit().await?;

    tracing::info!(
        assignment_id = %target.id,
        accuracy = result.accuracy,
        wpm = result.wpm,
        "Attempt scored"
    );

    Ok(ApiResponse::ok(
        "Attempt submitted successfully",
        SubmitAttemptResponse {
            score: saved.into(),
            word_errors: result.word_errors,
            completion: completion.into(),
        },
    ))
}

/// Insert or refresh the completion row for a student and assignment.
///
/// A single upsert, so concurrent completions of the same assignment both
/// succeed. `score_id` is only overwritten when a new score is given.
async fn mark_completed<C: ConnectionTrait>(
    db: &C,
    student_id: &str,
    assignment_id: &str,
    score_id: Option<String>,
) -> Result<student_assignment::Model, AppError> {
    let mut refreshed = vec![
        student_assignment::Column::Completed,
        student_assignment::Column::CompletedAt,
    ];
    if score_id.is_some() {
        refreshed.push(student_assignment::Column::ScoreId);
    }

    student_assignment::Entity::insert(student_assignment::ActiveModel {
        student_id: Set(student_id.to_owned()),
        assignment_id: Set(assignment_id.to_owned()),
        completed: Set(true),
        completed_at: Set(Some(chrono::Utc::now())),
        score_id: Set(score_id),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([
            student_assignment::Column::StudentId,
            student_assignment::Column::AssignmentId,
        ])
        .update_columns(refreshed)
        .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    student_assignment::Entity::find_by_id((student_id.to_owned(), assignment_id.to_owned()))
        .one(db)
        .await?
        .ok_or_else(|| AppError::Internal("completion missing after upsert".into()))
}

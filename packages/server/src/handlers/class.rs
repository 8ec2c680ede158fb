use axum::extract::State;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{class, student};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::class::*;
use crate::models::shared::{ApiResponse, DeletedResponse, new_id, required_text, validate_name};
use crate::state::AppState;
use crate::utils::hash;

#[utoipa::path(
    post,
    path = "/create",
    tag = "Classes",
    operation_id = "createClass",
    summary = "Create a class owned by the calling teacher",
    request_body = CreateClassRequest,
    responses(
        (status = 201, description = "Class created", body = ApiResponse<ClassResponse>),
        (status = 400, description = "Missing or invalid field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_class(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateClassRequest>,
) -> Result<ApiResponse<ClassResponse>, AppError> {
    let teacher_id = auth_user.require_teacher()?;
    let name = validate_create_class(payload)?;

    let model = class::ActiveModel {
        id: Set(new_id()),
        name: Set(name),
        teacher_id: Set(teacher_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(ApiResponse::created("Class created successfully", model.into()))
}

#[utoipa::path(
    post,
    path = "/fetch",
    tag = "Classes",
    operation_id = "fetchClasses",
    summary = "List the calling teacher's classes",
    description = "Newest first.",
    responses(
        (status = 200, description = "Classes", body = ApiResponse<Vec<ClassResponse>>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn fetch_classes(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<ClassResponse>>, AppError> {
    let teacher_id = auth_user.require_teacher()?;

    let classes = class::Entity::find()
        .filter(class::Column::TeacherId.eq(teacher_id))
        .order_by_desc(class::Column::CreatedAt)
        .order_by_desc(class::Column::Id)
        .all(&state.db)
        .await?;

    Ok(ApiResponse::ok(
        "Classes fetched successfully",
        classes.into_iter().map(Into::into).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/delete",
    tag = "Classes",
    operation_id = "deleteClass",
    summary = "Delete a class",
    description = "Deletes the class record only. Its assignments, scores and students are left in place.",
    request_body = ClassIdRequest,
    responses(
        (status = 200, description = "Class deleted", body = ApiResponse<DeletedResponse>),
        (status = 400, description = "Missing field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Class not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn delete_class(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ClassIdRequest>,
) -> Result<ApiResponse<DeletedResponse>, AppError> {
    let teacher_id = auth_user.require_teacher()?;
    let class_id = required_text(payload.class_id)?;

    find_owned_class(&state.db, &class_id, teacher_id).await?;
    class::Entity::delete_by_id(class_id.as_str()).exec(&state.db).await?;

    tracing::info!(%class_id, "Class deleted");

    Ok(ApiResponse::ok(
        "Class deleted successfully",
        DeletedResponse { id: class_id },
    ))
}

#[utoipa::path(
    post,
    path = "/assign-student",
    tag = "Classes",
    operation_id = "assignStudent",
    summary = "Add a student to a class",
    description = "Creates the student when `studentId` is unknown (then `name` and `password` are required). A student without a class, or in another class of the same teacher, is moved.",
    request_body = AssignStudentRequest,
    responses(
        (status = 200, description = "Student assigned", body = ApiResponse<StudentResponse>),
        (status = 400, description = "Missing or invalid field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Class not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Student already in class or ID taken (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn assign_student(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<AssignStudentRequest>,
) -> Result<ApiResponse<StudentResponse>, AppError> {
    let teacher_id = auth_user.require_teacher()?;
    let class_id = required_text(payload.class_id)?;
    let student_id = required_text(payload.student_id)?;
    validate_student_id(&student_id)?;

    find_owned_class(&state.db, &class_id, teacher_id).await?;

    let existing = student::Entity::find_by_id(student_id.clone())
        .one(&state.db)
        .await?;

    let model = match existing {
        Some(existing) => {
            if existing.class_id.as_deref() == Some(class_id.as_str()) {
                return Err(AppError::Conflict(
                    "Student is already in this class".into(),
                ));
            }
            // A student whose class belongs to another teacher cannot be taken over.
            if let Some(current) = existing.class_id.as_deref() {
                let current_class = class::Entity::find_by_id(current).one(&state.db).await?;
                if current_class.is_some_and(|c| c.teacher_id != teacher_id) {
                    return Err(AppError::Conflict("Student ID is already taken".into()));
                }
            }
            let mut active: student::ActiveModel = existing.into();
            active.class_id = Set(Some(class_id.clone()));
            active.update(&state.db).await?
        }
        None => {
            let name = required_text(payload.name)?;
            let password = payload
                .password
                .filter(|p| !p.is_empty())
                .ok_or(AppError::MissingFields)?;
            validate_name(&name)?;
            validate_student_password(&password)?;

            student::ActiveModel {
                id: Set(student_id),
                name: Set(name),
                password: Set(hash::hash_password(&password)?),
                class_id: Set(Some(class_id.clone())),
                session_token: Set(None),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            }
            .insert(&state.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    AppError::Conflict("Student ID is already taken".into())
                }
                _ => AppError::from(e),
            })?
        }
    };

    tracing::info!(%class_id, student_id = %model.id, "Student assigned");

    Ok(ApiResponse::ok("Student assigned to class", model.into()))
}

#[utoipa::path(
    post,
    path = "/remove-student",
    tag = "Classes",
    operation_id = "removeStudent",
    summary = "Remove a student from a class",
    description = "Clears the student's class. The account and its scores are kept.",
    request_body = RemoveStudentRequest,
    responses(
        (status = 200, description = "Student removed", body = ApiResponse<StudentResponse>),
        (status = 400, description = "Missing field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Class or student not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn remove_student(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<RemoveStudentRequest>,
) -> Result<ApiResponse<StudentResponse>, AppError> {
    let teacher_id = auth_user.require_teacher()?;
    let (class_id, student_id) = validate_remove_student(payload)?;

    find_owned_class(&state.db, &class_id, teacher_id).await?;

    let existing = student::Entity::find_by_id(student_id)
        .filter(student::Column::ClassId.eq(class_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found in this class".into()))?;

    let mut active: student::ActiveModel = existing.into();
    active.class_id = Set(None);
    let model = active.update(&state.db).await?;

    Ok(ApiResponse::ok("Student removed from class", model.into()))
}

#[utoipa::path(
    post,
    path = "/students",
    tag = "Classes",
    operation_id = "fetchClassStudents",
    summary = "List the students of a class",
    request_body = ClassIdRequest,
    responses(
        (status = 200, description = "Class roster", body = ApiResponse<Vec<StudentResponse>>),
        (status = 400, description = "Missing field (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Class not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn class_students(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ClassIdRequest>,
) -> Result<ApiResponse<Vec<StudentResponse>>, AppError> {
    let teacher_id = auth_user.require_teacher()?;
    let class_id = required_text(payload.class_id)?;

    find_owned_class(&state.db, &class_id, teacher_id).await?;

    let students = student::Entity::find()
        .filter(student::Column::ClassId.eq(class_id))
        .order_by_asc(student::Column::Name)
        .all(&state.db)
        .await?;

    Ok(ApiResponse::ok(
        "Students fetched successfully",
        students.into_iter().map(Into::into).collect(),
    ))
}

/// Load a class owned by `teacher_id`. Classes of other teachers are reported
/// as missing to prevent enumeration.
pub(crate) async fn find_owned_class<C: ConnectionTrait>(
    db: &C,
    class_id: &str,
    teacher_id: i32,
) -> Result<class::Model, AppError> {
    class::Entity::find_by_id(class_id)
        .one(db)
        .await?
        .filter(|c| c.teacher_id == teacher_id)
        .ok_or_else(|| AppError::NotFound("Class not found".into()))
}

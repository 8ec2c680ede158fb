use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/teacher", teacher_routes())
        .nest("/classes", class_routes())
        .nest("/assignments", assignment_routes())
        .nest("/scores", score_routes())
        .nest("/student-assignments", student_assignment_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::student_login))
        .routes(routes!(handlers::auth::logout))
}

fn teacher_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::teacher::fetch_students))
}

fn class_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::class::create_class))
        .routes(routes!(handlers::class::fetch_classes))
        .routes(routes!(handlers::class::delete_class))
        .routes(routes!(handlers::class::assign_student))
        .routes(routes!(handlers::class::remove_student))
        .routes(routes!(handlers::class::class_students))
}

fn assignment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::assignment::create_assignment))
        .routes(routes!(handlers::assignment::fetch_assignments))
        .routes(routes!(handlers::assignment::toggle_assignment))
        .routes(routes!(handlers::assignment::delete_assignment))
}

fn score_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::score::create_score))
        .routes(routes!(handlers::score::fetch_scores))
        .routes(routes!(handlers::score::delete_score))
}

fn student_assignment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::student_assignment::fetch_student_assignments))
        .routes(routes!(handlers::student_assignment::complete_assignment))
        .routes(routes!(handlers::student_assignment::submit_attempt))
}

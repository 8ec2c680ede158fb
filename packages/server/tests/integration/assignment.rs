use sea_orm::EntityTrait;
use serde_json::json;

use stenoclass_server::entity::assignment;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn create_defaults_to_active_and_echoes_class() {
    let app = TestApp::spawn().await;
    let teacher = app.create_teacher("rivera@example.com").await;
    let class_id = app.create_class(&teacher.token, "Steno 101").await;

    let res = app
        .post_with_token(
            routes::ASSIGNMENT_CREATE,
            &json!({
                "title": "Test",
                "deadline": "2025-01-01",
                "correctText": "abc",
                "classId": class_id,
                "token": "t",
            }),
            &teacher.token,
        )
        .await;

    assert_eq!(res.status, 200, "create failed: {}", res.text);
    assert_eq!(res.data()["title"], "Test");
    assert_eq!(res.data()["isActive"], true);
    assert!(res.data()["classId"].is_string());
    assert_eq!(res.data()["classId"], class_id);
    assert!(res.data()["id"].is_string());
    assert!(res.data()["deadline"].as_str().unwrap().starts_with("2025-01-01"));
}

#[tokio::test]
async fn unknown_class_id_is_not_found() {
    let app = TestApp::spawn().await;
    let teacher = app.create_teacher("rivera@example.com").await;

    let res = app
        .post_with_token(
            routes::ASSIGNMENT_CREATE,
            &json!({
                "title": "Test",
                "deadline": "2025-01-01",
                "correctText": "abc",
                "classId": "c1",
                "token": "t",
            }),
            &teacher.token,
        )
        .await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
    assert!(assignment::Entity::find().all(&app.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_correct_text_is_rejected() {
    let app = TestApp::spawn().await;
    let teacher = app.create_teacher("rivera@example.com").await;
    let class_id = app.create_class(&teacher.token, "Steno 101").await;

    let res = app
        .post_with_token(
            routes::ASSIGNMENT_CREATE,
            &json!({"title": "A1", "classId": class_id}),
            &teacher.token,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["message"], "All fields are required");
    assert_eq!(res.body["error"], "All fields are required");
    assert!(assignment::Entity::find().all(&app.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn image_from_another_host_is_rejected() {
    let app = TestApp::spawn().await;
    let teacher = app.create_teacher("rivera@example.com").await;
    let class_id = app.create_class(&teacher.token, "Steno 101").await;

    let res = app
        .post_with_token(
            routes::ASSIGNMENT_CREATE,
            &json!({
                "title": "A1",
                "correctText": "hello",
                "classId": class_id,
                "imageUrl": "https://evil.example.com/pic.png",
            }),
            &teacher.token,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn cannot_create_in_another_teachers_class() {
    let app = TestApp::spawn().await;
    let (_, class_id, _) = app.classroom("alice01").await;
    let other = app.create_teacher("other@example.com").await;

    let res = app
        .post_with_token(
            routes::ASSIGNMENT_CREATE,
            &json!({"title": "A1", "correctText": "hello", "classId": class_id}),
            &other.token,
        )
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn toggling_twice_restores_the_state() {
    let app = TestApp::spawn().await;
    let teacher = app.create_teacher("rivera@example.com").await;
    let class_id = app.create_class(&teacher.token, "Steno 101").await;
    let assignment_id = app.create_assignment(&teacher.token, &class_id, "hello").await;

    let first = app
        .post_with_token(
            routes::ASSIGNMENT_TOGGLE,
            &json!({"assignmentId": assignment_id}),
            &teacher.token,
        )
        .await;
    assert_eq!(first.status, 200);
    assert_eq!(first.data()["isActive"], false);

    let second = app
        .post_with_token(
            routes::ASSIGNMENT_TOGGLE,
            &json!({"assignmentId": assignment_id}),
            &teacher.token,
        )
        .await;
    assert_eq!(second.status, 200);
    assert_eq!(second.data()["isActive"], true);
}

#[tokio::test]
async fn teacher_fetches_one_or_all_assignments() {
    let app = TestApp::spawn().await;
    let teacher = app.create_teacher("rivera@example.com").await;
    let class_id = app.create_class(&teacher.token, "Steno 101").await;
    let first = app.create_assignment(&teacher.token, &class_id, "hello").await;
    app.create_assignment(&teacher.token, &class_id, "world").await;

    let all = app
        .post_with_token(routes::ASSIGNMENT_FETCH, &json!({"classId": class_id}), &teacher.token)
        .await;
    assert_eq!(all.status, 200);
    assert_eq!(all.data().as_array().unwrap().len(), 2);

    let one = app
        .post_with_token(routes::ASSIGNMENT_FETCH, &json!({"assignmentId": first}), &teacher.token)
        .await;
    assert_eq!(one.status, 200);
    assert_eq!(one.data().as_array().unwrap().len(), 1);
    assert_eq!(one.data()[0]["id"], first);
}

#[tokio::test]
async fn fetch_without_an_id_is_rejected() {
    let app = TestApp::spawn().await;
    let teacher = app.create_teacher("rivera@example.com").await;

    let res = app
        .post_with_token(routes::ASSIGNMENT_FETCH, &json!({}), &teacher.token)
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn students_only_see_active_assignments_of_their_class() {
    let app = TestApp::spawn().await;
    let (teacher, class_id, student_token) = app.classroom("alice01").await;
    app.create_assignment(&teacher.token, &class_id, "hello").await;
    let hidden = app.create_assignment(&teacher.token, &class_id, "world").await;
    app.post_with_token(
        routes::ASSIGNMENT_TOGGLE,
        &json!({"assignmentId": hidden}),
        &teacher.token,
    )
    .await;

    let list = app
        .post_with_token(routes::ASSIGNMENT_FETCH, &json!({"classId": class_id}), &student_token)
        .await;
    assert_eq!(list.status, 200);
    assert_eq!(list.data().as_array().unwrap().len(), 1);

    let direct = app
        .post_with_token(routes::ASSIGNMENT_FETCH, &json!({"assignmentId": hidden}), &student_token)
        .await;
    assert_eq!(direct.status, 404);

    let other = app.create_teacher("other@example.com").await;
    let other_class = app.create_class(&other.token, "Elsewhere").await;
    let foreign = app
        .post_with_token(routes::ASSIGNMENT_FETCH, &json!({"classId": other_class}), &student_token)
        .await;
    assert_eq!(foreign.status, 404);
}

#[tokio::test]
async fn students_cannot_create_assignments() {
    let app = TestApp::spawn().await;
    let (_, class_id, student_token) = app.classroom("alice01").await;

    let res = app
        .post_with_token(
            routes::ASSIGNMENT_CREATE,
            &json!({"title": "A1", "correctText": "hello", "classId": class_id}),
            &student_token,
        )
        .await;

    assert_eq!(res.status, 403);
}

#[tokio::test]
async fn deleted_assignment_is_gone() {
    let app = TestApp::spawn().await;
    let teacher = app.create_teacher("rivera@example.com").await;
    let class_id = app.create_class(&teacher.token, "Steno 101").await;
    let assignment_id = app.create_assignment(&teacher.token, &class_id, "hello").await;

    let res = app
        .post_with_token(
            routes::ASSIGNMENT_DELETE,
            &json!({"assignmentId": assignment_id}),
            &teacher.token,
        )
        .await;
    assert_eq!(res.status, 200);

    let again = app
        .post_with_token(
            routes::ASSIGNMENT_FETCH,
            &json!({"assignmentId": assignment_id}),
            &teacher.token,
        )
        .await;
    assert_eq!(again.status, 404);
}
